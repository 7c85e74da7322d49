//! Safe SQL builder: identifiers from code only, values as parameters.

mod builder;
mod catalog;
pub mod params;
pub mod scoped;
pub use builder::*;
pub use catalog::*;
pub use params::*;
pub use scoped::*;
