//! Request extractors.

mod actor;
mod body;
pub use actor::{RequireAdmin, USER_ID_HEADER, USER_ROLE_HEADER};
pub use body::{ApiJson, ApiQuery};
