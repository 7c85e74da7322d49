//! External collaborators behind traits: password hashing and species image lookup.

mod image;
mod password;
pub use image::{ImageLookup, WikipediaImages};
pub use password::{PasswordHasher, Sha256Hasher};
