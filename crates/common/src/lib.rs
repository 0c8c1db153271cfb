//! Shared types for the password-grant client workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
