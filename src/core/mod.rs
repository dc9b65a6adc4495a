//! Core types shared by the redirect tracer and the link validator.

mod error;
mod link;

pub use error::{LoadError, read_json};
pub use link::{DocTarget, LinkKind};
