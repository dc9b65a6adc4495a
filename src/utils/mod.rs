//! Shared helpers used across the redirect tracer and link validator.

pub mod path;
mod plural;

pub use plural::{plural_count, plural_s};
