//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `resolve_path`)
//! - [`route`]: URL path helpers (`is_external_link`, `split_path_fragment`, `with_base_path`)

pub mod fs;
pub mod route;

pub use fs::{normalize_path, resolve_path};
