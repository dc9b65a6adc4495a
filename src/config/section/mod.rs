//! Configuration section definitions.
//!
//! Each module corresponds to a section in `docroute.toml`:
//!
//! | Module      | TOML Section  | Purpose                              |
//! |-------------|---------------|--------------------------------------|
//! | `site`      | `[site]`      | Documentation base path              |
//! | `redirects` | `[redirects]` | Rule tables and site directory       |
//! | `links`     | `[links]`     | Manifest, content and link policy    |

mod links;
mod redirects;
mod site;

pub use links::{LinkLevel, LinksSection};
pub use redirects::RedirectsSection;
pub use site::SiteSection;
