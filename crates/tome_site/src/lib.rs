//! The owned context tying a site's paths, cache, diagnostics and themes together.
//!
//! A host builds one [`SiteContext`] from the site configuration and routes
//! every theme request and file-system event through it.

#![warn(missing_docs)]

pub mod context;
pub mod error;

pub use context::SiteContext;
pub use error::SiteError;
