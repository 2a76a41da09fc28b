//! Symbolic path references and the registry of named directories.
//!
//! A site declares named directories (`docs`, `themes`, `assets`, ...) once at
//! startup. The [`PathRegistry`] holds them for the process lifetime and the
//! [`AliasResolver`] turns references such as `@themes/brand` into physical
//! paths by longest-prefix matching.

#![warn(missing_docs)]

pub mod alias;
pub mod category;
pub mod error;
pub mod registry;

pub use alias::{AliasResolver, ResolvedAlias, REFERENCE_MARKER, SEPARATOR};
pub use category::PathCategory;
pub use error::PathError;
pub use registry::{PathEntry, PathRegistry, RESERVED_KEYS};
