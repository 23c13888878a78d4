// src/lib.rs

//! RPM package identity extraction and version comparison
//!
//! Produces `(name, epoch, version, release)` identities from an installed
//! RPM database or a standalone `.rpm` file, and orders two builds of the
//! same package with RPM's own version comparison rules.
//!
//! # Architecture
//!
//! - `packages`: identity extraction, one query per request, no caching
//! - `version`: `rpmvercmp` segment comparison and EVR ordering
//! - Errors carry stable message prefixes that callers match on

mod error;
pub mod packages;
pub mod version;

pub use error::{Error, ErrorKind, Result};
pub use packages::{MetadataExtractor, PackageIdentity};
pub use version::{Evr, compare, rpmvercmp};
