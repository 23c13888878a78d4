// src/packages/mod.rs

//! Package identity extraction
//!
//! Installed packages are looked up through the `rpm` binary against the
//! database inside a filesystem snapshot. Standalone package files are read
//! either in-process or through `rpm -qp`. Every path ends in a
//! `PackageIdentity`.

pub mod extractor;
pub mod identity;
pub mod query;
pub mod rpm;
pub mod traits;

pub use extractor::{ExtractorConfig, FileBackend, MetadataExtractor};
pub use identity::PackageIdentity;
pub use traits::{QueryTarget, RpmQuery};
