// src/packages/traits.rs

//! Query dispatch shared by the installed-database and standalone-file paths

use crate::error::{Error, Result};
use crate::packages::identity::PackageIdentity;
use std::path::{Path, PathBuf};

/// What a metadata query runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    /// An installed package, looked up by name in an RPM database directory
    Database { db_path: PathBuf, name: String },
    /// A standalone package file, read directly from its header
    File(PathBuf),
}

impl QueryTarget {
    /// Build a target from optional parts
    ///
    /// Exactly one of `db_path` and `file_path` must be given. A database
    /// target also needs the package `name`; it is ignored for files.
    pub fn from_paths(
        db_path: Option<&Path>,
        file_path: Option<&Path>,
        name: Option<&str>,
    ) -> Result<Self> {
        match (db_path, file_path, name) {
            (Some(db_path), None, Some(name)) => Ok(QueryTarget::Database {
                db_path: db_path.to_path_buf(),
                name: name.to_string(),
            }),
            (None, Some(file_path), _) => Ok(QueryTarget::File(file_path.to_path_buf())),
            _ => Err(Error::AmbiguousQuery),
        }
    }

    /// Wrap a backend diagnostic into the query error for this target
    pub fn query_error(&self, diagnostic: impl Into<String>) -> Error {
        match self {
            QueryTarget::Database { name, .. } => Error::PackageNotInstalled {
                name: name.clone(),
                diagnostic: diagnostic.into(),
            },
            QueryTarget::File(path) => Error::FileQueryFailed {
                path: path.display().to_string(),
                diagnostic: diagnostic.into(),
            },
        }
    }
}

/// A mechanism that turns a [`QueryTarget`] into exactly one identity
pub trait RpmQuery {
    /// Run the query; failures come back as the target's query error
    fn query(&self, target: &QueryTarget) -> Result<PackageIdentity>;
}
