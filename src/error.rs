// src/error.rs

use thiserror::Error;

/// Core error types for rpm-metadata
///
/// Display strings are matched on by callers, so the leading and trailing
/// fragments ("Could not query RPM info", "Error querying RPM info",
/// "does not exist", "needs to end with .rpm", "Must pass only ") must stay
/// as they are.
#[derive(Error, Debug)]
pub enum Error {
    /// Package database missing from the snapshot
    #[error("RPM DB path {0} does not exist")]
    DatabaseNotFound(String),

    /// Standalone package path without the `.rpm` extension
    #[error("{0} needs to end with .rpm")]
    InvalidPackagePath(String),

    /// Identity constructed with an empty field
    #[error("Invalid package identity: {0}")]
    InvalidIdentity(String),

    /// Unparsable `[E:]V[-R]` string
    #[error("Invalid EVR string: {0}")]
    InvalidEvr(String),

    /// Query dispatch called with both or neither target
    #[error("Must pass only one of database path or file path")]
    AmbiguousQuery,

    /// Installed-database lookup found nothing usable
    #[error("Could not query RPM info for {name}: {diagnostic}")]
    PackageNotInstalled { name: String, diagnostic: String },

    /// Header query against a standalone file failed
    #[error("Error querying RPM info for {path}: {diagnostic}")]
    FileQueryFailed { path: String, diagnostic: String },

    /// Ordering requested across two different packages
    #[error("Cannot compare different package names: {0} vs {1}")]
    NameMismatch(String, String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An environment precondition is missing; the caller pointed at the wrong target
    Configuration,
    /// Caller input rejected before any I/O
    Validation,
    /// Internal misuse of the query dispatch
    Argument,
    /// The query ran but found nothing or failed
    Query,
    /// Comparison across mismatched package names
    Ordering,
    /// Underlying I/O failure
    Io,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DatabaseNotFound(_) => ErrorKind::Configuration,
            Error::InvalidPackagePath(_) | Error::InvalidIdentity(_) | Error::InvalidEvr(_) => {
                ErrorKind::Validation
            }
            Error::AmbiguousQuery => ErrorKind::Argument,
            Error::PackageNotInstalled { .. } | Error::FileQueryFailed { .. } => ErrorKind::Query,
            Error::NameMismatch(..) => ErrorKind::Ordering,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result type alias using rpm-metadata's Error type
pub type Result<T> = std::result::Result<T, Error>;
