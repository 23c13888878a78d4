// src/packages/extractor.rs

//! Package identity extraction from installed databases and package files

use crate::error::{Error, Result};
use crate::packages::identity::PackageIdentity;
use crate::packages::query::RpmCommand;
use crate::packages::rpm::HeaderReader;
use crate::packages::traits::{QueryTarget, RpmQuery};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Location of the RPM database relative to a filesystem root
pub const RPM_DB_RELATIVE_PATH: &str = "var/lib/rpm";

/// Extension every standalone package file must carry
pub const RPM_FILE_EXTENSION: &str = ".rpm";

/// How standalone package files are queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileBackend {
    /// Parse the header in-process
    #[default]
    Header,
    /// Shell out to `rpm -qp`
    Command,
}

impl FromStr for FileBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "header" => Ok(FileBackend::Header),
            "rpm" | "command" => Ok(FileBackend::Command),
            other => Err(format!("unknown file backend '{}' (expected header or rpm)", other)),
        }
    }
}

impl fmt::Display for FileBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileBackend::Header => write!(f, "header"),
            FileBackend::Command => write!(f, "rpm"),
        }
    }
}

/// Extractor settings
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// `rpm` executable used for database queries (and file queries with
    /// [`FileBackend::Command`])
    pub rpm_binary: PathBuf,
    pub file_backend: FileBackend,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            rpm_binary: PathBuf::from("rpm"),
            file_backend: FileBackend::default(),
        }
    }
}

impl ExtractorConfig {
    pub fn with_rpm_binary(mut self, rpm_binary: impl Into<PathBuf>) -> Self {
        self.rpm_binary = rpm_binary.into();
        self
    }

    pub fn with_file_backend(mut self, file_backend: FileBackend) -> Self {
        self.file_backend = file_backend;
        self
    }
}

/// Produces one [`PackageIdentity`] per request, or an error
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor {
    file_backend: FileBackend,
    command: RpmCommand,
    header: HeaderReader,
}

impl MetadataExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            file_backend: config.file_backend,
            command: RpmCommand::new(config.rpm_binary),
            header: HeaderReader,
        }
    }

    /// Identity of package `name` installed in the snapshot rooted at `root`
    ///
    /// # Errors
    ///
    /// * [`Error::DatabaseNotFound`] when `root` has no RPM database
    /// * [`Error::PackageNotInstalled`] when the query finds nothing usable
    pub fn query_installed(&self, root: &Path, name: &str) -> Result<PackageIdentity> {
        let db_path = root.join(RPM_DB_RELATIVE_PATH);
        if !db_path.is_dir() {
            return Err(Error::DatabaseNotFound(db_path.display().to_string()));
        }

        info!("Querying {} in RPM database {}", name, db_path.display());
        self.query(&QueryTarget::Database {
            db_path,
            name: name.to_string(),
        })
    }

    /// Identity of a standalone package file
    ///
    /// The extension check happens before any I/O.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidPackagePath`] when `path` does not end with `.rpm`
    /// * [`Error::FileQueryFailed`] when the file is missing or unreadable
    pub fn query_file(&self, path: &Path) -> Result<PackageIdentity> {
        validate_package_path(path)?;
        self.query(&QueryTarget::File(path.to_path_buf()))
    }

    /// [`Self::query_file`] for many files at once, in input order
    pub fn query_files<P>(&self, paths: &[P]) -> Vec<Result<PackageIdentity>>
    where
        P: AsRef<Path> + Sync,
    {
        paths
            .par_iter()
            .map(|path| self.query_file(path.as_ref()))
            .collect()
    }

    /// Run a query against whichever backend handles `target`
    pub fn query(&self, target: &QueryTarget) -> Result<PackageIdentity> {
        let backend: &dyn RpmQuery = match (target, self.file_backend) {
            (QueryTarget::Database { .. }, _) => &self.command,
            (QueryTarget::File(_), FileBackend::Command) => &self.command,
            (QueryTarget::File(_), FileBackend::Header) => &self.header,
        };

        let identity = backend.query(target)?;
        debug!("Resolved {:?} to {}", target, identity.nevr());
        Ok(identity)
    }
}

/// Reject paths that do not look like a package file
pub fn validate_package_path(path: &Path) -> Result<()> {
    let display = path.display().to_string();
    if !display.ends_with(RPM_FILE_EXTENSION) {
        return Err(Error::InvalidPackagePath(display));
    }
    Ok(())
}
