// src/packages/rpm.rs

//! In-process RPM header reader

use crate::error::Result;
use crate::packages::identity::PackageIdentity;
use crate::packages::traits::{QueryTarget, RpmQuery};
use rpm::PackageMetadata;
use std::fs::File;
use std::io::BufReader;
use tracing::debug;

/// Reads name, epoch, version and release straight from a package header
///
/// Only the lead, signature and main header are read; the payload is
/// never touched. Installed databases are out of its reach.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderReader;

impl RpmQuery for HeaderReader {
    fn query(&self, target: &QueryTarget) -> Result<PackageIdentity> {
        let path = match target {
            QueryTarget::File(path) => path,
            QueryTarget::Database { .. } => {
                return Err(target.query_error("header reader cannot query an installed database"));
            }
        };

        debug!("Reading RPM header: {}", path.display());

        let file = File::open(path)
            .map_err(|e| target.query_error(format!("failed to open RPM file: {}", e)))?;
        let mut buf_reader = BufReader::new(file);

        let metadata = PackageMetadata::parse(&mut buf_reader)
            .map_err(|e| target.query_error(format!("failed to parse RPM header: {}", e)))?;

        let name = metadata
            .get_name()
            .map_err(|e| target.query_error(format!("failed to get package name: {}", e)))?;
        let version = metadata
            .get_version()
            .map_err(|e| target.query_error(format!("failed to get package version: {}", e)))?;
        let release = metadata
            .get_release()
            .map_err(|e| target.query_error(format!("failed to get package release: {}", e)))?;
        let epoch = header_epoch(target, metadata.get_epoch())?;

        debug!("Parsed RPM header: {}-{}:{}-{}", name, epoch, version, release);

        PackageIdentity::new(name, epoch, version, release)
            .map_err(|e| target.query_error(e.to_string()))
    }
}

/// Only a missing epoch tag means epoch 0; anything else is a bad header
fn header_epoch(
    target: &QueryTarget,
    lookup: std::result::Result<u32, rpm::Error>,
) -> Result<u32> {
    match lookup {
        Ok(epoch) => Ok(epoch),
        Err(rpm::Error::TagNotFound(_)) => Ok(0),
        Err(e) => Err(target.query_error(format!("failed to get package epoch: {}", e))),
    }
}
