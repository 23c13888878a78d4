// src/packages/identity.rs

//! Package identity: the (name, epoch, version, release) tuple

use crate::error::{Error, Result};
use crate::version::Evr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one RPM package build
///
/// Immutable once built. Two identities are only orderable when their
/// names match, see [`crate::version::compare`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawIdentity")]
pub struct PackageIdentity {
    name: String,
    #[serde(flatten)]
    evr: Evr,
}

/// Unvalidated wire form, only turned into an identity through `new`
#[derive(Deserialize)]
struct RawIdentity {
    name: String,
    #[serde(default)]
    epoch: u32,
    version: String,
    release: String,
}

impl TryFrom<RawIdentity> for PackageIdentity {
    type Error = Error;

    fn try_from(raw: RawIdentity) -> Result<Self> {
        Self::new(raw.name, raw.epoch, raw.version, raw.release)
    }
}

impl PackageIdentity {
    /// Build an identity, rejecting empty name, version or release
    pub fn new(
        name: impl Into<String>,
        epoch: u32,
        version: impl Into<String>,
        release: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let version = version.into();
        let release = release.into();

        for (field, value) in [("name", &name), ("version", &version), ("release", &release)] {
            if value.is_empty() {
                return Err(Error::InvalidIdentity(format!("{} must not be empty", field)));
            }
        }

        Ok(Self {
            name,
            evr: Evr::new(epoch, version, release),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn epoch(&self) -> u32 {
        self.evr.epoch()
    }

    pub fn version(&self) -> &str {
        self.evr.version()
    }

    pub fn release(&self) -> &str {
        self.evr.release()
    }

    pub fn evr(&self) -> &Evr {
        &self.evr
    }

    /// `NAME-EPOCH:VERSION-RELEASE` with the epoch always present
    pub fn nevr(&self) -> String {
        format!("{}-{}", self.name, self.evr.as_normalized_form())
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.evr)
    }
}
