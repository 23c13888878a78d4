// src/version.rs

//! RPM version comparison
//!
//! Implements the `rpmvercmp` segment comparison used by RPM to order
//! version and release strings, and composes it with the epoch into a
//! full epoch/version/release ordering.
//!
//! Segment rules, applied position by position:
//! - characters that are not ASCII alphanumerics, `~` or `^` only separate
//!   segments and never take part in the ordering
//! - `~` sorts before everything, including the end of the string
//! - `^` sorts before any ordinary segment but after the end of the string
//! - digit runs compare numerically (leading zeros ignored) and always beat
//!   letter runs; letter runs compare bytewise
//! - when all shared segments are equal, the string with segments left wins

use crate::error::{Error, Result};
use crate::packages::identity::PackageIdentity;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Epoch, version and release of a package build
///
/// Equality and ordering follow [`rpmvercmp`], so two values may be equal
/// while their raw strings differ (`1:2-3` and `1::2>-3` are the same EVR).
#[derive(Debug, Clone, Serialize)]
pub struct Evr {
    epoch: u32,
    version: String,
    release: String,
}

impl Evr {
    pub fn new(epoch: u32, version: impl Into<String>, release: impl Into<String>) -> Self {
        Self {
            epoch,
            version: version.into(),
            release: release.into(),
        }
    }

    /// Parse the textual `[EPOCH:]VERSION[-RELEASE]` form
    ///
    /// The epoch ends at the first `:` and the release starts after the
    /// last `-`. A missing or empty epoch is 0.
    pub fn parse(evr: &str) -> Result<Self> {
        let (epoch, rest) = match evr.split_once(':') {
            Some(("", rest)) => (0, rest),
            Some((epoch, rest)) => {
                let epoch = epoch.parse::<u32>().map_err(|_| {
                    Error::InvalidEvr(format!("epoch '{}' in '{}' is not a number", epoch, evr))
                })?;
                (epoch, rest)
            }
            None => (0, evr),
        };

        let (version, release) = rest.rsplit_once('-').unwrap_or((rest, ""));
        if version.is_empty() {
            return Err(Error::InvalidEvr(format!("'{}' has an empty version", evr)));
        }

        Ok(Self::new(epoch, version, release))
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    /// `EPOCH:VERSION-RELEASE` with the epoch always present
    pub fn as_normalized_form(&self) -> String {
        format!("{}:{}-{}", self.epoch, self.version, self.release)
    }
}

impl fmt::Display for Evr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}:", self.epoch)?;
        }
        write!(f, "{}", self.version)?;
        if !self.release.is_empty() {
            write!(f, "-{}", self.release)?;
        }
        Ok(())
    }
}

impl PartialEq for Evr {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Evr {}

impl PartialOrd for Evr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Evr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| rpmvercmp(&self.version, &other.version))
            .then_with(|| rpmvercmp(&self.release, &other.release))
    }
}

/// Order two builds of the same package
///
/// Fails with [`Error::NameMismatch`] when the names differ; identities of
/// different packages have no defined order.
pub fn compare(a: &PackageIdentity, b: &PackageIdentity) -> Result<Ordering> {
    if a.name() != b.name() {
        return Err(Error::NameMismatch(a.name().to_string(), b.name().to_string()));
    }
    Ok(a.evr().cmp(b.evr()))
}

/// `-1`, `0` or `1`, the convention used by rpm's own bindings
pub fn ordering_to_int(ordering: Ordering) -> i32 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

fn is_separator(c: u8) -> bool {
    !c.is_ascii_alphanumeric() && c != b'~' && c != b'^'
}

/// Advance `pos` over the maximal run of `class` characters and return it
fn take_run<'a>(s: &'a [u8], pos: &mut usize, class: fn(&u8) -> bool) -> &'a [u8] {
    let start = *pos;
    while *pos < s.len() && class(&s[*pos]) {
        *pos += 1;
    }
    &s[start..*pos]
}

fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let a = strip_leading_zeros(a);
    let b = strip_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn strip_leading_zeros(s: &[u8]) -> &[u8] {
    let zeros = s.iter().take_while(|&&c| c == b'0').count();
    &s[zeros..]
}

/// Compare two version (or release) strings the way `rpmvercmp` does
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let one = a.as_bytes();
    let two = b.as_bytes();
    let mut i = 0;
    let mut j = 0;

    loop {
        while i < one.len() && is_separator(one[i]) {
            i += 1;
        }
        while j < two.len() && is_separator(two[j]) {
            j += 1;
        }

        let c1 = one.get(i).copied();
        let c2 = two.get(j).copied();

        match (c1, c2) {
            (Some(b'~'), Some(b'~')) => {
                i += 1;
                j += 1;
                continue;
            }
            (Some(b'~'), _) => return Ordering::Less,
            (_, Some(b'~')) => return Ordering::Greater,
            _ => {}
        }

        match (c1, c2) {
            (Some(b'^'), Some(b'^')) => {
                i += 1;
                j += 1;
                continue;
            }
            // end of string sorts below a caret
            (None, Some(b'^')) => return Ordering::Less,
            (Some(b'^'), None) => return Ordering::Greater,
            (Some(b'^'), Some(_)) => return Ordering::Less,
            (Some(_), Some(b'^')) => return Ordering::Greater,
            _ => {}
        }

        let (Some(first), Some(_)) = (c1, c2) else {
            break;
        };

        let numeric = first.is_ascii_digit();
        let class: fn(&u8) -> bool = if numeric {
            u8::is_ascii_digit
        } else {
            u8::is_ascii_alphabetic
        };

        let seg1 = take_run(one, &mut i, class);
        let seg2 = take_run(two, &mut j, class);

        // the segments are of different types: numeric wins
        if seg2.is_empty() {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let ordering = if numeric {
            compare_numeric(seg1, seg2)
        } else {
            seg1.cmp(seg2)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    match (i < one.len(), j < two.len()) {
        (false, false) => Ordering::Equal,
        (false, true) => Ordering::Less,
        (true, _) => Ordering::Greater,
    }
}
