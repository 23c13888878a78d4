// src/packages/query.rs

//! Metadata queries through the external `rpm` binary

use crate::error::Result;
use crate::packages::identity::PackageIdentity;
use crate::packages::traits::{QueryTarget, RpmQuery};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// One tab-separated line per matching package; rpm expands the escapes
pub const QUERY_FORMAT: &str = "%{NAME}\\t%{EPOCH}\\t%{VERSION}\\t%{RELEASE}\\n";

/// What rpm prints for a tag the header does not carry
const UNSET_TAG: &str = "(none)";

/// Runs `rpm -q` against a database directory or `rpm -qp` against a file
#[derive(Debug, Clone)]
pub struct RpmCommand {
    binary: PathBuf,
}

impl RpmCommand {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self, target: &QueryTarget) -> Command {
        let mut cmd = Command::new(&self.binary);
        match target {
            QueryTarget::Database { db_path, name } => {
                cmd.arg("--dbpath")
                    .arg(db_path)
                    .args(["-q", "--queryformat", QUERY_FORMAT, "--"])
                    .arg(name);
            }
            QueryTarget::File(path) => {
                cmd.args(["-qp", "--queryformat", QUERY_FORMAT, "--"]).arg(path);
            }
        }
        cmd
    }
}

impl Default for RpmCommand {
    fn default() -> Self {
        Self::new("rpm")
    }
}

impl RpmQuery for RpmCommand {
    fn query(&self, target: &QueryTarget) -> Result<PackageIdentity> {
        let mut cmd = self.command(target);
        debug!("Running {:?}", cmd);

        let output = cmd.output().map_err(|e| {
            target.query_error(format!("failed to run {}: {}", self.binary().display(), e))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = [stdout.trim(), stderr.trim()]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("\n");
            return Err(target.query_error(format!("{} ({})", diagnostic, output.status)));
        }

        parse_query_output(target, &stdout)
    }
}

/// Parse [`QUERY_FORMAT`] output into exactly one identity
pub fn parse_query_output(target: &QueryTarget, output: &str) -> Result<PackageIdentity> {
    let lines: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();

    let line = match lines.as_slice() {
        [] => return Err(target.query_error("query produced no output")),
        [line] => *line,
        _ => {
            return Err(target.query_error(format!(
                "query matched {} packages: {}",
                lines.len(),
                lines.join(", ")
            )));
        }
    };

    let fields: Vec<&str> = line.split('\t').collect();
    let [name, epoch, version, release] = fields.as_slice() else {
        return Err(target.query_error(format!("malformed query output: {:?}", line)));
    };

    let epoch = match epoch.trim() {
        "" | UNSET_TAG => 0,
        raw => raw
            .parse::<u32>()
            .map_err(|_| target.query_error(format!("epoch {:?} is not a number", raw)))?,
    };

    if let QueryTarget::Database { name: wanted, .. } = target {
        if wanted != name {
            warn!("Queried {} but rpm reported {}", wanted, name);
        }
    }

    PackageIdentity::new(*name, epoch, *version, *release)
        .map_err(|e| target.query_error(e.to_string()))
}
