// tests/integration_test.rs

//! Integration tests for rpm-metadata
//!
//! Package files are built on the fly with the rpm crate. Tests that need
//! the `rpm` executable return early when it is not installed.

use rpm_metadata::packages::{ExtractorConfig, FileBackend, MetadataExtractor};
use rpm_metadata::{Error, ErrorKind, PackageIdentity, compare};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::process::Command;

fn build_rpm(dir: &Path, file_name: &str, name: &str, epoch: u32, version: &str, release: &str) -> PathBuf {
    let mut builder = rpm::PackageBuilder::new(name, version, "MIT", "noarch", "test package")
        .release(release);
    if epoch != 0 {
        builder = builder.epoch(epoch);
    }
    let pkg = builder.build().unwrap();

    let path = dir.join(file_name);
    let mut out = std::fs::File::create(&path).unwrap();
    pkg.write(&mut out).unwrap();
    path
}

fn rpm_available() -> bool {
    Command::new("rpm")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[test]
fn test_file_identity_from_header() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = build_rpm(
        temp_dir.path(),
        "arbitrary_unused_name.rpm",
        "rpm-test-sheep",
        0,
        "0.3.5.beta",
        "l33t.deadbeef.777",
    );

    let id = MetadataExtractor::default().query_file(&path).unwrap();
    assert_eq!(id.name(), "rpm-test-sheep");
    assert_eq!(id.epoch(), 0);
    assert_eq!(id.version(), "0.3.5.beta");
    assert_eq!(id.release(), "l33t.deadbeef.777");
}

#[test]
fn test_file_identity_with_epoch() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = build_rpm(temp_dir.path(), "goat.rpm", "rpm-test-goat", 2, "1.0", "1");

    let id = MetadataExtractor::default().query_file(&path).unwrap();
    assert_eq!(id.epoch(), 2);
    assert_eq!(id.nevr(), "rpm-test-goat-2:1.0-1");
}

#[test]
fn test_file_errors() {
    let extractor = MetadataExtractor::default();

    let err = extractor.query_file(Path::new("idontexist.rpm")).unwrap_err();
    assert!(err.to_string().starts_with("Error querying RPM info"));

    let err = extractor.query_file(Path::new("idontendwithdotrpm")).unwrap_err();
    assert!(err.to_string().ends_with(" needs to end with .rpm"));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_snapshot_without_database() {
    let hello_root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(hello_root.path().join("etc")).unwrap();

    let err = MetadataExtractor::default()
        .query_installed(hello_root.path(), "rpm-test-mice")
        .unwrap_err();
    assert!(matches!(err, Error::DatabaseNotFound(_)));
    assert!(err.to_string().ends_with(" does not exist"));
}

#[test]
fn test_compare_extracted_files() {
    let temp_dir = tempfile::tempdir().unwrap();
    let older = build_rpm(temp_dir.path(), "a.rpm", "rpm-test-cake", 0, "1.0~rc1", "1");
    let newer = build_rpm(temp_dir.path(), "b.rpm", "rpm-test-cake", 0, "1.0", "1");
    let other = build_rpm(temp_dir.path(), "c.rpm", "rpm-test-cheese", 0, "1.0", "1");

    let results = MetadataExtractor::default().query_files(&[&older, &newer, &other]);
    let ids: Vec<PackageIdentity> = results.into_iter().map(|r| r.unwrap()).collect();

    assert_eq!(compare(&ids[0], &ids[1]).unwrap(), Ordering::Less);
    assert_eq!(compare(&ids[1], &ids[0]).unwrap(), Ordering::Greater);
    assert_eq!(compare(&ids[1], &ids[1]).unwrap(), Ordering::Equal);

    let err = compare(&ids[1], &ids[2]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Ordering);
}

#[test]
fn test_file_identity_from_rpm_command() {
    if !rpm_available() {
        eprintln!("rpm not installed, skipping");
        return;
    }

    let temp_dir = tempfile::tempdir().unwrap();
    let path = build_rpm(temp_dir.path(), "mice.rpm", "rpm-test-mice", 0, "0.1", "a");

    let extractor =
        MetadataExtractor::new(ExtractorConfig::default().with_file_backend(FileBackend::Command));
    let id = extractor.query_file(&path).unwrap();
    assert_eq!(id.name(), "rpm-test-mice");
    assert_eq!(id.epoch(), 0);
    assert_eq!(id.version(), "0.1");
    assert_eq!(id.release(), "a");

    let err = extractor.query_file(Path::new("idontexist.rpm")).unwrap_err();
    assert!(err.to_string().starts_with("Error querying RPM info"));
}

#[test]
fn test_installed_identity_from_snapshot() {
    if !rpm_available() {
        eprintln!("rpm not installed, skipping");
        return;
    }

    let root = tempfile::tempdir().unwrap();
    let db_path = root.path().join("var/lib/rpm");
    std::fs::create_dir_all(&db_path).unwrap();
    let pkg = build_rpm(root.path(), "mice.rpm", "rpm-test-mice", 0, "0.1", "a");

    let installed = Command::new("rpm")
        .arg("--dbpath")
        .arg(&db_path)
        .args(["-i", "--justdb", "--nodeps", "--nosignature", "--nodigest", "--noscripts"])
        .arg(&pkg)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !installed {
        eprintln!("could not seed a private rpm database, skipping");
        return;
    }

    let extractor = MetadataExtractor::default();
    let id = extractor.query_installed(root.path(), "rpm-test-mice").unwrap();
    assert_eq!(id.name(), "rpm-test-mice");
    assert_eq!(id.epoch(), 0);
    assert_eq!(id.version(), "0.1");
    assert_eq!(id.release(), "a");

    // not installed
    let err = extractor
        .query_installed(root.path(), "rpm-test-carrot")
        .unwrap_err();
    assert!(err.to_string().starts_with("Could not query RPM info"));
    assert_eq!(err.kind(), ErrorKind::Query);
}

/// Stand-in `rpm` that knows one package and prints it in the query format
#[cfg(unix)]
fn write_fake_rpm(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
for last; do :; done
case "$last" in
    rpm-test-mice|*/mice.rpm)
        printf 'rpm-test-mice\t(none)\t0.1\ta\n'
        ;;
    *)
        echo "package $last is not installed"
        exit 1
        ;;
esac
"#;
    let path = dir.join("fake-rpm");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[test]
fn test_installed_identity_through_configured_binary() {
    let bin_dir = tempfile::tempdir().unwrap();
    let fake_rpm = write_fake_rpm(bin_dir.path());

    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("var/lib/rpm")).unwrap();

    let extractor = MetadataExtractor::new(ExtractorConfig::default().with_rpm_binary(&fake_rpm));
    let id = extractor.query_installed(root.path(), "rpm-test-mice").unwrap();
    assert_eq!(id.name(), "rpm-test-mice");
    assert_eq!(id.epoch(), 0);
    assert_eq!(id.version(), "0.1");
    assert_eq!(id.release(), "a");

    let err = extractor
        .query_installed(root.path(), "rpm-test-carrot")
        .unwrap_err();
    assert!(matches!(err, Error::PackageNotInstalled { .. }));
    assert!(err.to_string().starts_with("Could not query RPM info for rpm-test-carrot"));
    assert!(err.to_string().contains("package rpm-test-carrot is not installed"));
    assert_eq!(err.kind(), ErrorKind::Query);
}

#[cfg(unix)]
#[test]
fn test_file_identity_through_configured_binary() {
    let bin_dir = tempfile::tempdir().unwrap();
    let fake_rpm = write_fake_rpm(bin_dir.path());

    let extractor = MetadataExtractor::new(
        ExtractorConfig::default()
            .with_rpm_binary(&fake_rpm)
            .with_file_backend(FileBackend::Command),
    );
    let id = extractor.query_file(Path::new("/srv/pkgs/mice.rpm")).unwrap();
    assert_eq!(id.nevr(), "rpm-test-mice-0:0.1-a");

    let err = extractor.query_file(Path::new("/srv/pkgs/carrot.rpm")).unwrap_err();
    assert!(matches!(err, Error::FileQueryFailed { .. }));
    assert!(err.to_string().starts_with("Error querying RPM info for /srv/pkgs/carrot.rpm"));
}
