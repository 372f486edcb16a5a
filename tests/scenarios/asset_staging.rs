//! Test: optional asset staging

use crate::helpers::*;
use wasm_pipeline::core::config::BuildConfig;
use std::path::PathBuf;

/// No assets directory: staging is a no-op and the build still succeeds
#[tokio::test]
async fn test_missing_assets_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let result = run_successfully(&config).await;

    assert_pipeline_succeeded(&result);
    assert!(snapshot(&dir.path().join("pkg")).is_empty());
}

/// Nested assets are copied with identical relative paths and bytes
#[tokio::test]
async fn test_assets_copied_with_structure() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "assets/a.txt", b"alpha");
    write_file(dir.path(), "assets/sub/b.txt", b"\x00\x01binary\xff");
    let config = config_in(dir.path());

    let result = run_successfully(&config).await;

    assert_pipeline_succeeded(&result);
    assert_eq!(
        snapshot(&dir.path().join("pkg").join("assets")),
        snapshot(&dir.path().join("assets"))
    );
    assert_eq!(
        std::fs::read(dir.path().join("pkg/assets/sub/b.txt")).unwrap(),
        b"\x00\x01binary\xff"
    );
}

/// A custom assets directory lands under its own name in the output
#[tokio::test]
async fn test_custom_assets_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "static/index.html", b"<html></html>");
    let config = BuildConfig {
        assets_dir: Some(PathBuf::from("static")),
        out_dir: PathBuf::from("dist"),
        ..config_in(dir.path())
    };

    let result = run_successfully(&config).await;

    assert_pipeline_succeeded(&result);
    assert!(dir.path().join("dist/static/index.html").exists());
}

/// Staging disabled: the stager is never called
#[tokio::test]
async fn test_disabled_assets_never_staged() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "assets/a.txt", b"alpha");
    let config = BuildConfig {
        assets_dir: None,
        ..config_in(dir.path())
    };

    let result = run_successfully(&config).await;

    assert_pipeline_succeeded(&result);
    assert_calls(&result, &["run:compile"]);
    assert!(!dir.path().join("pkg").exists());
}

/// Assets kept inside the output directory are rejected up front
#[tokio::test]
async fn test_assets_inside_out_dir_rejected_by_validation() {
    let dir = tempfile::tempdir().unwrap();
    let config = BuildConfig {
        assets_dir: Some(PathBuf::from("pkg/assets")),
        ..config_in(dir.path())
    };

    assert!(config.validate().is_err());
}

/// Even without validation, staging a directory onto itself fails and leaves
/// the assets intact
#[tokio::test]
async fn test_staging_onto_itself_keeps_assets() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "pkg/assets/logo.png", b"PNGDATA");
    let config = BuildConfig {
        assets_dir: Some(PathBuf::from("pkg/assets")),
        ..config_in(dir.path())
    };

    let result = run_successfully(&config).await;

    assert_pipeline_failed(&result);
    assert_eq!(result.outcome.exit_code(), 1);
    assert_eq!(
        std::fs::read(dir.path().join("pkg/assets/logo.png")).unwrap(),
        b"PNGDATA"
    );
}
