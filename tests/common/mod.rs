//! Common test utilities and fixtures
//!
//! This module provides shared test infrastructure

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Get the valid config fixture path
pub fn valid_config_fixture() -> PathBuf {
    fixture_path("harp-version.toml")
}

/// Get the invalid config fixture path
pub fn invalid_config_fixture() -> PathBuf {
    fixture_path("invalid_config.toml")
}

/// Get a command for the harp-version binary
pub fn harp_cmd() -> Command {
    let mut cmd = Command::cargo_bin("harp-version").unwrap();
    cmd.env_remove("HARP_CONFIG")
        .env_remove("HARP_LOG_LEVEL")
        .env_remove("HARP_LOG_FILE")
        .env_remove("HARP_LOG_JSON")
        .env_remove("RUST_LOG");
    cmd
}
