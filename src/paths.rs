//! Path utilities for notecraft data.
//!
//! Centralizes where the catalog and generated assets live:
//!
//! - [`get_data_dir`] - data root (`storage.data_dir`, `NOTECRAFT_HOME` or `./data`)
//! - [`get_catalog_path`] - `<data>/db.json` (JSON snapshot backend)
//! - [`get_catalog_redb_path`] - `<data>/catalog.redb` (redb backend)
//! - [`get_uploads_dir`] - `<data>/uploads/` (generated images)

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::constants;

/// Get the data directory.
///
/// Resolution order:
/// 1. `configured` (the `storage.data_dir` config value), if non-empty
/// 2. `NOTECRAFT_HOME` environment variable, if non-empty
/// 3. `./data` relative to the current directory
pub fn get_data_dir(configured: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = configured
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    if let Ok(home) = std::env::var(constants::HOME_ENV)
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home));
    }

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(cwd.join(constants::DEFAULT_DATA_DIR))
}

/// Get the JSON catalog path: `<data>/db.json`
pub fn get_catalog_path(data_dir: &Path) -> PathBuf {
    data_dir.join(constants::CATALOG_FILE)
}

/// Get the redb catalog path: `<data>/catalog.redb`
pub fn get_catalog_redb_path(data_dir: &Path) -> PathBuf {
    data_dir.join(constants::CATALOG_REDB_FILE)
}

/// Get the asset directory: `<data>/uploads/`
pub fn get_uploads_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(constants::UPLOADS_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    // NOTECRAFT_HOME is not exercised here: setting env vars needs `unsafe`
    // under edition 2024.

    #[test]
    fn test_configured_dir_wins() {
        let dir = get_data_dir(Some("/srv/notecraft")).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/notecraft"));
    }

    #[test]
    fn test_blank_configured_dir_is_ignored() {
        let dir = get_data_dir(Some("   ")).unwrap();
        assert_ne!(dir, PathBuf::from("   "));
        if std::env::var(constants::HOME_ENV).is_err() {
            assert!(dir.ends_with(constants::DEFAULT_DATA_DIR));
        }
    }

    #[test]
    fn test_derived_paths_structure() {
        let data = PathBuf::from("/tmp/notecraft-data");
        assert_eq!(get_catalog_path(&data), data.join("db.json"));
        assert_eq!(get_catalog_redb_path(&data), data.join("catalog.redb"));
        assert_eq!(get_uploads_dir(&data), data.join("uploads"));
    }
}
