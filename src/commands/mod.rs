//! CLI command implementations for notecraft.
//!
//! - [`serve`] - Run the HTTP API
//! - [`migrate`] - Upgrade the catalog in place
//! - [`check`] - Validate configuration

pub mod check;
pub mod migrate;
pub mod serve;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::assets::AssetStore;
use crate::catalog::{CatalogService, CatalogStore};
use crate::config::{BackendKind, Config};
use crate::paths;

/// Load the config file and fail on validation errors, printing warnings.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = Config::load_or_default(path)?;
    let validation = config.validate()?;
    crate::ui::print_warnings(&validation.warnings);
    Ok(config)
}

/// Open the catalog and asset store configured in `[storage]`.
pub(crate) fn open_catalog(config: &Config) -> Result<CatalogService> {
    let data_dir = paths::get_data_dir(config.storage.data_dir.as_deref())?;

    let store = match config.storage.backend {
        BackendKind::Json => CatalogStore::file(paths::get_catalog_path(&data_dir))?,
        BackendKind::Redb => CatalogStore::redb(paths::get_catalog_redb_path(&data_dir))?,
    };
    let assets = AssetStore::open(paths::get_uploads_dir(&data_dir))
        .context("Failed to open asset store")?;

    info!(
        data_dir = %data_dir.display(),
        backend = store.backend_name(),
        "Opened catalog"
    );
    Ok(CatalogService::new(store, assets))
}
