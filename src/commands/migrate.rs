//! Upgrade the persisted catalog in place.
//!
//! Loading the catalog already migrates legacy records and provisions genre
//! folders (and persists the result when anything changed); this command runs
//! that step eagerly and reports what the catalog now holds.

use anyhow::Result;
use std::path::Path;

use super::{load_config, open_catalog};

pub async fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let catalog = open_catalog(&config)?;

    let snapshot = catalog.store().load().await?;
    let uncategorized = snapshot
        .images
        .iter()
        .filter(|image| image.is_uncategorized())
        .count();

    println!("Catalog is up to date ({} backend)", catalog.store().backend_name());
    println!("  images:        {}", snapshot.images.len());
    println!("  uncategorized: {uncategorized}");
    println!("  folders:       {}", snapshot.folders.len());
    Ok(())
}
