//! Generated image assets on disk.
//!
//! Assets live under a single root directory in a date-partitioned layout
//! (`YYYY/MM/DD/{id}.{ext}`). Every path that comes from a client or from the
//! catalog is sanitized and checked against the root before it touches the
//! filesystem.
//!
//! # Example
//!
//! ```ignore
//! use notecraft::assets::AssetStore;
//!
//! let assets = AssetStore::open("./data/uploads")?;
//! let stored = assets.write_new("png", png_bytes, Utc::now()).await?;
//! let bytes = assets.read(&stored.storage_path).await?;
//! ```

mod content_type;
mod store;

pub use content_type::{extension_for_mime, guess_content_type, mime_for_path};
pub use store::{AssetStore, StoredAsset};
