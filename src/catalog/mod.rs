//! Image and folder catalog.
//!
//! The catalog is one JSON document holding every [`Image`] and [`Folder`]
//! record. Backends persist that document as an opaque blob:
//!
//! - **JsonFileBackend**: `db.json` replaced atomically on every save (default)
//! - **RedbBackend**: the document under a single key in an embedded database
//! - **MemoryBackend**: process memory (tests and embedding)
//!
//! [`CatalogStore`] sits on top, upgrading legacy records, provisioning genre
//! folders and serializing writers. [`CatalogService`] exposes the queries and
//! mutations the HTTP layer needs.
//!
//! # Example
//!
//! ```ignore
//! use notecraft::catalog::{CatalogService, CatalogStore, FolderFilter};
//!
//! let service = CatalogService::new(CatalogStore::file("data/db.json")?, assets);
//! let math = service.create_folder("Math").await?;
//! let page = service.list_images(&FolderFilter::Uncategorized, 1, 12).await?;
//! ```
//!
//! # Custom Backends
//!
//! Implement [`CatalogBackend`] and wrap it with [`CatalogStore::custom`].

mod backend;
mod json_file;
mod memory;
mod migration;
mod ops;
mod redb;
mod service;
mod store;
mod types;


pub use backend::CatalogBackend;
pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use migration::{MigrationReport, provision_genre_folders};
pub use redb::RedbBackend;
pub use service::CatalogService;
pub use store::{CatalogStore, CatalogTxn};
pub use types::{
    Folder, FolderFilter, FolderSummary, Image, ImagePage, MoveAction, NewImage, Snapshot,
    format_timestamp, public_url,
};
