//! Backend trait for catalog persistence.
//!
//! A backend stores one opaque JSON document: the whole catalog snapshot.
//! Parsing, migration and provisioning happen above it in
//! [`CatalogStore`](super::CatalogStore), so every backend gets them for free.

use anyhow::Result;
use async_trait::async_trait;

/// Backend trait for catalog snapshot storage.
///
/// All backends must be thread-safe (`Send + Sync`) for use with tokio.
///
/// # Example
///
/// ```ignore
/// use notecraft::catalog::{CatalogBackend, MemoryBackend};
///
/// let backend = MemoryBackend::new();
/// backend.write(br#"{"images":[],"folders":[]}"#.to_vec()).await?;
/// let doc = backend.read().await?;
/// ```
#[async_trait]
pub trait CatalogBackend: Send + Sync + 'static {
    /// Reads the persisted document.
    ///
    /// Returns `Ok(None)` if nothing has been persisted yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    async fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replaces the persisted document.
    ///
    /// Must be atomic from a reader's perspective: a concurrent `read` sees
    /// either the previous document or the new one, never a mix.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written (disk full,
    /// permission denied, ...).
    async fn write(&self, document: Vec<u8>) -> Result<()>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
