//! In-memory catalog backend.
//!
//! Holds the document in process memory. Ideal for tests and for embedding.

use super::backend::CatalogBackend;
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

/// In-memory catalog backend.
///
/// `Clone` shares the same document, so a test can keep a handle and inspect
/// what the store persisted.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    document: Arc<RwLock<Option<Vec<u8>>>>,
}

impl MemoryBackend {
    /// Creates an empty backend (nothing persisted yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that already holds `document`.
    pub fn with_document(document: impl Into<Vec<u8>>) -> Self {
        Self {
            document: Arc::new(RwLock::new(Some(document.into()))),
        }
    }

    /// Returns the currently persisted document, if any.
    pub fn document(&self) -> Option<Vec<u8>> {
        self.document.read().clone()
    }
}

#[async_trait]
impl CatalogBackend for MemoryBackend {
    async fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.document.read().clone())
    }

    async fn write(&self, document: Vec<u8>) -> Result<()> {
        *self.document.write() = Some(document);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
