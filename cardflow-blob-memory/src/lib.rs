#![deny(missing_docs)]
//! In-memory implementation of `cardflow_core::BlobStore`.
//!
//! Grounded on `neuron-state-memory::MemoryStore`: a `HashMap` behind a
//! `tokio::sync::RwLock`, keyed by a composite of its two-part key to
//! give buckets full isolation without needing one map per bucket.

use async_trait::async_trait;
use cardflow_core::BackendError;
use cardflow_core::BlobStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory blob store backed by a `HashMap` behind a `RwLock`.
///
/// Suitable for testing, prototyping, and single-process use cases
/// where persistence across restarts is not required.
pub struct MemoryBlobStore {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create a new empty in-memory blob store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

fn composite_key(bucket: &str, key: &str) -> String {
    format!("{bucket}\0{key}")
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), BackendError> {
        let mut data = self.data.write().await;
        data.insert(composite_key(bucket, key), bytes);
        Ok(())
    }

    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BackendError> {
        let data = self.data.read().await;
        data.get(&composite_key(bucket, key))
            .cloned()
            .ok_or_else(|| BackendError::BlobStore(format!("no object at {bucket}/{key}")))
    }
}
