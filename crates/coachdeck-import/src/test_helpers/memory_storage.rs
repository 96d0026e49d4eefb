//! Mock Storage implementation that keeps objects in memory

use async_trait::async_trait;
use coachdeck_storage::{Storage, StorageBackend, StorageError, StorageResult};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

pub struct MemoryStorage {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    upload_order: Mutex<Vec<String>>,
    failing_fragments: Mutex<HashSet<String>>,
    base_url: String,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(BTreeMap::new()),
            upload_order: Mutex::new(Vec::new()),
            failing_fragments: Mutex::new(HashSet::new()),
            base_url: "https://storage.example.com".to_string(),
        }
    }

    /// Reject uploads whose key contains `fragment`.
    pub fn fail_uploads_containing(&self, fragment: &str) {
        self.failing_fragments
            .lock()
            .unwrap()
            .insert(fragment.to_string());
    }

    /// Keys in the order uploads were attempted, failed ones included.
    pub fn upload_order(&self) -> Vec<String> {
        self.upload_order.lock().unwrap().clone()
    }

    pub fn stored_keys(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    pub fn get_file(&self, key: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(key).cloned()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        self.upload_order
            .lock()
            .unwrap()
            .push(storage_key.to_string());

        let should_fail = self
            .failing_fragments
            .lock()
            .unwrap()
            .iter()
            .any(|fragment| storage_key.contains(fragment.as_str()));
        if should_fail {
            return Err(StorageError::UploadFailed(format!(
                "simulated failure for {}",
                storage_key
            )));
        }

        let mut files = self.files.lock().unwrap();
        if files.contains_key(storage_key) {
            return Err(StorageError::AlreadyExists(storage_key.to_string()));
        }
        files.insert(storage_key.to_string(), data);
        Ok(format!("{}/{}", self.base_url, storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.get_file(storage_key)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.files.lock().unwrap().remove(storage_key);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
