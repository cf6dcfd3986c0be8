use std::collections::HashMap;

use anyhow::anyhow;
use threadr_api::BlobStore;

/// In-memory `BlobStore` for tests, which records every write and can be
/// told to fail
#[derive(Debug, Default)]
pub struct MockStore {
    blobs: HashMap<String, String>,
    writes: Vec<String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MockStore {
    pub fn new() -> MockStore {
        MockStore::default()
    }

    /// A store that already holds `blob` under `key`
    pub fn with_blob(key: &str, blob: &str) -> MockStore {
        let mut res = MockStore::new();
        res.blobs.insert(String::from(key), String::from(blob));
        res
    }

    pub fn test_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn test_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Return the number of successful writes so far
    pub fn test_num_writes(&self) -> usize {
        self.writes.len()
    }

    /// Return the keys of successful writes, in order
    pub fn test_written_keys(&self) -> &[String] {
        &self.writes
    }

    pub fn test_blob(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(|b| b as &str)
    }
}

impl BlobStore for MockStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        if self.fail_reads {
            return Err(anyhow!("mock store refused to read {key:?}"));
        }
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, blob: &str) -> anyhow::Result<()> {
        if self.fail_writes {
            return Err(anyhow!("mock store refused to write {key:?}"));
        }
        self.blobs.insert(String::from(key), String::from(blob));
        self.writes.push(String::from(key));
        Ok(())
    }
}
