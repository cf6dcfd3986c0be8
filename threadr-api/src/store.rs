/// A host key-value store holding whole serialized blobs
///
/// Implementations replace the blob atomically on `set`: a reader sees either
/// the previous blob or the new one, never a mix.
pub trait BlobStore {
    /// Returns `Ok(None)` if nothing was ever stored under `key`
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, blob: &str) -> anyhow::Result<()>;
}

impl<S: BlobStore + ?Sized> BlobStore for Box<S> {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, blob: &str) -> anyhow::Result<()> {
        (**self).set(key, blob)
    }
}
