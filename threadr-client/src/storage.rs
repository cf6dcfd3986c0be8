use std::{
    collections::HashSet,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::api::{BlobStore, Comment, CommentId, Error};

pub fn encode_forest(forest: &[Comment]) -> anyhow::Result<String> {
    serde_json::to_string(forest).context("serializing comment forest")
}

pub fn decode_forest(blob: &str) -> anyhow::Result<Vec<Comment>> {
    let mut de = serde_json::Deserializer::from_str(blob);
    de.disable_recursion_limit();
    let forest = Vec::<Comment>::deserialize(serde_stacker::Deserializer::new(&mut de))
        .context("parsing comment forest")?;
    de.end().context("trailing data after comment forest")?;
    Ok(forest)
}

/// Something a forest built through `CommentDb` never contains, but that an
/// older or hand-edited blob might
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Anomaly {
    BlankText(CommentId),
    DuplicateId(CommentId),
    EditedWithoutDate(CommentId),
    DateWithoutEdited(CommentId),
}

/// Lists the anomalies of a forest, in pre-order
pub fn find_anomalies(forest: &[Comment]) -> Vec<Anomaly> {
    let mut res = Vec::new();
    let mut seen = HashSet::new();
    // explicit stack, as loaded forests can be arbitrarily deep
    let mut todo = forest.iter().rev().collect::<Vec<_>>();
    while let Some(c) = todo.pop() {
        if c.text.trim().is_empty() {
            res.push(Anomaly::BlankText(c.id.clone()));
        }
        if !seen.insert(&c.id) {
            res.push(Anomaly::DuplicateId(c.id.clone()));
        }
        match (c.edited, c.edited_at.is_some()) {
            (true, false) => res.push(Anomaly::EditedWithoutDate(c.id.clone())),
            (false, true) => res.push(Anomaly::DateWithoutEdited(c.id.clone())),
            _ => (),
        }
        todo.extend(c.replies.iter().rev());
    }
    res
}

/// Saves and loads the whole forest as a single blob under a fixed key
pub struct Gateway<S> {
    store: S,
    key: String,
}

impl<S: BlobStore> Gateway<S> {
    pub fn new(store: S, key: String) -> Gateway<S> {
        Gateway { store, key }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Never fails: a missing, unreadable or corrupt blob yields an empty forest
    ///
    /// A blob that parses is kept as-is, with its anomalies logged.
    pub fn load(&self) -> Vec<Comment> {
        let blob = match self.store.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no saved comments, starting empty");
                return Vec::new();
            }
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    ?err,
                    "failed reading saved comments, starting empty"
                );
                return Vec::new();
            }
        };
        match decode_forest(&blob) {
            Ok(forest) => {
                for anomaly in find_anomalies(&forest) {
                    tracing::warn!(key = %self.key, ?anomaly, "saved comments break an invariant");
                }
                forest
            }
            Err(err) => {
                tracing::warn!(key = %self.key, ?err, "saved comments are corrupt, starting empty");
                Vec::new()
            }
        }
    }

    pub fn save(&mut self, forest: &[Comment]) -> Result<(), Error> {
        encode_forest(forest)
            .and_then(|blob| {
                self.store
                    .set(&self.key, &blob)
                    .with_context(|| format!("writing blob {:?}", self.key))
            })
            .map_err(|err| {
                tracing::error!(?err, "failed saving comments");
                Error::PersistenceUnavailable(format!("{err:#}"))
            })
    }
}

/// Stores each blob in its own file of a directory
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> anyhow::Result<FileStore> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating store directory {:?}", dir))?;
        Ok(FileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(anyhow!("invalid blob key {key:?}"));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {:?}", path)),
        }
    }

    /// Writes to a temporary file next to the target, then renames it over
    fn set(&mut self, key: &str, blob: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("creating temporary file in {:?}", self.dir))?;
        tmp.write_all(blob.as_bytes())
            .context("writing temporary file")?;
        tmp.as_file().sync_all().context("syncing temporary file")?;
        tmp.persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("replacing {:?}", path))?;
        Ok(())
    }
}

#[cfg(feature = "local-storage")]
pub use local_storage::LocalStorage;

#[cfg(feature = "local-storage")]
mod local_storage {
    use anyhow::anyhow;
    use gloo_storage::Storage;

    use crate::api::BlobStore;

    /// The browser's `window.localStorage`
    #[derive(Clone, Copy, Debug, Default)]
    pub struct LocalStorage;

    impl BlobStore for LocalStorage {
        fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            gloo_storage::LocalStorage::raw()
                .get_item(key)
                .map_err(|e| anyhow!("reading {key:?} from local storage: {e:?}"))
        }

        fn set(&mut self, key: &str, blob: &str) -> anyhow::Result<()> {
            gloo_storage::LocalStorage::raw()
                .set_item(key, blob)
                .map_err(|e| anyhow!("writing {key:?} to local storage: {e:?}"))
        }
    }
}
