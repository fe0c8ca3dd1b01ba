//! Persistence for the chat history: a small string-keyed store with a
//! file-backed implementation. The handle is passed explicitly wherever
//! persistence happens; there is no process-wide singleton.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::chat::Message;

/// Key under which the serialized message list lives.
pub const HISTORY_KEY: &str = "chat_history";

pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<root>/<key>.json`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Load the persisted message list; an absent key is an empty history.
pub fn load_messages(store: &dyn KvStore) -> Result<Vec<Message>> {
    match store.get(HISTORY_KEY)? {
        Some(raw) => serde_json::from_str(&raw).context("failed to parse stored chat history"),
        None => Ok(Vec::new()),
    }
}

/// Write the full message list. Called after every change; last write wins.
pub fn save_messages(store: &dyn KvStore, messages: &[Message]) -> Result<()> {
    let serialized = serde_json::to_string(messages).context("failed to serialize chat history")?;
    store.set(HISTORY_KEY, &serialized)
}
