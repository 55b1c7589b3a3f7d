use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{unexpected_error, Error};

const CODE: &str = "code";
const PID: &str = "pid";
const NICKNAME: &str = "nickname";
const HOST_SECRET: &str = "hostSecret";
const JOIN_URL: &str = "joinUrl";

/// Small string-valued key-value persistence, the shape of browser
/// localStorage. Implementations decide whether values survive restarts.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Write-through JSON file store so identity fields survive restarts.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|_| unexpected_error())?,
            Err(_) => BTreeMap::new(),
        };

        Ok(Self { path, values })
    }

    fn flush(&self) {
        match serde_json::to_string_pretty(&self.values) {
            Ok(raw) => {
                if let Err(err) = std::fs::write(&self.path, raw) {
                    tracing::warn!("session flush failed: {}", err);
                }
            }
            Err(err) => tracing::warn!("session serialize failed: {}", err),
        }
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
        self.flush();
    }
}

/// Typed accessors over the five identity fields.
pub struct Session {
    store: Box<dyn SessionStore + Send>,
}

impl Session {
    pub fn new(store: Box<dyn SessionStore + Send>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::default()))
    }

    fn get(&self, key: &str) -> Option<String> {
        self.store.get(key).filter(|v| !v.is_empty())
    }

    pub fn code(&self) -> Option<String> {
        self.get(CODE)
    }

    pub fn set_code(&mut self, code: &str) {
        self.store.set(CODE, code);
    }

    pub fn pid(&self) -> Option<String> {
        self.get(PID)
    }

    pub fn set_pid(&mut self, pid: &str) {
        self.store.set(PID, pid);
    }

    pub fn nickname(&self) -> Option<String> {
        self.get(NICKNAME)
    }

    pub fn set_nickname(&mut self, nickname: &str) {
        self.store.set(NICKNAME, nickname);
    }

    pub fn host_secret(&self) -> Option<String> {
        self.get(HOST_SECRET)
    }

    pub fn set_host_secret(&mut self, secret: &str) {
        self.store.set(HOST_SECRET, secret);
    }

    pub fn join_url(&self) -> Option<String> {
        self.get(JOIN_URL)
    }

    pub fn set_join_url(&mut self, url: &str) {
        self.store.set(JOIN_URL, url);
    }

    /// Leaving a room drops only the participant identity; the code stays
    /// so the user can rejoin.
    pub fn clear_membership(&mut self) {
        self.store.remove(PID);
    }

    /// Closing a room drops everything tied to it.
    pub fn clear_room(&mut self) {
        self.store.remove(CODE);
        self.store.remove(PID);
        self.store.remove(HOST_SECRET);
        self.store.remove(JOIN_URL);
    }
}
