use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Storage key for the short-lived API credential.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the longer-lived rotation credential.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Durable key-value persistence for session tokens.
///
/// Tokens are the sole persisted state of this crate. Writes are
/// best-effort with browser-storage semantics: implementations report
/// failures through logging rather than the return path.
pub trait TokenStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn clear(&self, key: &str);
}

/// In-memory storage; the test substrate and the no-persistence fallback.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("token storage lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("token storage lock poisoned")
            .insert(key.to_owned(), value.to_owned());
    }

    fn clear(&self, key: &str) {
        self.entries
            .lock()
            .expect("token storage lock poisoned")
            .remove(key);
    }
}

/// File-backed storage: a flat JSON object at a caller-supplied path.
///
/// Survives process restart; cleared only through explicit `clear` calls.
#[derive(Debug)]
pub struct FileTokenStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_entries(&self) -> BTreeMap<String, String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                log::warn!("token store at {:?} is corrupt: {error}", self.path);
                BTreeMap::new()
            }),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => {
                log::warn!("failed to read token store at {:?}: {error}", self.path);
                BTreeMap::new()
            }
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) {
        let raw = match serde_json::to_string(entries) {
            Ok(raw) => raw,
            Err(error) => {
                log::warn!("failed to encode token store: {error}");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(error) = std::fs::create_dir_all(parent) {
                log::warn!("failed to create token store directory: {error}");
                return;
            }
        }
        if let Err(error) = std::fs::write(&self.path, raw) {
            log::warn!("failed to write token store at {:?}: {error}", self.path);
        }
    }
}

impl TokenStorage for FileTokenStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.read_entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let _guard = self.write_lock.lock().expect("token storage lock poisoned");
        let mut entries = self.read_entries();
        entries.insert(key.to_owned(), value.to_owned());
        self.write_entries(&entries);
    }

    fn clear(&self, key: &str) {
        let _guard = self.write_lock.lock().expect("token storage lock poisoned");
        let mut entries = self.read_entries();
        if entries.remove(key).is_some() {
            self.write_entries(&entries);
        }
    }
}
