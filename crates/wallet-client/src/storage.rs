use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{SessionError, SessionResult};

/// Durable storage for the last connected wallet address
pub trait SessionStore: Send + Sync {
    fn load(&self) -> SessionResult<Option<String>>;

    fn save(&self, wallet: &str) -> SessionResult<()>;

    fn clear(&self) -> SessionResult<()>;
}

/// Non-durable store for tests and one-off runs
#[derive(Default)]
pub struct MemoryStore {
    wallet: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wallet(wallet: impl Into<String>) -> Self {
        Self {
            wallet: Mutex::new(Some(wallet.into())),
        }
    }

    fn slot(&self) -> SessionResult<std::sync::MutexGuard<'_, Option<String>>> {
        self.wallet
            .lock()
            .map_err(|_| SessionError::Storage("session store lock poisoned".to_string()))
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> SessionResult<Option<String>> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, wallet: &str) -> SessionResult<()> {
        *self.slot()? = Some(wallet.to_string());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.slot()? = None;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    wallet: String,
}

/// JSON file holding a single `wallet` entry
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/bonkboy/session.json`
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("bonkboy")
                .join("session.json")
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> SessionResult<Option<String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Storage(e.to_string())),
        };

        let stored: StoredSession = serde_json::from_str(&raw)
            .map_err(|e| SessionError::Storage(format!("corrupt session file: {}", e)))?;
        Ok(Some(stored.wallet))
    }

    fn save(&self, wallet: &str) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::Storage(e.to_string()))?;
        }

        let body = serde_json::to_string(&StoredSession {
            wallet: wallet.to_string(),
        })
        .map_err(|e| SessionError::Storage(e.to_string()))?;

        std::fs::write(&self.path, body).map_err(|e| SessionError::Storage(e.to_string()))
    }

    fn clear(&self) -> SessionResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Storage(e.to_string())),
        }
    }
}
