// src/session.rs
//! Persisted bearer credential and the session context handed to views.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

use crate::token::{decode_claims, Claims};

/// Storage key holding the credential.
pub const TOKEN_KEY: &str = "token";

pub const DEFAULT_USER_NAME: &str = "Usuario";
pub const DEFAULT_USER_EMAIL: &str = "no-email@example.com";

/// Synchronous storage for exactly one credential.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, credential: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Keeps the credential in a small JSON key/value file so it survives restarts.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Map<String, Value> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                warn!("Failed to read session file {}: {}", self.path.display(), e);
                return Map::new();
            }
        };

        match serde_json::from_str::<Map<String, Value>>(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                Map::new()
            }
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(entries).context("Failed to encode session")?;
        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write file: {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace file: {}", self.path.display()))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        self.read_entries()
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    fn set(&self, credential: &str) -> Result<()> {
        let mut entries = self.read_entries();
        entries.insert(TOKEN_KEY.to_string(), Value::String(credential.to_string()));
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries();
        if entries.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    credential: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Mutex::new(Some(credential.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, credential: &str) -> Result<()> {
        *self.credential.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(credential.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.credential.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Identity shown in the UI, read from the credential claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl SessionUser {
    /// Requires a subject id; name and email fall back to placeholders.
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        Some(Self {
            id: claims.id?,
            name: claims
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
            email: claims
                .email
                .clone()
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_USER_EMAIL.to_string()),
        })
    }
}

/// Explicit session context. Cheap to clone; every clone sees the same store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::default()))
    }

    pub fn credential(&self) -> Option<String> {
        self.store.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    /// Decoded claims, or `None` when absent or undecodable.
    pub fn claims(&self) -> Option<Claims> {
        self.credential().as_deref().and_then(decode_claims)
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.claims().as_ref().and_then(SessionUser::from_claims)
    }

    pub fn sign_in(&self, credential: &str) -> Result<()> {
        self.store.set(credential)?;
        info!("Stored session credential");
        Ok(())
    }

    pub fn sign_out(&self) -> Result<()> {
        self.store.clear()?;
        info!("Cleared session credential");
        Ok(())
    }
}

/// Auth check for a mounted view: `checking` until the first read of the
/// store completes, then settled for the rest of the mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCheck {
    checking: bool,
    authenticated: bool,
    user: Option<SessionUser>,
}

impl Default for AuthCheck {
    fn default() -> Self {
        Self::pending()
    }
}

impl AuthCheck {
    pub fn pending() -> Self {
        Self {
            checking: true,
            authenticated: false,
            user: None,
        }
    }

    pub fn complete(&mut self, session: &Session) {
        if !self.checking {
            return;
        }
        let credential = session.credential();
        self.authenticated = credential.is_some();
        self.user = credential
            .as_deref()
            .and_then(decode_claims)
            .as_ref()
            .and_then(SessionUser::from_claims);
        self.checking = false;
    }

    pub fn is_checking(&self) -> bool {
        self.checking
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }
}
