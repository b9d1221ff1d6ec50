//! Durable storage for the credential pair.
//!
//! The backend owns all other state; the token pair is the only thing the
//! client persists. Two fixed file names under a configured directory, one
//! token per file, written synchronously relative to the triggering call
//! so a subsequent call always observes the updated pair.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

const ACCESS_TOKEN_FILE: &str = "access_token";
const REFRESH_TOKEN_FILE: &str = "refresh_token";

/// In-memory credential pair. Authenticated iff `access` is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPair {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl TokenPair {
    pub fn is_authenticated(&self) -> bool {
        self.access.is_some()
    }
}

/// Persistence behind the API client.
///
/// Single writer (the client), read fresh once at construction.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> TokenPair;
    fn save(&self, tokens: &TokenPair) -> Result<()>;
    /// Remove both tokens. Idempotent; never fails.
    fn clear(&self);
}

/// File-backed store: one file per token under `dir`.
pub struct FsTokenStore {
    dir: PathBuf,
}

impl FsTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read(&self, name: &str) -> Option<String> {
        let contents = fs::read_to_string(self.dir.join(name)).ok()?;
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn write(&self, name: &str, value: Option<&str>) -> Result<()> {
        let path = self.dir.join(name);
        match value {
            Some(token) => fs::write(&path, token)
                .with_context(|| format!("failed to write {}", path.display()))?,
            None => {
                let _ = fs::remove_file(&path);
            }
        }
        Ok(())
    }
}

impl TokenStore for FsTokenStore {
    fn load(&self) -> TokenPair {
        TokenPair {
            access: self.read(ACCESS_TOKEN_FILE),
            refresh: self.read(REFRESH_TOKEN_FILE),
        }
    }

    fn save(&self, tokens: &TokenPair) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        self.write(ACCESS_TOKEN_FILE, tokens.access.as_deref())?;
        self.write(REFRESH_TOKEN_FILE, tokens.refresh.as_deref())
    }

    fn clear(&self) {
        let _ = fs::remove_file(self.dir.join(ACCESS_TOKEN_FILE));
        let _ = fs::remove_file(self.dir.join(REFRESH_TOKEN_FILE));
    }
}

/// Volatile store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<TokenPair>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> TokenPair {
        self.tokens.lock().map(|t| t.clone()).unwrap_or_default()
    }

    fn save(&self, tokens: &TokenPair) -> Result<()> {
        if let Ok(mut guard) = self.tokens.lock() {
            *guard = tokens.clone();
        }
        Ok(())
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.tokens.lock() {
            *guard = TokenPair::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access: Some(access.into()),
            refresh: Some(refresh.into()),
        }
    }

    #[test]
    fn test_fs_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FsTokenStore::new(dir.path());

        store.save(&pair("access-1", "refresh-1")).unwrap();
        assert_eq!(store.load(), pair("access-1", "refresh-1"));
    }

    #[test]
    fn test_fs_store_load_without_files_is_unauthenticated() {
        let dir = TempDir::new().unwrap();
        let store = FsTokenStore::new(dir.path());
        let tokens = store.load();
        assert!(!tokens.is_authenticated());
        assert!(tokens.refresh.is_none());
    }

    #[test]
    fn test_fs_store_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FsTokenStore::new(dir.path());
        store.save(&pair("access-1", "refresh-1")).unwrap();

        store.clear();
        store.clear();
        assert_eq!(store.load(), TokenPair::default());
    }

    #[test]
    fn test_fs_store_save_replaces_access_only_pair() {
        let dir = TempDir::new().unwrap();
        let store = FsTokenStore::new(dir.path());
        store.save(&pair("access-1", "refresh-1")).unwrap();

        // A refresh replaces the access token and keeps the refresh token.
        store
            .save(&TokenPair {
                access: Some("access-2".into()),
                refresh: Some("refresh-1".into()),
            })
            .unwrap();
        assert_eq!(store.load(), pair("access-2", "refresh-1"));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryTokenStore::default();
        store.save(&pair("a", "r")).unwrap();
        assert!(store.load().is_authenticated());
        store.clear();
        assert!(!store.load().is_authenticated());
    }
}
