//! Bearer token persistence.
//!
//! The token is an opaque string; its presence alone means "logged in".
//! Nothing about expiry or signatures is modelled.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A single slot holding the current bearer token.
pub trait TokenStore {
    /// The stored token, if any. Blank content counts as no token.
    fn load(&self) -> Option<String>;
    fn save(&mut self, token: &str) -> io::Result<()>;
    /// Remove the stored token. Clearing an empty slot is not an error.
    fn clear(&mut self) -> io::Result<()>;
}

/// Token kept in a file, by default `~/.squill/auth_token`.
#[derive(Debug, Clone)]
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
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let content = fs::read_to_string(&self.path).ok()?;
        let token = content.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn save(&mut self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    fn clear(&mut self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Token kept in process memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.clone()
    }

    fn save(&mut self, token: &str) -> io::Result<()> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.token = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
