//! Persisted session token
//!
//! `login` stores a bearer token in the app data directory and every later run
//! attaches it to outgoing requests until `logout` removes it. A token set in
//! the configuration always takes precedence.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::infrastructure::config::{ConfigManager, defaults};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub created_at: DateTime<Utc>,
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Session file in the default app data directory
    pub fn new() -> Result<Self> {
        let path = ConfigManager::get_app_data_dir()?.join(defaults::SESSION_FILE_NAME);
        Ok(Self { path })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored session, if any. An unreadable file is treated as logged out.
    pub async fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .await
            .context("Failed to read session file")?;
        match serde_json::from_str::<Session>(&content) {
            Ok(session) if !session.token.trim().is_empty() => Ok(Some(session)),
            Ok(_) => Ok(None),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    pub async fn token(&self) -> Result<Option<String>> {
        Ok(self.load().await?.map(|session| session.token))
    }

    pub async fn save(&self, token: &str) -> Result<Session> {
        let token = token.trim();
        anyhow::ensure!(!token.is_empty(), "Session token must not be empty");

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create session directory")?;
        }
        let session = Session {
            token: token.to_string(),
            created_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&session).context("Failed to serialize session")?;
        fs::write(&self.path, content)
            .await
            .context("Failed to write session file")?;
        info!(path = %self.path.display(), "Session token stored");
        Ok(session)
    }

    /// Remove the stored token. Returns whether there was one.
    pub async fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .await
            .context("Failed to remove session file")?;
        info!("Session token cleared");
        Ok(true)
    }
}
