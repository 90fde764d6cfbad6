//! Settings persisted between runs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// The one-time security warning was acknowledged
    #[serde(default)]
    pub security_warning_dismissed: bool,
}

/// JSON file holding [`Settings`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(SETTINGS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings; a missing file yields defaults.
    pub async fn load(&self) -> Result<Settings> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let json = serde_json::to_vec_pretty(settings)?;
        tokio::fs::write(&self.path, json).await?;
        debug!("Settings written to {}", self.path.display());
        Ok(())
    }

    pub async fn dismiss_security_warning(&self) -> Result<()> {
        let mut settings = self.load().await?;
        settings.security_warning_dismissed = true;
        self.save(&settings).await
    }
}
