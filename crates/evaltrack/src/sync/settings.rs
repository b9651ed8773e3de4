use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connection settings for the spreadsheet integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    pub spreadsheet_url: Option<String>,
    pub api_key: Option<String>,
    pub auto_sync: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            spreadsheet_url: None,
            api_key: None,
            auto_sync: true,
            last_updated: None,
        }
    }
}

impl SyncSettings {
    /// Both the target sheet and a credential must be present to sync.
    pub fn is_configured(&self) -> bool {
        self.spreadsheet_url.is_some() && self.api_key.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access sync settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("sync settings file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Persistence seam for the sync settings.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<SyncSettings, SettingsError>;
    fn save(&self, settings: &SyncSettings) -> Result<(), SettingsError>;
}

/// File-backed store; a missing file reads as the defaults.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<SyncSettings, SettingsError> {
        if !self.path.exists() {
            return Ok(SyncSettings::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, settings: &SyncSettings) -> Result<(), SettingsError> {
        let raw = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// Settings loaded once at startup and persisted on every write.
pub struct SyncSettingsHandle<S> {
    store: S,
    current: Mutex<SyncSettings>,
}

impl<S> SyncSettingsHandle<S>
where
    S: SettingsStore,
{
    pub fn load(store: S) -> Result<Self, SettingsError> {
        let current = store.load()?;
        Ok(Self {
            store,
            current: Mutex::new(current),
        })
    }

    pub fn get(&self) -> SyncSettings {
        self.current.lock().expect("settings mutex poisoned").clone()
    }

    /// Stamp the update time and write through to the backing store.
    pub fn update(
        &self,
        spreadsheet_url: Option<String>,
        api_key: Option<String>,
        auto_sync: bool,
    ) -> Result<SyncSettings, SettingsError> {
        let settings = SyncSettings {
            spreadsheet_url,
            api_key,
            auto_sync,
            last_updated: Some(Utc::now()),
        };
        self.store.save(&settings)?;
        let mut guard = self.current.lock().expect("settings mutex poisoned");
        *guard = settings.clone();
        Ok(settings)
    }
}
