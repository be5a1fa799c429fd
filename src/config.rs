use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_BASE_URL;
use crate::errors::AnemoiError;
use crate::views::ViewKind;

const CONFIG_DIR_NAME: &str = "anemoi";
const CONFIG_FILE_NAME: &str = "config.json";
// the hosted backend can take over a minute to wake up
const DEFAULT_REQUEST_TIMEOUT_S: u64 = 90;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WindowSize {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1100.,
            height: 760.,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub request_timeout_s: u64,
    pub default_view: ViewKind,
    pub window_size: WindowSize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_s: DEFAULT_REQUEST_TIMEOUT_S,
            default_view: ViewKind::default(),
            window_size: WindowSize::default(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Result<PathBuf, AnemoiError> {
        Ok(dirs::config_dir()
            .ok_or(AnemoiError::NoConfigDir)?
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    /// Loads the user's config file, `None` when there is none yet.
    pub fn from_local_file() -> Result<Option<Self>, AnemoiError> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, AnemoiError> {
        let file = File::open(path).map_err(|e| AnemoiError::ConfigIOError { source: e })?;
        serde_json::from_reader(file).map_err(|e| AnemoiError::ConfigSerializeError { source: e })
    }

    pub fn save(&self) -> Result<(), AnemoiError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AnemoiError> {
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| AnemoiError::ConfigIOError { source: e })?;
        }

        let file = File::create(path).map_err(|e| AnemoiError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| AnemoiError::ConfigSerializeError { source: e })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_s.max(1))
    }
}
