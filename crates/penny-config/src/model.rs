use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// User-tunable preferences for the engine and its local storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// How many days before a due date the upcoming-bills reminder fires.
    #[serde(default = "Config::default_reminder_lead_days")]
    pub reminder_lead_days: i64,
    /// Local hour (0-23) at which reminders and alerts are delivered.
    #[serde(default = "Config::default_notify_hour")]
    pub notify_hour: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root for the JSON data documents. Defaults to the
    /// platform data directory under `penny`.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            reminder_lead_days: Self::default_reminder_lead_days(),
            notify_hour: Self::default_notify_hour(),
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_reminder_lead_days() -> i64 {
        3
    }

    pub fn default_notify_hour() -> u32 {
        9
    }

    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("penny")
    }
}
