//! Application settings.
//!
//! Settings live in `config.json` inside the [`DataStorage`] directory. A
//! missing file is not an error: every section is optional and falls back to
//! its defaults. `todo init` edits the file through [`Config::init`].
//!
//! ```json
//! {
//!   "reminders": { "exact_alarms": true, "notifications_enabled": true },
//!   "list": { "default_sort": "Priority Descending" }
//! }
//! ```

use super::data_storage::DataStorage;
use super::filter::SortKey;
use crate::libs::messages::Message;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Platform grants for reminder delivery.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReminderConfig {
    /// Whether precise one-time alarms may be registered.
    pub exact_alarms: bool,
    /// Whether fired reminders may be displayed.
    pub notifications_enabled: bool,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig {
            exact_alarms: true,
            notifications_enabled: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ListConfig {
    /// Sort label used by `todo task list` when `--sort` is not given.
    pub default_sort: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        ListConfig {
            default_sort: SortKey::default().label().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<ReminderConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListConfig>,
}

impl Config {
    /// Reads `config.json` from the data directory, or defaults when absent.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn reminders(&self) -> ReminderConfig {
        self.reminders.clone().unwrap_or_default()
    }

    pub fn list(&self) -> ListConfig {
        self.list.clone().unwrap_or_default()
    }

    /// Interactive setup, pre-filled with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let theme = ColorfulTheme::default();

        let reminders = config.reminders();
        config.reminders = Some(ReminderConfig {
            exact_alarms: Confirm::with_theme(&theme)
                .with_prompt(Message::PromptExactAlarms.to_string())
                .default(reminders.exact_alarms)
                .interact()?,
            notifications_enabled: Confirm::with_theme(&theme)
                .with_prompt(Message::PromptNotificationsEnabled.to_string())
                .default(reminders.notifications_enabled)
                .interact()?,
        });

        let labels: Vec<&str> = SortKey::ALL.iter().map(|key| key.label()).collect();
        let current = labels.iter().position(|label| *label == config.list().default_sort).unwrap_or(0);
        let selection = Select::with_theme(&theme)
            .with_prompt(Message::PromptDefaultSort.to_string())
            .items(&labels)
            .default(current)
            .interact()?;
        config.list = Some(ListConfig {
            default_sort: labels[selection].to_string(),
        });
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_fall_back_to_defaults() {
        let config = Config::default();
        assert_eq!(config.reminders(), ReminderConfig::default());
        assert_eq!(config.list().default_sort, "Date Ascending");
    }

    #[test]
    fn absent_sections_are_not_serialized() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
