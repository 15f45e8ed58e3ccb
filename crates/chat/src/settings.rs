//! Chat settings
//!
//! Settings are read from `chat.json` in the Lessonbook config directory
//! when present, otherwise the built-in defaults apply. Every field is
//! optional in the file:
//!
//! ```json
//! {
//!   "time_format": "%H:%M",
//!   "quick_actions": [
//!     { "label": "Agendar aula", "text": "Olá! Gostaria de agendar uma aula prática com você." }
//!   ]
//! }
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::clock::{DEFAULT_TIME_FORMAT, is_valid_time_format};

/// Settings filename in the config directory
const SETTINGS_FILE: &str = "chat.json";

/// A canned reply offered in the chat input after a request handoff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    /// Short button caption
    pub label: String,
    /// Full message placed in the draft when chosen
    pub text: String,
}

impl QuickAction {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Built-in quick replies
pub fn default_quick_actions() -> Vec<QuickAction> {
    vec![
        QuickAction::new(
            "Agendar aula",
            "Olá! Gostaria de agendar uma aula prática com você.",
        ),
        QuickAction::new(
            "Disponibilidade",
            "Olá! Você tem horários disponíveis para esta semana?",
        ),
        QuickAction::new(
            "Qual categoria?",
            "Olá! Quais categorias de CNH você atende?",
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// chrono strftime pattern for message display timestamps
    pub time_format: String,
    pub quick_actions: Vec<QuickAction>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            quick_actions: default_quick_actions(),
        }
    }
}

impl ChatSettings {
    /// Load `chat.json` from the config directory, or defaults if absent
    pub fn load() -> Result<Self> {
        if config::config_exists(SETTINGS_FILE) {
            let settings: ChatSettings = config::load_json(SETTINGS_FILE)?;
            return settings.validated();
        }
        Ok(Self::default())
    }

    /// Load settings from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings: ChatSettings = config::load_json_file(path)?;
        settings
            .validated()
            .with_context(|| format!("Invalid chat settings in {}", path.display()))
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: ChatSettings =
            serde_json::from_str(json).context("Failed to parse chat settings JSON")?;
        settings.validated()
    }

    /// Path the settings are loaded from (~/.config/lessonbook/chat.json)
    pub fn default_settings_path() -> Option<PathBuf> {
        config::config_path(SETTINGS_FILE)
    }

    fn validated(self) -> Result<Self> {
        if !is_valid_time_format(&self.time_format) {
            bail!("Unsupported time_format: {:?}", self.time_format);
        }
        if let Some(action) = self
            .quick_actions
            .iter()
            .find(|a| a.label.trim().is_empty() || a.text.trim().is_empty())
        {
            bail!("Quick action needs a label and text: {:?}", action);
        }
        Ok(self)
    }
}
