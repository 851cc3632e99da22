use std::path::PathBuf;

use serde::Deserialize;

use crate::color::Color;
use crate::config::keybindings::KeybindingsConfig;
use crate::filter::QuickFilter;
use crate::prompt::{self, Rule};

// ---------------------------------------------------------------------------
// Custom Color deserialization
// ---------------------------------------------------------------------------

/// Deserialize an `Option<Color>` from a TOML string value.
pub(crate) mod color_de {
    use serde::{self, Deserialize, Deserializer};

    use crate::color::Color;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| Color::parse(&s, "<theme>").map_err(serde::de::Error::custom))
            .transpose()
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: Defaults,
    pub data: DataConfig,
    pub theme: Theme,
    pub keybindings: KeybindingsConfig,
    pub evaluation: EvaluationConfig,
    pub export: ExportConfig,
    pub permissions: Vec<RolePermissions>,
    pub account: AccountConfig,
}

impl AppConfig {
    /// Configured roles, or the built-in four when none are given.
    pub fn permissions(&self) -> Vec<RolePermissions> {
        if self.permissions.is_empty() {
            default_permissions()
        } else {
            self.permissions.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Bots,
    Conversations,
    PromptRules,
    Settings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub view: View,
    /// Label chips shown per table row before the "+K" chip.
    pub table_label_max: usize,
    /// Label chips shown in the detail drawer.
    pub drawer_label_max: usize,
    /// Lines the QA answer is clipped to in the table (1 or 2).
    pub qa_answer_lines: usize,
    /// Quick filters active when the conversation view opens.
    pub quick_filters: Vec<QuickFilter>,
    pub preview: PreviewDefaults,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            view: View::Bots,
            table_label_max: 2,
            drawer_label_max: 5,
            qa_answer_lines: 2,
            quick_filters: Vec::new(),
            preview: PreviewDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreviewDefaults {
    /// Drawer width as a fraction of the terminal.
    pub width: f64,
}

impl Default for PreviewDefaults {
    fn default() -> Self {
        Self { width: 0.45 }
    }
}

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// JSON fixture to load instead of the embedded sample data.
    pub fixture: Option<PathBuf>,
    /// Make the mock backend reject every command.
    pub fail_commands: bool,
}

// ---------------------------------------------------------------------------
// Evaluation prompt & rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub default_prompt: Option<String>,
    pub rules: Vec<Rule>,
}

impl EvaluationConfig {
    pub fn prompt_settings(&self) -> prompt::PromptSettings {
        let template = self
            .default_prompt
            .clone()
            .unwrap_or_else(|| prompt::DEFAULT_PROMPT.to_owned());
        let rules = if self.rules.is_empty() {
            prompt::default_rules()
        } else {
            self.rules.clone()
        };
        prompt::PromptSettings::new(template, rules)
    }
}

// ---------------------------------------------------------------------------
// Export, permissions, account
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub include_timestamps: bool,
    pub include_labels: bool,
    pub include_qa_answers: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_timestamps: true,
            include_labels: true,
            include_qa_answers: true,
        }
    }
}

/// What one role may do.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RolePermissions {
    pub role: String,
    #[serde(default)]
    pub edit_rules: bool,
    #[serde(default)]
    pub run_eval: bool,
    #[serde(default)]
    pub export: bool,
}

fn role(name: &str, edit_rules: bool, run_eval: bool, export: bool) -> RolePermissions {
    RolePermissions {
        role: name.to_owned(),
        edit_rules,
        run_eval,
        export,
    }
}

pub fn default_permissions() -> Vec<RolePermissions> {
    vec![
        role("Admin", true, true, true),
        role("QA Lead", true, true, true),
        role("QA Member", false, true, true),
        role("Viewer", false, false, false),
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Connected Google Sheets account; `None` shows as disconnected.
    pub sheets_account: Option<String>,
    /// Shown as the owner of user overrides.
    pub owner: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            sheets_account: Some("workspace@example.com".to_owned()),
            owner: "You".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub colors: ColorsTheme,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColorsTheme {
    pub text: TextColors,
    pub background: BgColors,
    pub border: BorderColors,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextColors {
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub primary: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub secondary: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub inverted: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub faint: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub success: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub warning: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub error: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub accent: Option<Color>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BgColors {
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub selected: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub chip: Option<Color>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BorderColors {
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub primary: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub faint: Option<Color>,
}
