#![forbid(unsafe_code)]

//! Combobox configuration.
//!
//! Defaults match the reference page: the field id is `destination`, the
//! popup shows at most eight rows before scrolling, and the popup-toggle
//! control is present. Hosts can override any knob from the environment:
//!
//! | Variable | Field | Format |
//! |---|---|---|
//! | `COMBO_ID` | `id` | non-empty, no whitespace |
//! | `COMBO_PLACEHOLDER` | `placeholder` | any text |
//! | `COMBO_MAX_VISIBLE_ROWS` | `max_visible_rows` | integer >= 1 |
//! | `COMBO_SHOW_TOGGLE` | `show_toggle` | `1`/`true`/`0`/`false` |

use std::fmt;

/// Default DOM-style id of the text field.
pub const DEFAULT_ID: &str = "destination";

/// Default popup height in rows.
pub const DEFAULT_MAX_VISIBLE_ROWS: usize = 8;

/// Configuration for a [`Combobox`](crate::Combobox).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboboxConfig {
    /// Id of the text field; row and listbox ids derive from it.
    pub id: String,
    /// Placeholder text shown while the field is empty.
    pub placeholder: String,
    /// Rows shown before the popup scrolls (at least 1).
    pub max_visible_rows: usize,
    /// Whether the popup-toggle control is rendered and clickable.
    pub show_toggle: bool,
}

impl Default for ComboboxConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_ID.to_string(),
            placeholder: String::new(),
            max_visible_rows: DEFAULT_MAX_VISIBLE_ROWS,
            show_toggle: true,
        }
    }
}

impl ComboboxConfig {
    /// Defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the placeholder (builder).
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the popup height; clamped to at least one row (builder).
    pub fn with_max_visible_rows(mut self, rows: usize) -> Self {
        self.max_visible_rows = rows.max(1);
        self
    }

    /// Show or hide the popup toggle (builder).
    pub fn with_toggle(mut self, show: bool) -> Self {
        self.show_toggle = show;
        self
    }

    /// Defaults overridden by `COMBO_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(id) = lookup("COMBO_ID") {
            if id.is_empty() || id.chars().any(char::is_whitespace) {
                return Err(ConfigError::invalid(
                    "COMBO_ID",
                    id,
                    "must be non-empty and contain no whitespace",
                ));
            }
            config.id = id;
        }

        if let Some(placeholder) = lookup("COMBO_PLACEHOLDER") {
            config.placeholder = placeholder;
        }

        if let Some(raw) = lookup("COMBO_MAX_VISIBLE_ROWS") {
            let rows = raw.trim().parse::<usize>().map_err(|_| {
                ConfigError::invalid("COMBO_MAX_VISIBLE_ROWS", raw.clone(), "expected an integer")
            })?;
            if rows == 0 {
                return Err(ConfigError::invalid(
                    "COMBO_MAX_VISIBLE_ROWS",
                    raw,
                    "must be at least 1",
                ));
            }
            config.max_visible_rows = rows;
        }

        if let Some(raw) = lookup("COMBO_SHOW_TOGGLE") {
            config.show_toggle = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::invalid(
                        "COMBO_SHOW_TOGGLE",
                        raw,
                        "expected true or false",
                    ));
                }
            };
        }

        Ok(config)
    }

    /// Id of the popup list.
    pub fn listbox_id(&self) -> String {
        format!("{}-listbox", self.id)
    }

    /// Id of popup row `row`.
    pub fn option_id(&self, row: usize) -> String {
        format!("{}-option-{row}", self.id)
    }
}

/// Error loading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to an unusable value.
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// The offending value.
        value: String,
        /// What was expected.
        reason: &'static str,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: String, reason: &'static str) -> Self {
        Self::InvalidValue { key, value, reason }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid {key}={value:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
