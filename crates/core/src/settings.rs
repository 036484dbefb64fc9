//! Configuration keys the plugin registers with its host.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SettingError};

/// Value of a setting, typed after its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl SettingValue {
    /// Human readable name of the value kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "a boolean",
            SettingValue::Int(_) => "an integer",
            SettingValue::Text(_) => "a string",
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Int(i) => write!(f, "{i}"),
            SettingValue::Text(s) => f.write_str(s),
        }
    }
}

/// A configuration key with its default and description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    /// Fully qualified key, e.g. `pdd.out.tabsize`.
    pub name: String,

    /// Value registered when the key does not exist yet.
    pub default: SettingValue,

    /// Description shown by the host's configuration help.
    pub description: String,
}

impl Setting {
    /// Creates a new setting.
    pub fn new(name: impl Into<String>, default: SettingValue) -> Self {
        Self {
            name: name.into(),
            default,
            description: String::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Parses `text` as a value of the same kind as the default.
    pub fn parse_value(&self, text: &str) -> Result<SettingValue> {
        let invalid = || SettingError::InvalidValue {
            key: self.name.clone(),
            expected: self.default.kind(),
            value: text.to_string(),
        };

        match self.default {
            SettingValue::Bool(_) => match text {
                "true" | "1" => Ok(SettingValue::Bool(true)),
                "false" | "0" => Ok(SettingValue::Bool(false)),
                _ => Err(invalid()),
            },
            SettingValue::Int(_) => text
                .parse()
                .map(SettingValue::Int)
                .map_err(|_| invalid()),
            SettingValue::Text(_) => Ok(SettingValue::Text(text.to_string())),
        }
    }
}

/// Returns the settings registered by the plugin, in registration order.
pub fn default_settings() -> Vec<Setting> {
    use SettingValue::{Bool, Int, Text};

    vec![
        // other tooling checks this key to tell whether r2dec is installed
        Setting::new("r2dec.asm", Bool(true)).with_description("r2dec identification dummy var"),
        Setting::new("pdd.cflow.converge", Bool(true))
            .with_description("converge (collapse) related conditions"),
        Setting::new("pdd.out.offsets", Bool(true))
            .with_description("prefix each line with its offset"),
        Setting::new("pdd.out.guides", Int(1))
            .with_description("scope guidelines [0: none, 1: solid, 2: dashed]"),
        Setting::new("pdd.out.newline", Bool(true))
            .with_description("add a new line before an opening curly bracket"),
        Setting::new("pdd.out.tabsize", Int(4)).with_description("indent size"),
        Setting::new("pdd.out.theme", Text("dark+".to_string()))
            .with_description("syntax highlighting palette [\"none\", \"default\", \"dark+\"]"),
        Setting::new("pdd.opt.noalias", Bool(false)).with_description("assume no pointer aliasing"),
    ]
}

/// Looks up a setting by key.
pub fn find_setting(key: &str) -> Option<Setting> {
    default_settings().into_iter().find(|s| s.name == key)
}

/// Parses a `key=value` override against the settings table.
pub fn parse_assignment(text: &str) -> Result<(String, SettingValue)> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| SettingError::MalformedAssignment(text.to_string()))?;
    let key = key.trim();

    let setting = find_setting(key).ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    let value = setting.parse_value(value.trim())?;

    Ok((setting.name, value))
}
