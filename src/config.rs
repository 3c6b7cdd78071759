use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{Category, DEFAULT_PRIORITY};
use crate::utils::{self, ParsedKeyBinding, parse_key_binding};
use crossterm::event::KeyCode;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_tasks_file")]
    pub tasks_file: String,
    #[serde(default)]
    pub default_category: Category,
    #[serde(default = "default_priority")]
    pub default_priority: i64,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_toggle_done")]
    pub toggle_done: String,
    #[serde(default = "default_search")]
    pub search: String,
    #[serde(default = "default_save")]
    pub save: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_upgrade")]
    pub upgrade: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    /// Empty means "pick black or white for contrast with highlight_bg"
    #[serde(default)]
    pub highlight_fg: String,
    #[serde(default = "default_accent")]
    pub accent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: default_tasks_file(),
            default_category: Category::default(),
            default_priority: default_priority(),
            key_bindings: KeyBindings::default(),
            theme: Theme::default(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            new: default_new(),
            delete: default_delete(),
            toggle_done: default_toggle_done(),
            search: default_search(),
            save: default_save(),
            help: default_help(),
            upgrade: default_upgrade(),
            list_up: default_list_up(),
            list_down: default_list_down(),
        }
    }
}

/// Key bindings parsed once, ready to match against key events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    pub quit: ParsedKeyBinding,
    pub new: ParsedKeyBinding,
    pub delete: ParsedKeyBinding,
    pub toggle_done: ParsedKeyBinding,
    pub search: ParsedKeyBinding,
    pub save: ParsedKeyBinding,
    pub help: ParsedKeyBinding,
    pub upgrade: ParsedKeyBinding,
    pub list_up: ParsedKeyBinding,
    pub list_down: ParsedKeyBinding,
}

impl KeyBindings {
    /// Parse every binding. An entry that does not parse falls back to its default,
    /// and its name is returned in the second element.
    pub fn resolve(&self) -> (KeyMap, Vec<&'static str>) {
        let mut invalid = Vec::new();
        let mut pick = |name: &'static str, value: &str, fallback: fn() -> String| {
            match parse_key_binding(value) {
                Ok(binding) => binding,
                Err(e) => {
                    log::warn!("Invalid key binding for {}: {}; using the default", name, e);
                    invalid.push(name);
                    // An unmatchable key if even the default does not parse
                    parse_key_binding(&fallback()).unwrap_or(ParsedKeyBinding {
                        key_code: KeyCode::Null,
                        requires_ctrl: false,
                    })
                }
            }
        };

        let keys = KeyMap {
            quit: pick("quit", &self.quit, default_quit),
            new: pick("new", &self.new, default_new),
            delete: pick("delete", &self.delete, default_delete),
            toggle_done: pick("toggle_done", &self.toggle_done, default_toggle_done),
            search: pick("search", &self.search, default_search),
            save: pick("save", &self.save, default_save),
            help: pick("help", &self.help, default_help),
            upgrade: pick("upgrade", &self.upgrade, default_upgrade),
            list_up: pick("list_up", &self.list_up, default_list_up),
            list_down: pick("list_down", &self.list_down, default_list_down),
        };
        (keys, invalid)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: String::new(),
            accent: default_accent(),
        }
    }
}

// Default value functions
fn default_tasks_file() -> String {
    tasks_file_for_profile(utils::Profile::Prod)
}

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_toggle_done() -> String {
    "Space".to_string()
}

fn default_search() -> String {
    "/".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_upgrade() -> String {
    "p".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "#141421".to_string()
}

fn default_highlight_bg() -> String {
    "#3f51b5".to_string()
}

fn default_accent() -> String {
    "#ffb347".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

/// Default task file location for a profile's data directory
pub fn tasks_file_for_profile(profile: utils::Profile) -> String {
    if let Some(data_dir) = utils::get_data_dir(profile) {
        data_dir.join("tasks.json").to_string_lossy().to_string()
    } else {
        match profile {
            utils::Profile::Dev => "~/.local/share/focuslist-dev/tasks.json".to_string(),
            utils::Profile::Prod => "~/.local/share/focuslist/tasks.json".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load configuration from the profile's config file, creating it with defaults if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        let default_tasks_file = tasks_file_for_profile(profile);
        Self::load_from_path(&config_path, default_tasks_file)
    }

    /// Load configuration from an explicit file, creating it with defaults if missing
    pub fn load_from_path(config_path: &Path, default_tasks_file: String) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let config: Config = toml::from_str(&contents)?;
            log::debug!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let mut config = Config {
                tasks_file: default_tasks_file,
                ..Config::default()
            };
            if let Err(e) = config.save_to_path(config_path) {
                log::error!("Failed to save config file {}: {}", config_path.display(), e);
                return Err(e);
            }
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Write configuration to a file
    pub fn save_to_path(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or_else(|| {
            ConfigError::ConfigDirError("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get the expanded tasks file path (with ~ expansion)
    pub fn get_tasks_path(&self) -> PathBuf {
        utils::expand_path(&self.tasks_file)
    }
}
