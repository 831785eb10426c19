//! Configuration management for trawl.
//!
//! Configuration is read from `~/.config/trawl/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::engine::CollectorConfig;
use crate::session::SessionConfig;
use crate::surface::SurfaceConfig;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub collector: CollectorConfig,
    pub surface: SurfaceConfig,
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/trawl/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("trawl").join("config.toml"))
    }

    /// Reject values the collector cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.collector.validate().map_err(ConfigError::Invalid)?;
        self.surface.validate().map_err(ConfigError::Invalid)
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    pub fn default_config_content() -> &'static str {
        r##"# trawl configuration
#
# Command-line flags (--target, --max-retries, --headed) override the
# matching values below for a single run.

[collector]
# Stop once this many items have been written
target = 1000

# Consecutive non-progressing iterations tolerated before giving up
max_retries = 3

# Fewer new items than this per iteration counts as weak progress
low_watermark = 5

# Pause after an iteration that produced new items (milliseconds)
progress_delay_ms = 1200

# Pause after an iteration that produced nothing (milliseconds)
stall_delay_ms = 2000

[surface]
# Run the browser without a visible window
headless = true

# Browser binary; detected automatically when unset
# chrome_executable = "/usr/bin/chromium"

# Browser profile directory; defaults to <data dir>/trawl/profile
# user_data_dir = "/home/me/.local/share/trawl/profile"

# Page navigation timeout in seconds
navigation_timeout_secs = 30

# Wait after navigation and after opening the item list (milliseconds)
settle_after_navigation_ms = 3000

# How long the "show all" control may take to become clickable (seconds)
reveal_timeout_secs = 20

# Poll interval while waiting for the "show all" control (milliseconds)
reveal_poll_ms = 250

# Wait after each scroll before counting items again (milliseconds)
scroll_settle_ms = 200

# Scroll distance as a multiple of the container's visible height
scroll_factor = 8.5

# Selectors describing the item list
item_selector = ".Oo3vRXl7BS--Comment--_0b4e753"
content_selector = ".Oo3vRXl7BS--content--_8e6708c"
id_attribute = "data-before-current-y"
reveal_selector = ".Oo3vRXl7BS--ShowButton--_15e2446"
scroll_container_selector = "div.Oo3vRXl7BS--comments--_00182ac.beautify-scroll-bar"

[session]
# Page used to check whether the session is logged in
home_url = "https://www.taobao.com"

# Page opened for interactive login
login_url = "https://login.taobao.com"

# Link text that only appears for logged-in users
logged_in_link_text = "我的淘宝"

# How long to wait for the logged-in marker (seconds)
check_timeout_secs = 15

# Cookie file; defaults to <data dir>/trawl/cookies.json
# cookie_file = "/home/me/.local/share/trawl/cookies.json"

# Remove the cookie file when the browser is released
clear_cookies_on_exit = true
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
