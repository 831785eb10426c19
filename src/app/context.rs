use std::path::{Path, PathBuf};

use crate::app::error::{Result, TrawlError};
use crate::config::Config;
use crate::session::CookieJar;

/// Loaded configuration plus the on-disk locations a run needs.
pub struct AppContext {
    pub config: Config,
    data_dir: PathBuf,
}

impl AppContext {
    /// Load `~/.config/trawl/config.toml` and resolve the data directory.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::with_config(config, None)
    }

    pub fn with_config(config: Config, data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(d) => d,
            None => Self::default_data_dir()?,
        };
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { config, data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Browser profile directory, from config or `<data dir>/profile`.
    pub fn profile_dir(&self) -> PathBuf {
        self.config
            .surface
            .user_data_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("profile"))
    }

    pub fn cookie_file(&self) -> PathBuf {
        self.config
            .session
            .cookie_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("cookies.json"))
    }

    pub fn cookie_jar(&self) -> CookieJar {
        CookieJar::new(self.cookie_file())
    }

    fn default_data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| TrawlError::Config("Could not find data directory".into()))?;
        Ok(data_dir.join("trawl"))
    }
}
