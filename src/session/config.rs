use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for establishing a logged-in session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Page loaded to check the login state
    pub home_url: String,

    /// Page opened for interactive login
    pub login_url: String,

    /// Text of a link that only logged-in users see
    pub logged_in_link_text: String,

    /// How long to wait for the logged-in marker, in seconds (default: 15)
    pub check_timeout_secs: u64,

    /// Cookie file; defaults to `<data dir>/trawl/cookies.json`
    pub cookie_file: Option<PathBuf>,

    /// Remove the cookie file when the browser is released (default: true)
    pub clear_cookies_on_exit: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            home_url: "https://www.taobao.com".to_string(),
            login_url: "https://login.taobao.com".to_string(),
            logged_in_link_text: "我的淘宝".to_string(),
            check_timeout_secs: 15,
            cookie_file: None,
            clear_cookies_on_exit: true,
        }
    }
}

impl SessionConfig {
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }
}
