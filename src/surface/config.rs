use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the browser-backed content surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Browser binary; detected by chromiumoxide when unset
    pub chrome_executable: Option<PathBuf>,

    /// Profile directory; defaults to `<data dir>/trawl/profile`
    pub user_data_dir: Option<PathBuf>,

    /// User agent string to use
    pub user_agent: Option<String>,

    /// Page navigation timeout in seconds (default: 30)
    pub navigation_timeout_secs: u64,

    /// Wait after navigation and after opening the item list, in milliseconds (default: 3000)
    pub settle_after_navigation_ms: u64,

    /// Bounded wait for the reveal control to become clickable, in seconds (default: 20)
    pub reveal_timeout_secs: u64,

    /// Poll interval while waiting for the reveal control, in milliseconds (default: 250)
    pub reveal_poll_ms: u64,

    /// Wait after a scroll before recounting items, in milliseconds (default: 200)
    pub scroll_settle_ms: u64,

    /// Scroll distance as a multiple of the container height (default: 8.5)
    pub scroll_factor: f64,

    /// Selector matching one item element
    pub item_selector: String,

    /// Selector, relative to an item, of the element holding its text
    pub content_selector: String,

    /// Item attribute used as its identifier
    pub id_attribute: String,

    /// Control that opens the full item list
    pub reveal_selector: String,

    /// Scrollable element holding the items; the document scrolls when it is missing
    pub scroll_container_selector: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_executable: None,
            user_data_dir: None,
            user_agent: None,
            navigation_timeout_secs: 30,
            settle_after_navigation_ms: 3000,
            reveal_timeout_secs: 20,
            reveal_poll_ms: 250,
            scroll_settle_ms: 200,
            scroll_factor: 8.5,
            item_selector: ".Oo3vRXl7BS--Comment--_0b4e753".to_string(),
            content_selector: ".Oo3vRXl7BS--content--_8e6708c".to_string(),
            id_attribute: "data-before-current-y".to_string(),
            reveal_selector: ".Oo3vRXl7BS--ShowButton--_15e2446".to_string(),
            scroll_container_selector:
                "div.Oo3vRXl7BS--comments--_00182ac.beautify-scroll-bar".to_string(),
        }
    }
}

impl SurfaceConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn settle_after_navigation(&self) -> Duration {
        Duration::from_millis(self.settle_after_navigation_ms)
    }

    pub fn reveal_timeout(&self) -> Duration {
        Duration::from_secs(self.reveal_timeout_secs)
    }

    pub fn reveal_poll(&self) -> Duration {
        Duration::from_millis(self.reveal_poll_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.item_selector.trim().is_empty() {
            return Err("surface.item_selector must not be empty".to_string());
        }
        if self.content_selector.trim().is_empty() {
            return Err("surface.content_selector must not be empty".to_string());
        }
        if !(self.scroll_factor.is_finite() && self.scroll_factor > 0.0) {
            return Err("surface.scroll_factor must be a positive number".to_string());
        }
        if self.reveal_poll_ms == 0 {
            return Err("surface.reveal_poll_ms must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = SurfaceConfig::default();
        assert!(config.headless);
        assert_eq!(config.navigation_timeout(), Duration::from_secs(30));
        assert_eq!(config.settle_after_navigation(), Duration::from_millis(3000));
        assert_eq!(config.reveal_timeout(), Duration::from_secs(20));
        assert_eq!(config.scroll_settle(), Duration::from_millis(200));
        assert_eq!(config.scroll_factor, 8.5);
        assert_eq!(config.id_attribute, "data-before-current-y");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty_selector = SurfaceConfig {
            item_selector: " ".into(),
            ..Default::default()
        };
        assert!(empty_selector.validate().is_err());

        let bad_factor = SurfaceConfig {
            scroll_factor: 0.0,
            ..Default::default()
        };
        assert!(bad_factor.validate().is_err());

        let nan_factor = SurfaceConfig {
            scroll_factor: f64::NAN,
            ..Default::default()
        };
        assert!(nan_factor.validate().is_err());
    }
}
