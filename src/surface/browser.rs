use std::path::Path;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::{Result, TrawlError};
use crate::surface::SurfaceConfig;

/// A launched browser and the single page a run drives.
///
/// Call [`close`](Self::close) on every exit path. Dropping without closing
/// still stops the CDP event loop, but leaves the browser process to the
/// library's own cleanup.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch the browser with a persistent profile directory.
    pub async fn launch(config: &SurfaceConfig, profile_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(profile_dir)?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile_dir)
            .request_timeout(config.navigation_timeout())
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-blink-features=AutomationControlled");

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref executable) = config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        let browser_config = builder
            .build()
            .map_err(|e| TrawlError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            TrawlError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(TrawlError::Browser(format!("Failed to create page: {}", e)));
            }
        };

        if let Some(ref ua) = config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| TrawlError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        info!("Browser launched with profile {}", profile_dir.display());

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    /// The page shared by the session provider and the content surface.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Shut the browser down and wait for the process to exit.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
        info!("Browser closed");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
