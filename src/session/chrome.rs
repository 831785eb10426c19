use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::Page;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep, Duration, Instant};
use tracing::debug;

use crate::app::{Result, TrawlError};
use crate::session::{SessionBackend, SessionConfig, StoredCookie};
use crate::surface::link_text_probe;

const CHECK_POLL: Duration = Duration::from_millis(500);

/// Session steps carried out on a Chromium page.
pub struct ChromeSessionBackend {
    page: Page,
    config: SessionConfig,
    headless: bool,
}

impl ChromeSessionBackend {
    pub fn new(page: Page, config: SessionConfig, headless: bool) -> Self {
        Self {
            page,
            config,
            headless,
        }
    }

    async fn marker_present(&self, probe: &str) -> Result<bool> {
        self.page
            .evaluate(probe)
            .await
            .map_err(|e| TrawlError::Browser(format!("Login probe failed: {}", e)))?
            .into_value()
            .map_err(|e| TrawlError::Browser(format!("Failed to parse login probe: {:?}", e)))
    }
}

#[async_trait]
impl SessionBackend for ChromeSessionBackend {
    async fn is_logged_in(&mut self) -> Result<bool> {
        self.page
            .goto(self.config.home_url.as_str())
            .await
            .map_err(|e| TrawlError::Browser(format!("Failed to open {}: {}", self.config.home_url, e)))?;

        let probe = link_text_probe(&self.config.logged_in_link_text);
        let deadline = Instant::now() + self.config.check_timeout();

        loop {
            if self.marker_present(&probe).await.unwrap_or(false) {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                debug!(
                    "'{}' not found within {}s",
                    self.config.logged_in_link_text, self.config.check_timeout_secs
                );
                return Ok(false);
            }
            sleep(CHECK_POLL).await;
        }
    }

    async fn import_cookies(&mut self, cookies: &[StoredCookie]) -> Result<()> {
        let params = cookies
            .iter()
            .map(|c| {
                CookieParam::builder()
                    .name(c.name.clone())
                    .value(c.value.clone())
                    .domain(c.domain.clone())
                    .path(c.path.clone())
                    .secure(c.secure)
                    .http_only(c.http_only)
                    .build()
                    .map_err(|e| TrawlError::Other(format!("Invalid cookie {}: {}", c.name, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        self.page
            .set_cookies(params)
            .await
            .map_err(|e| TrawlError::Browser(format!("Failed to set cookies: {}", e)))?;
        self.page
            .reload()
            .await
            .map_err(|e| TrawlError::Browser(format!("Failed to reload page: {}", e)))?;
        Ok(())
    }

    async fn export_cookies(&mut self) -> Result<Vec<StoredCookie>> {
        let cookies = self
            .page
            .get_cookies()
            .await
            .map_err(|e| TrawlError::Browser(format!("Failed to read cookies: {}", e)))?;

        Ok(cookies
            .into_iter()
            .map(|c| StoredCookie {
                name: c.name,
                value: c.value,
                domain: c.domain,
                path: c.path,
                secure: c.secure,
                http_only: c.http_only,
            })
            .collect())
    }

    async fn interactive_login(&mut self) -> Result<()> {
        if self.headless {
            return Err(TrawlError::Authentication(
                "interactive login needs a visible browser; run `trawl login --headed` first"
                    .into(),
            ));
        }

        self.page
            .goto(self.config.login_url.as_str())
            .await
            .map_err(|e| TrawlError::Browser(format!("Failed to open {}: {}", self.config.login_url, e)))?;

        println!("Log in using the browser window:");
        println!("  1. The login page {} is open", self.config.login_url);
        println!("  2. Complete the login (for example by scanning the QR code)");
        println!("  3. Leave the page as it is once logged in");
        println!("Press Enter once you are logged in...");
        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await?;
        Ok(())
    }
}
