use async_trait::async_trait;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info};

use crate::app::{Result, TrawlError};
use crate::surface::script::{RawItem, REVEAL_READY};
use crate::surface::{BatchEntry, ContentSurface, SurfaceConfig, SurfaceScripts};

/// Content surface backed by a Chromium page.
pub struct ChromeSurface {
    page: Page,
    config: SurfaceConfig,
    scripts: SurfaceScripts,
}

impl ChromeSurface {
    pub fn new(page: Page, config: SurfaceConfig) -> Self {
        let scripts = SurfaceScripts::new(&config);
        Self {
            page,
            config,
            scripts,
        }
    }

    async fn eval<T: DeserializeOwned>(&self, script: &str) -> Result<T> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| TrawlError::AdapterTransient(format!("Script execution failed: {}", e)))?
            .into_value()
            .map_err(|e| TrawlError::AdapterTransient(format!("Failed to parse result: {:?}", e)))
    }

    async fn count_items(&self) -> Result<usize> {
        self.eval(self.scripts.count_items()).await
    }

    /// Poll until the reveal control is clickable or the bounded wait runs out.
    async fn wait_for_reveal_control(&self) -> Result<()> {
        let deadline = Instant::now() + self.config.reveal_timeout();
        let mut last_state = String::new();

        loop {
            match self.eval::<String>(self.scripts.reveal_probe()).await {
                Ok(state) if state == REVEAL_READY => return Ok(()),
                Ok(state) => last_state = state,
                Err(e) => last_state = e.to_string(),
            }

            if Instant::now() >= deadline {
                return Err(TrawlError::AdapterFatal(format!(
                    "'{}' did not become clickable within {}s (last state: {})",
                    self.config.reveal_selector, self.config.reveal_timeout_secs, last_state
                )));
            }
            sleep(self.config.reveal_poll()).await;
        }
    }
}

#[async_trait]
impl ContentSurface for ChromeSurface {
    async fn entry_point(&mut self, source: &str) -> Result<()> {
        info!("Opening {}", source);

        match timeout(self.config.navigation_timeout(), self.page.goto(source)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(TrawlError::AdapterFatal(format!("Navigation failed: {}", e)));
            }
            Err(_) => {
                return Err(TrawlError::AdapterFatal(format!(
                    "Navigation timed out after {}s",
                    self.config.navigation_timeout_secs
                )));
            }
        }
        sleep(self.config.settle_after_navigation()).await;

        self.wait_for_reveal_control().await?;

        let clicked: bool = self
            .eval(self.scripts.reveal_click())
            .await
            .map_err(|e| TrawlError::AdapterFatal(format!("Failed to open item list: {}", e)))?;
        if !clicked {
            return Err(TrawlError::AdapterFatal(format!(
                "'{}' disappeared before it could be clicked",
                self.config.reveal_selector
            )));
        }

        sleep(self.config.settle_after_navigation()).await;
        info!("Item list opened");
        Ok(())
    }

    async fn current_batch(&mut self) -> Result<Vec<BatchEntry>> {
        let raw: Vec<RawItem> = self.eval(self.scripts.extract_items()).await?;
        debug!("{} items visible", raw.len());

        Ok(raw
            .into_iter()
            .enumerate()
            .map(|(index, item)| item.into_entry(index))
            .collect())
    }

    async fn try_advance(&mut self) -> Result<bool> {
        let before = self.count_items().await?;
        let _offset: f64 = self.eval(self.scripts.scroll()).await?;
        sleep(self.config.scroll_settle()).await;
        let after = self.count_items().await?;

        debug!("Scroll check: {} -> {} items", before, after);
        Ok(after > before)
    }
}
