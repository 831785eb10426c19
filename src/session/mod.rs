//! Authenticated sessions.
//!
//! Collection never starts before [`SessionProvider::ensure_authenticated`]
//! succeeds. [`PersistentSession`] tries the cheapest way to get there first:
//!
//! ```text
//! already logged in? → restore saved cookies → interactive login → save cookies
//! ```

mod chrome;
mod config;
mod cookies;

pub use chrome::ChromeSessionBackend;
pub use config::SessionConfig;
pub use cookies::{CookieJar, StoredCookie};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::app::{Result, TrawlError};

/// Guarantees a logged-in session before collection starts.
#[async_trait]
pub trait SessionProvider: Send {
    /// Succeeds once the session is authenticated. Safe to call repeatedly.
    async fn ensure_authenticated(&mut self) -> Result<()>;
}

/// The browser-facing steps a [`PersistentSession`] is built from.
#[async_trait]
pub trait SessionBackend: Send {
    async fn is_logged_in(&mut self) -> Result<bool>;

    /// Install cookies and reload so they take effect.
    async fn import_cookies(&mut self, cookies: &[StoredCookie]) -> Result<()>;

    async fn export_cookies(&mut self) -> Result<Vec<StoredCookie>>;

    /// Let a person log in by hand. Returns once they say they are done.
    async fn interactive_login(&mut self) -> Result<()>;
}

/// Session provider that persists cookies between runs.
pub struct PersistentSession<B: SessionBackend> {
    backend: B,
    jar: CookieJar,
    clear_on_release: bool,
    authenticated: bool,
}

impl<B: SessionBackend> PersistentSession<B> {
    pub fn new(backend: B, jar: CookieJar, clear_on_release: bool) -> Self {
        Self {
            backend,
            jar,
            clear_on_release,
            authenticated: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Forget the saved cookies if so configured. Call when the browser goes away.
    pub fn release(&self) {
        if !self.clear_on_release {
            return;
        }
        match self.jar.remove() {
            Ok(true) => info!("Removed cookie file {}", self.jar.path().display()),
            Ok(false) => {}
            Err(e) => warn!("Failed to remove cookie file: {}", e),
        }
    }

    async fn check(&mut self) -> bool {
        match self.backend.is_logged_in().await {
            Ok(logged_in) => logged_in,
            Err(e) => {
                warn!("Login check failed: {}", e);
                false
            }
        }
    }

    async fn restore_cookies(&mut self) -> bool {
        let cookies = match self.jar.load() {
            Ok(Some(cookies)) if !cookies.is_empty() => cookies,
            Ok(_) => return false,
            Err(e) => {
                warn!("Failed to load cookies: {}", e);
                return false;
            }
        };

        if let Err(e) = self.backend.import_cookies(&cookies).await {
            warn!("Failed to restore cookies: {}", e);
            return false;
        }
        info!("Restored {} saved cookies", cookies.len());
        true
    }
}

#[async_trait]
impl<B: SessionBackend> SessionProvider for PersistentSession<B> {
    async fn ensure_authenticated(&mut self) -> Result<()> {
        if self.authenticated {
            return Ok(());
        }

        if self.check().await {
            info!("Session already logged in");
            self.authenticated = true;
            return Ok(());
        }

        warn!("Session is not logged in, trying to restore it");
        if self.restore_cookies().await && self.check().await {
            info!("Session restored from saved cookies");
            self.authenticated = true;
            return Ok(());
        }

        self.backend.interactive_login().await?;
        if !self.check().await {
            return Err(TrawlError::Authentication(
                "login could not be verified after interactive login".into(),
            ));
        }

        let cookies = self.backend.export_cookies().await?;
        self.jar.save(&cookies)?;
        info!("Saved {} cookies to {}", cookies.len(), self.jar.path().display());

        self.authenticated = true;
        Ok(())
    }
}
