//! Session guard: detects silent logouts and restores the session.
//!
//! Authentication state is never cached. It is derived from the browser's
//! current location each time it is needed, so an unexpected redirect back
//! to the login form cannot leave the journey acting on stale state.

use log::{info, warn};
use regex::Regex;

use crate::config::Credentials;
use crate::driver::BrowserDriver;
use crate::error::JourneyError;
use crate::humanize;
use crate::pacing::Pacing;
use crate::site::{self, selectors};

const LOGIN_FORM_TIMEOUT_MS: u64 = 10_000;
const LANDING_TIMEOUT_MS: u64 = 10_000;

/// Outcome of an authentication check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    AlreadyAuthenticated,
    ReAuthenticated,
}

pub struct SessionGuard {
    credentials: Credentials,
    base_url: String,
    login_page: Regex,
}

impl SessionGuard {
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        let base = base_url.trim_end_matches('/');
        // The login form lives at the site root, optionally /index.html.
        let login_page = Regex::new(&format!(
            r"^{}/?(index\.html)?(\?.*)?$",
            regex::escape(base)
        ))
        .unwrap();
        Self {
            credentials,
            base_url: base.to_string(),
            login_page,
        }
    }

    /// Whether `url` is the login page.
    pub fn is_login_page(&self, url: &str) -> bool {
        self.login_page.is_match(url.trim())
    }

    /// Derive authentication state from the current location and re-login
    /// only when the browser was bounced back to the login form. Calling
    /// this while authenticated performs no browser interaction beyond the
    /// location query.
    pub async fn ensure_authenticated(
        &self,
        driver: &dyn BrowserDriver,
        pacing: &Pacing,
    ) -> Result<AuthStatus, JourneyError> {
        let location = driver.current_url().await?;
        if !self.is_login_page(&location) {
            return Ok(AuthStatus::AlreadyAuthenticated);
        }

        warn!("session dropped, browser is back on the login page ({})", location);
        self.login(driver, pacing).await?;
        Ok(AuthStatus::ReAuthenticated)
    }

    /// The full login sequence: navigate to the form if needed, human-paced
    /// credential entry, submit, then verify the inventory landing page.
    pub async fn login(
        &self,
        driver: &dyn BrowserDriver,
        pacing: &Pacing,
    ) -> Result<(), JourneyError> {
        let location = driver.current_url().await?;
        if !self.is_login_page(&location) {
            driver.goto(&self.base_url).await?;
        }

        let form_ready = driver
            .wait_visible(selectors::USERNAME_INPUT, LOGIN_FORM_TIMEOUT_MS)
            .await?;
        if !form_ready {
            return Err(JourneyError::ElementNotReady(
                "login form did not appear".into(),
            ));
        }

        humanize::type_text(
            driver,
            pacing,
            selectors::USERNAME_INPUT,
            &self.credentials.username,
        )
        .await?;
        humanize::type_text(
            driver,
            pacing,
            selectors::PASSWORD_INPUT,
            &self.credentials.password,
        )
        .await?;
        humanize::hover(driver, pacing, selectors::LOGIN_BUTTON).await?;
        driver.click(selectors::LOGIN_BUTTON).await?;

        let landed = driver
            .wait_visible(selectors::INVENTORY_ITEM, LANDING_TIMEOUT_MS)
            .await?;
        let location = driver.current_url().await?;
        if !landed || !location.contains(site::INVENTORY_PATH) {
            return Err(JourneyError::SessionLost { location });
        }

        info!("logged in as {}", self.credentials.username);
        Ok(())
    }
}
