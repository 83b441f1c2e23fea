//! Playwright-backed browser driver.
//!
//! Wraps a single Chromium page and classifies Playwright failures into the
//! journey's error taxonomy so the retry policy can tell transient faults
//! from structural ones.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use playwright::api::{Browser, BrowserContext, Page, ProxySettings, Viewport};
use playwright::Playwright;
use tokio::sync::Mutex;

use crate::config::ProxyConfig;
use crate::driver::traits::{BrowserDriver, DriverResult};
use crate::error::JourneyError;

/// Browser session configuration.
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub proxy: Option<ProxyConfig>,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            proxy: None,
        }
    }
}

/// Web driver using Playwright.
pub struct WebDriver {
    #[allow(dead_code)]
    playwright: Arc<Playwright>,
    browser: Arc<Browser>,
    #[allow(dead_code)]
    context: Arc<BrowserContext>,
    page: Arc<Mutex<Page>>,
}

impl WebDriver {
    /// Launch Chromium and open a fresh page.
    pub async fn new(config: WebDriverConfig) -> Result<Self> {
        let playwright = Playwright::initialize()
            .await
            .context("Failed to initialize Playwright")?;

        let chromium = playwright.chromium();
        let mut launcher = chromium.launcher();
        launcher = launcher.headless(config.headless);

        // Honor a pre-installed browser instead of a Playwright download.
        let env_path = std::env::var("PLAYWRIGHT_CHROMIUM_EXECUTABLE_PATH")
            .ok()
            .map(PathBuf::from);
        if let Some(ref path) = env_path {
            debug!("using browser executable from env: {}", path.display());
            launcher = launcher.executable(path);
        }

        if let Some(ref proxy) = config.proxy {
            debug!("launching with proxy: {}", proxy.server);
            launcher = launcher.proxy(ProxySettings {
                server: proxy.server.clone(),
                bypass: None,
                username: proxy.username.clone(),
                password: proxy.password.clone(),
            });
        }

        let browser = launcher.launch().await.context("Failed to launch Chromium")?;
        let context = browser
            .context_builder()
            .build()
            .await
            .context("Failed to create browser context")?;
        let page = context.new_page().await.context("Failed to open page")?;

        page.set_viewport_size(Viewport {
            width: config.viewport_width as i32,
            height: config.viewport_height as i32,
        })
        .await?;

        Ok(Self {
            playwright: Arc::new(playwright),
            browser: Arc::new(browser),
            context: Arc::new(context),
            page: Arc::new(Mutex::new(page)),
        })
    }
}

/// Classify a navigation-level failure.
fn nav_error(action: &str, err: impl std::fmt::Display) -> JourneyError {
    let msg = format!("{}: {}", action, err);
    let lower = msg.to_lowercase();
    if lower.contains("timeout") {
        JourneyError::Timeout(msg)
    } else {
        JourneyError::Connection(msg)
    }
}

/// Classify an element-level failure.
fn element_error(action: &str, selector: &str, err: impl std::fmt::Display) -> JourneyError {
    let msg = format!("{} '{}': {}", action, selector, err);
    let lower = msg.to_lowercase();
    if lower.contains("timeout") {
        JourneyError::Timeout(msg)
    } else if lower.contains("net::") || lower.contains("connection") {
        JourneyError::Connection(msg)
    } else {
        JourneyError::ElementNotReady(msg)
    }
}

#[async_trait]
impl BrowserDriver for WebDriver {
    async fn goto(&self, url: &str) -> DriverResult<()> {
        let page = self.page.lock().await;
        page.goto_builder(url)
            .goto()
            .await
            .map_err(|e| nav_error("goto", e))?;
        Ok(())
    }

    async fn current_url(&self) -> DriverResult<String> {
        let page = self.page.lock().await;
        let url: String = page
            .evaluate("() => window.location.href", ())
            .await
            .map_err(|e| nav_error("current_url", e))?;
        Ok(url)
    }

    async fn click(&self, selector: &str) -> DriverResult<()> {
        let page = self.page.lock().await;
        page.click_builder(selector)
            .click()
            .await
            .map_err(|e| element_error("click", selector, e))?;
        Ok(())
    }

    async fn hover(&self, selector: &str) -> DriverResult<()> {
        let page = self.page.lock().await;
        // Resolve the element center and move the pointer there, so the
        // hover produces the same mouse events a user would.
        let center: Vec<f64> = page
            .evaluate_on_selector(
                selector,
                "el => { const r = el.getBoundingClientRect(); return [r.x + r.width / 2, r.y + r.height / 2]; }",
                None::<String>,
            )
            .await
            .map_err(|e| element_error("hover", selector, e))?;
        if center.len() != 2 {
            return Err(JourneyError::ElementNotReady(format!(
                "hover '{}': element has no box",
                selector
            )));
        }
        page.mouse
            .r#move(center[0], center[1], None)
            .await
            .map_err(|e| element_error("hover", selector, e))?;
        Ok(())
    }

    async fn type_char(&self, selector: &str, ch: char) -> DriverResult<()> {
        let page = self.page.lock().await;
        let _: () = page
            .evaluate_on_selector(selector, "el => el.focus()", None::<String>)
            .await
            .map_err(|e| element_error("focus", selector, e))?;
        page.keyboard
            .input_text(&ch.to_string())
            .await
            .map_err(|e| element_error("type", selector, e))?;
        Ok(())
    }

    async fn count(&self, selector: &str) -> DriverResult<usize> {
        let page = self.page.lock().await;
        let elements = page
            .query_selector_all(selector)
            .await
            .map_err(|e| element_error("count", selector, e))?;
        Ok(elements.len())
    }

    async fn wait_visible(&self, selector: &str, timeout_ms: u64) -> DriverResult<bool> {
        let page = self.page.lock().await;
        let result = page
            .wait_for_selector_builder(selector)
            .timeout(timeout_ms as f64)
            .wait_for_selector()
            .await;
        Ok(result.is_ok())
    }

    async fn text(&self, selector: &str) -> DriverResult<String> {
        let page = self.page.lock().await;
        let js = "el => el.value || el.innerText || el.textContent || ''";
        match page
            .evaluate_on_selector::<String, _>(selector, js, None::<String>)
            .await
        {
            Ok(text) => Ok(text),
            Err(_) => Ok(String::new()),
        }
    }

    async fn scroll_to_bottom(&self) -> DriverResult<()> {
        let page = self.page.lock().await;
        page.evaluate::<(), ()>("window.scrollTo(0, document.body.scrollHeight)", ())
            .await
            .map_err(|e| nav_error("scroll", e))?;
        Ok(())
    }

    async fn scroll_to_top(&self) -> DriverResult<()> {
        let page = self.page.lock().await;
        page.evaluate::<(), ()>("window.scrollTo(0, 0)", ())
            .await
            .map_err(|e| nav_error("scroll", e))?;
        Ok(())
    }

    async fn back(&self) -> DriverResult<()> {
        let page = self.page.lock().await;
        page.evaluate::<(), ()>("window.history.back()", ())
            .await
            .map_err(|e| nav_error("back", e))?;
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> DriverResult<()> {
        let page = self.page.lock().await;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| JourneyError::Connection(format!("screenshot dir: {}", e)))?;
        }
        page.screenshot_builder()
            .path(path.to_path_buf())
            .screenshot()
            .await
            .map_err(|e| nav_error("screenshot", e))?;
        Ok(())
    }

    async fn close(&self) -> DriverResult<()> {
        self.browser
            .close()
            .await
            .map_err(|e| nav_error("close", e))?;
        Ok(())
    }
}
