//! The journey runner: a state machine that drives the full shopping
//! journey (proxy check, login, per-product browsing, cart operations,
//! logout) and records every step.
//!
//! Failure handling is split by blast radius: one flaky product page is
//! recorded and skipped over, while proxy failures, login failures and
//! unrecovered session loss abort the run. A summary is emitted in every
//! case, including abort and interrupt.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;
use log::warn;
use uuid::Uuid;

use crate::config::RunConfig;
use crate::driver::BrowserDriver;
use crate::error::JourneyError;
use crate::humanize;
use crate::journey::events::{ConsoleEventListener, EventEmitter, JourneyEvent};
use crate::journey::state::JourneyState;
use crate::pacing::Pacing;
use crate::probe;
use crate::report::types::RunReport;
use crate::retry::RetryPolicy;
use crate::session::{AuthStatus, SessionGuard};
use crate::site::{self, selectors};

const ELEMENT_TIMEOUT_MS: u64 = 10_000;
/// Upper bound of the product count picked when none is configured.
const DEFAULT_PRODUCT_RANGE: usize = 3;

pub type BoxedDriverFuture =
    Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn BrowserDriver>>> + Send>>;

/// Opens the browser session. Called lazily so that a failed proxy check
/// never opens one; called at most once per run.
pub type DriverFactory = Box<dyn FnMut() -> BoxedDriverFuture + Send>;

pub struct JourneyRunner {
    factory: DriverFactory,
    driver: Option<Box<dyn BrowserDriver>>,
    config: RunConfig,
    pacing: Pacing,
    retry: RetryPolicy,
    guard: SessionGuard,
    emitter: EventEmitter,
    state: JourneyState,
    stop: Arc<AtomicBool>,
}

impl JourneyRunner {
    pub fn new(factory: DriverFactory, config: RunConfig, stop: Arc<AtomicBool>) -> Self {
        let (emitter, receiver) = EventEmitter::new();
        tokio::spawn(ConsoleEventListener::listen(receiver));

        let pacing = Pacing::new(config.action_delay, config.typing_delay, config.seed);
        let guard = SessionGuard::new(&config.base_url, config.credentials.clone());

        Self {
            factory,
            driver: None,
            pacing,
            retry: RetryPolicy::default(),
            guard,
            emitter,
            state: JourneyState::new(&Uuid::new_v4().to_string()),
            config,
            stop,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Execute the journey and return the finalized run report. The report
    /// is produced exactly once, also when the run aborts or is
    /// interrupted.
    pub async fn run(mut self) -> anyhow::Result<RunReport> {
        self.state.start();
        self.emitter.emit(JourneyEvent::RunStarted {
            run_id: self.state.run_id.clone(),
        });

        let abort_reason = self.drive().await;

        if let Some(driver) = self.driver.take() {
            if let Err(err) = driver.close().await {
                warn!("browser close failed: {}", err);
            }
        }

        self.state.finish(abort_reason);
        let summary = self.state.summary();
        self.emitter.emit(JourneyEvent::RunFinished {
            summary: summary.clone(),
        });
        // Give the console listener a beat to drain before returning.
        tokio::time::sleep(std::time::Duration::from_millis(250)).await;

        Ok(RunReport {
            run_id: self.state.run_id.clone(),
            steps: self.state.step_reports(),
            summary,
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }

    /// Walk the journey phases in order. Returns the abort reason, if any.
    async fn drive(&mut self) -> Option<String> {
        if let Some(reason) = self.proxy_check().await {
            return Some(reason);
        }
        if self.interrupted() {
            return Some("interrupted".to_string());
        }
        if let Some(reason) = self.login().await {
            return Some(reason);
        }
        if let Some(reason) = self.browse_products().await {
            return Some(reason);
        }
        if self.interrupted() {
            return Some("interrupted".to_string());
        }
        if let Some(reason) = self.view_cart().await {
            return Some(reason);
        }
        if let Some(reason) = self.remove_random_item().await {
            return Some(reason);
        }
        if self.interrupted() {
            return Some("interrupted".to_string());
        }
        self.logout().await;
        None
    }

    fn interrupted(&self) -> bool {
        let stopped = self.stop.load(Ordering::SeqCst);
        if stopped {
            self.emitter.emit(JourneyEvent::Log {
                message: "interrupt received, finishing up".to_string(),
            });
        }
        stopped
    }

    /// `ProxyCheck`: skipped without a proxy; a configured proxy must prove
    /// reachable before any browser session opens.
    async fn proxy_check(&mut self) -> Option<String> {
        let idx = self.begin("proxy-check");
        let proxy = match self.config.proxy.clone() {
            None => {
                self.skip_step(idx, "no proxy configured");
                return None;
            }
            Some(proxy) => proxy,
        };

        match probe::check(&proxy).await {
            Ok(ip) => {
                self.emitter.emit(JourneyEvent::Log {
                    message: format!("proxy egress IP: {}", ip),
                });
                self.finalize_pass(idx, 0, None);
                None
            }
            Err(err) => {
                self.finalize_fail(idx, 0, &err).await;
                Some(format!("proxy connectivity check failed: {}", err))
            }
        }
    }

    /// `Login`: opens the browser session lazily, then runs the full login
    /// sequence under the retry policy. Failure is systemic and aborts.
    async fn login(&mut self) -> Option<String> {
        let idx = self.begin("login");

        if self.driver.is_none() {
            match (self.factory)().await {
                Ok(driver) => self.driver = Some(driver),
                Err(err) => {
                    let err = JourneyError::Connection(format!("browser launch failed: {}", err));
                    self.finalize_fail(idx, 0, &err).await;
                    return Some(err.to_string());
                }
            }
        }
        let Some(driver) = self.driver.as_deref() else {
            return Some("browser session missing".to_string());
        };

        let guard = &self.guard;
        let pacing = &self.pacing;
        let emitter = &self.emitter;
        let attempts = Cell::new(0u32);
        let result = self
            .retry
            .run(
                move || guard.login(driver, pacing),
                |attempt, max_attempts| {
                    attempts.set(attempt);
                    emitter.emit(JourneyEvent::StepRetrying {
                        index: idx,
                        attempt,
                        max_attempts,
                    });
                },
            )
            .await;
        let retries = attempts.get().saturating_sub(1);

        match result {
            Ok(()) => {
                let shot = self.capture("after_login").await;
                self.finalize_pass(idx, retries, shot);
                self.ensure_session().await
            }
            Err(err) => {
                self.finalize_fail(idx, retries, &err).await;
                Some(format!("login failed: {}", err))
            }
        }
    }

    /// `BrowseProducts(i)`: each product iteration is retried
    /// independently; exhausted transient retries fail only that product,
    /// while a structural mismatch aborts the run.
    async fn browse_products(&mut self) -> Option<String> {
        let requested = match self.config.product_count {
            Some(count) => count as usize,
            None => self.pacing.pick_index(DEFAULT_PRODUCT_RANGE) + 1,
        };

        let listing = match self.scan_inventory().await {
            Ok(count) => count,
            Err(err) => {
                let idx = self.begin("browse-products");
                self.finalize_fail(idx, 0, &err).await;
                return Some(format!("inventory listing unavailable: {}", err));
            }
        };

        let count = requested.min(listing);
        if count < requested {
            self.emitter.emit(JourneyEvent::Log {
                message: format!(
                    "catalog has {} products, browsing {} instead of {}",
                    listing, count, requested
                ),
            });
        }

        for product in 0..count {
            if self.interrupted() {
                return Some("interrupted".to_string());
            }

            let idx = self.begin(&format!("browse-product-{}", product + 1));
            let Some(driver) = self.driver.as_deref() else {
                return Some("browser session missing".to_string());
            };

            let pacing = &self.pacing;
            let emitter = &self.emitter;
            let attempts = Cell::new(0u32);
            let result = self
                .retry
                .run(
                    move || browse_product_once(driver, pacing, product),
                    |attempt, max_attempts| {
                        attempts.set(attempt);
                        emitter.emit(JourneyEvent::StepRetrying {
                            index: idx,
                            attempt,
                            max_attempts,
                        });
                    },
                )
                .await;
            let retries = attempts.get().saturating_sub(1);

            match result {
                Ok(()) => self.finalize_pass(idx, retries, None),
                Err(err) if err.is_retryable() => {
                    // One flaky product must not sink the run.
                    self.finalize_fail(idx, retries, &err).await;
                }
                Err(err) => {
                    self.finalize_fail(idx, retries, &err).await;
                    return Some(format!("product {} failed: {}", product + 1, err));
                }
            }

            if let Some(reason) = self.ensure_session().await {
                return Some(reason);
            }
        }

        None
    }

    /// The pre-browse inventory scan: a reading scroll over the listing,
    /// then a count of what the catalog actually offers.
    async fn scan_inventory(&mut self) -> Result<usize, JourneyError> {
        let Some(driver) = self.driver.as_deref() else {
            return Err(JourneyError::Connection("browser session missing".into()));
        };

        humanize::scan_page(driver, &self.pacing).await?;
        let visible = driver
            .wait_visible(selectors::INVENTORY_ITEM, ELEMENT_TIMEOUT_MS)
            .await?;
        if !visible {
            return Err(JourneyError::Structure(
                "inventory listing not present after login".into(),
            ));
        }

        let listing = driver.count(selectors::INVENTORY_ITEM).await?;
        if listing == 0 {
            return Err(JourneyError::Structure("inventory listing is empty".into()));
        }
        Ok(listing)
    }

    /// `ViewCart`: retryable; an exhausted transient failure is recorded
    /// but the run continues (the remove step will find no cart rows and
    /// skip itself).
    async fn view_cart(&mut self) -> Option<String> {
        let idx = self.begin("view-cart");
        let Some(driver) = self.driver.as_deref() else {
            return Some("browser session missing".to_string());
        };

        let pacing = &self.pacing;
        let emitter = &self.emitter;
        let attempts = Cell::new(0u32);
        let result = self
            .retry
            .run(
                move || view_cart_once(driver, pacing),
                |attempt, max_attempts| {
                    attempts.set(attempt);
                    emitter.emit(JourneyEvent::StepRetrying {
                        index: idx,
                        attempt,
                        max_attempts,
                    });
                },
            )
            .await;
        let retries = attempts.get().saturating_sub(1);

        match result {
            Ok(()) => {
                let shot = self.capture("cart_view").await;
                self.finalize_pass(idx, retries, shot);
                self.ensure_session().await
            }
            Err(err) if err.is_retryable() => {
                self.finalize_fail(idx, retries, &err).await;
                None
            }
            Err(err) => {
                self.finalize_fail(idx, retries, &err).await;
                Some(format!("cart view failed: {}", err))
            }
        }
    }

    /// `RemoveRandomItem`: skipped when the cart is empty, never failed.
    async fn remove_random_item(&mut self) -> Option<String> {
        let idx = self.begin("remove-item");
        let Some(driver) = self.driver.as_deref() else {
            return Some("browser session missing".to_string());
        };

        let items = match driver.count(selectors::CART_ITEM).await {
            Ok(items) => items,
            Err(err) => {
                let fatal = !err.is_retryable();
                self.finalize_fail(idx, 0, &err).await;
                return fatal.then(|| format!("cart inspection failed: {}", err));
            }
        };

        if items == 0 {
            self.skip_step(idx, "cart is empty");
            return None;
        }

        let pick = self.pacing.pick_index(items);
        self.emitter.emit(JourneyEvent::Log {
            message: format!("removing cart item {} of {}", pick + 1, items),
        });
        let target = site::cart_remove_button_at(pick);

        let Some(driver) = self.driver.as_deref() else {
            return Some("browser session missing".to_string());
        };
        let pacing = &self.pacing;
        let emitter = &self.emitter;
        let target = target.as_str();
        let attempts = Cell::new(0u32);
        let result = self
            .retry
            .run(
                move || remove_item_once(driver, pacing, target),
                |attempt, max_attempts| {
                    attempts.set(attempt);
                    emitter.emit(JourneyEvent::StepRetrying {
                        index: idx,
                        attempt,
                        max_attempts,
                    });
                },
            )
            .await;
        let retries = attempts.get().saturating_sub(1);

        match result {
            Ok(()) => {
                self.finalize_pass(idx, retries, None);
                None
            }
            Err(err) if err.is_retryable() => {
                self.finalize_fail(idx, retries, &err).await;
                None
            }
            Err(err) => {
                self.finalize_fail(idx, retries, &err).await;
                Some(format!("cart removal failed: {}", err))
            }
        }
    }

    /// `Logout`: retryable, but the journey reaches `Done` regardless; a
    /// failed logout never blocks summary emission.
    async fn logout(&mut self) {
        let idx = self.begin("logout");
        let Some(driver) = self.driver.as_deref() else {
            return;
        };

        let pacing = &self.pacing;
        let emitter = &self.emitter;
        let attempts = Cell::new(0u32);
        let result = self
            .retry
            .run(
                move || logout_once(driver, pacing),
                |attempt, max_attempts| {
                    attempts.set(attempt);
                    emitter.emit(JourneyEvent::StepRetrying {
                        index: idx,
                        attempt,
                        max_attempts,
                    });
                },
            )
            .await;
        let retries = attempts.get().saturating_sub(1);

        match result {
            Ok(()) => {
                let shot = self.capture("after_logout").await;
                self.finalize_pass(idx, retries, shot);
            }
            Err(err) => {
                self.finalize_fail(idx, retries, &err).await;
            }
        }
    }

    /// Session check after a navigation-producing step. Recovered session
    /// loss is logged, not surfaced; unrecovered loss aborts.
    async fn ensure_session(&self) -> Option<String> {
        let Some(driver) = self.driver.as_deref() else {
            return Some("browser session missing".to_string());
        };

        match self.guard.ensure_authenticated(driver, &self.pacing).await {
            Ok(AuthStatus::AlreadyAuthenticated) => None,
            Ok(AuthStatus::ReAuthenticated) => {
                self.emitter.emit(JourneyEvent::Log {
                    message: "session restored after unexpected logout".to_string(),
                });
                None
            }
            Err(err) => Some(format!("session could not be restored: {}", err)),
        }
    }

    fn begin(&mut self, name: &str) -> usize {
        let idx = self.state.begin_step(name);
        self.emitter.emit(JourneyEvent::StepStarted {
            index: idx,
            name: name.to_string(),
        });
        idx
    }

    fn finalize_pass(&mut self, idx: usize, retry_count: u32, screenshot: Option<String>) {
        let record = self.state.step_mut(idx);
        record.retry_count = retry_count;
        record.screenshot_path = screenshot;
        record.pass();
        let duration_ms = record.duration_ms.unwrap_or(0);
        self.emitter.emit(JourneyEvent::StepPassed {
            index: idx,
            duration_ms,
        });
    }

    async fn finalize_fail(&mut self, idx: usize, retry_count: u32, err: &JourneyError) {
        let tag = self.state.step_mut(idx).name.clone();
        let screenshot = self.capture(&tag).await;
        let record = self.state.step_mut(idx);
        record.retry_count = retry_count;
        record.screenshot_path = screenshot;
        record.fail(err.to_string());
        let duration_ms = record.duration_ms.unwrap_or(0);
        self.emitter.emit(JourneyEvent::StepFailed {
            index: idx,
            error: err.to_string(),
            duration_ms,
        });
    }

    fn skip_step(&mut self, idx: usize, reason: &str) {
        let record = self.state.step_mut(idx);
        record.skip(reason.to_string());
        self.emitter.emit(JourneyEvent::StepSkipped {
            index: idx,
            reason: reason.to_string(),
        });
    }

    /// Best-effort screenshot tagged with the step name.
    async fn capture(&self, tag: &str) -> Option<String> {
        let driver = self.driver.as_deref()?;
        let filename = format!(
            "screenshot_{}_{}.png",
            tag,
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.config.output_dir.join(filename);
        match driver.screenshot(&path).await {
            Ok(()) => Some(path.display().to_string()),
            Err(err) => {
                warn!("screenshot for '{}' failed: {}", tag, err);
                None
            }
        }
    }
}

/// One browse attempt: hover the tile, open the detail page, linger, add to
/// cart, return to the listing.
async fn browse_product_once(
    driver: &dyn BrowserDriver,
    pacing: &Pacing,
    product: usize,
) -> Result<(), JourneyError> {
    humanize::hover(driver, pacing, &site::inventory_item_at(product)).await?;
    driver.click(&site::inventory_item_name_at(product)).await?;

    let ready = driver
        .wait_visible(selectors::ADD_TO_CART_BUTTON, ELEMENT_TIMEOUT_MS)
        .await?;
    if !ready {
        return Err(JourneyError::ElementNotReady(
            "add-to-cart button not visible".into(),
        ));
    }

    pacing.pause().await;
    driver.click(selectors::ADD_TO_CART_BUTTON).await?;
    pacing.pause().await;

    driver.back().await?;
    let listed = driver
        .wait_visible(selectors::INVENTORY_ITEM, ELEMENT_TIMEOUT_MS)
        .await?;
    if !listed {
        return Err(JourneyError::Timeout(
            "inventory listing did not return".into(),
        ));
    }
    Ok(())
}

async fn view_cart_once(driver: &dyn BrowserDriver, pacing: &Pacing) -> Result<(), JourneyError> {
    humanize::hover(driver, pacing, selectors::CART_LINK).await?;
    driver.click(selectors::CART_LINK).await?;
    let ready = driver
        .wait_visible(selectors::CART_LIST, ELEMENT_TIMEOUT_MS)
        .await?;
    if !ready {
        return Err(JourneyError::ElementNotReady("cart list not visible".into()));
    }
    Ok(())
}

async fn remove_item_once(
    driver: &dyn BrowserDriver,
    pacing: &Pacing,
    selector: &str,
) -> Result<(), JourneyError> {
    humanize::hover(driver, pacing, selector).await?;
    driver.click(selector).await?;
    Ok(())
}

async fn logout_once(driver: &dyn BrowserDriver, pacing: &Pacing) -> Result<(), JourneyError> {
    humanize::hover(driver, pacing, selectors::MENU_BUTTON).await?;
    driver.click(selectors::MENU_BUTTON).await?;
    // Let the sidebar menu slide in.
    pacing.pause().await;

    let ready = driver
        .wait_visible(selectors::LOGOUT_LINK, ELEMENT_TIMEOUT_MS)
        .await?;
    if !ready {
        return Err(JourneyError::ElementNotReady("logout link not visible".into()));
    }

    humanize::hover(driver, pacing, selectors::LOGOUT_LINK).await?;
    driver.click(selectors::LOGOUT_LINK).await?;

    let back_on_login = driver
        .wait_visible(selectors::LOGIN_BUTTON, ELEMENT_TIMEOUT_MS)
        .await?;
    if !back_on_login {
        return Err(JourneyError::Timeout(
            "login page did not return after logout".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, DelayRange, ProxyConfig};
    use crate::driver::mock::MockDriver;
    use crate::journey::state::{RunOutcome, StepStatus};
    use std::time::Duration;

    const BASE: &str = "https://www.saucedemo.com";

    fn test_config(products: u8) -> RunConfig {
        RunConfig {
            credentials: Credentials {
                username: "standard_user".into(),
                password: "secret_sauce".into(),
            },
            headless: true,
            product_count: Some(products),
            action_delay: DelayRange::new(0.0, 0.0),
            typing_delay: DelayRange::new(0.0, 0.0),
            proxy: None,
            seed: Some(7),
            output_dir: std::env::temp_dir().join("humanflow-tests"),
            base_url: BASE.into(),
        }
    }

    fn scripted_driver() -> MockDriver {
        let driver = MockDriver::new();
        driver.set_url("about:blank");
        driver.nav_on_click(selectors::LOGIN_BUTTON, &format!("{}/inventory.html", BASE));
        driver.nav_on_click(selectors::CART_LINK, &format!("{}/cart.html", BASE));
        driver.nav_on_click(selectors::LOGOUT_LINK, &format!("{}/", BASE));
        driver.set_count(selectors::INVENTORY_ITEM, 6);
        driver.set_count(selectors::CART_ITEM, 3);
        driver
    }

    fn runner_for(driver: &MockDriver, config: RunConfig) -> JourneyRunner {
        let handle = driver.clone();
        let factory: DriverFactory = Box::new(move || {
            let driver = handle.clone();
            Box::pin(async move { Ok(Box::new(driver) as Box<dyn BrowserDriver>) })
        });
        JourneyRunner::new(factory, config, Arc::new(AtomicBool::new(false))).with_retry(
            RetryPolicy {
                max_attempts: 3,
                delay: Duration::from_millis(1),
            },
        )
    }

    fn step_names(report: &RunReport) -> Vec<String> {
        report.steps.iter().map(|s| s.name.clone()).collect()
    }

    #[tokio::test]
    async fn full_journey_completes_with_expected_steps() {
        let driver = scripted_driver();
        let report = runner_for(&driver, test_config(3)).run().await.unwrap();

        assert_eq!(
            step_names(&report),
            vec![
                "proxy-check",
                "login",
                "browse-product-1",
                "browse-product-2",
                "browse-product-3",
                "view-cart",
                "remove-item",
                "logout",
            ]
        );
        assert!(matches!(
            report.steps[0].status,
            StepStatus::Skipped { .. }
        ));
        for step in &report.steps[1..] {
            assert_eq!(step.status, StepStatus::Passed, "step {}", step.name);
        }
        assert_eq!(report.summary.outcome, RunOutcome::Completed);
        assert_eq!(report.summary.skipped, 1);
    }

    #[tokio::test]
    async fn one_flaky_product_leaves_a_partial_run() {
        let driver = scripted_driver();
        // Product 2's detail link times out on every attempt.
        driver.fail(
            &format!("click {}", site::inventory_item_name_at(1)),
            JourneyError::Timeout("detail page".into()),
            3,
        );

        let report = runner_for(&driver, test_config(3)).run().await.unwrap();

        let failed: Vec<_> = report
            .steps
            .iter()
            .filter(|s| matches!(s.status, StepStatus::Failed { .. }))
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].name, "browse-product-2");
        assert_eq!(failed[0].retry_count, 2);
        assert_eq!(
            report.summary.outcome,
            RunOutcome::CompletedWithPartialFailures {
                passed: 6,
                failed: 1
            }
        );
        // All three browse steps were attempted.
        assert_eq!(
            report
                .steps
                .iter()
                .filter(|s| s.name.starts_with("browse-product-"))
                .count(),
            3
        );
    }

    #[tokio::test]
    async fn login_exhaustion_aborts_before_browsing() {
        let driver = scripted_driver();
        driver.fail(
            &format!("click {}", selectors::LOGIN_BUTTON),
            JourneyError::Timeout("login submit".into()),
            3,
        );

        let report = runner_for(&driver, test_config(3)).run().await.unwrap();

        assert_eq!(step_names(&report), vec!["proxy-check", "login"]);
        assert!(matches!(
            report.steps[1].status,
            StepStatus::Failed { .. }
        ));
        assert!(matches!(
            report.summary.outcome,
            RunOutcome::Aborted { .. }
        ));
    }

    #[tokio::test]
    async fn empty_cart_skips_removal() {
        let driver = scripted_driver();
        driver.set_count(selectors::CART_ITEM, 0);
        // The one add-to-cart click never lands.
        driver.fail(
            &format!("click {}", selectors::ADD_TO_CART_BUTTON),
            JourneyError::Timeout("add to cart".into()),
            3,
        );

        let report = runner_for(&driver, test_config(1)).run().await.unwrap();

        let remove = report
            .steps
            .iter()
            .find(|s| s.name == "remove-item")
            .expect("remove step recorded");
        assert!(matches!(remove.status, StepStatus::Skipped { .. }));
        assert!(matches!(
            report.summary.outcome,
            RunOutcome::CompletedWithPartialFailures { .. }
        ));
    }

    #[tokio::test]
    async fn unreachable_proxy_aborts_without_a_browser() {
        let driver = scripted_driver();
        let mut config = test_config(3);
        config.proxy = Some(ProxyConfig {
            server: "http://127.0.0.1:1".into(),
            username: None,
            password: None,
        });

        let report = runner_for(&driver, config).run().await.unwrap();

        assert_eq!(step_names(&report), vec!["proxy-check"]);
        assert!(matches!(
            report.summary.outcome,
            RunOutcome::Aborted { .. }
        ));
        // No browser session was ever opened.
        assert!(driver.operations().is_empty());
    }

    #[tokio::test]
    async fn empty_catalog_is_a_structural_abort() {
        let driver = scripted_driver();
        driver.set_count(selectors::INVENTORY_ITEM, 0);

        let report = runner_for(&driver, test_config(3)).run().await.unwrap();

        assert_eq!(
            step_names(&report),
            vec!["proxy-check", "login", "browse-products"]
        );
        assert!(matches!(
            report.summary.outcome,
            RunOutcome::Aborted { .. }
        ));
    }

    #[tokio::test]
    async fn requested_count_is_clamped_to_catalog() {
        let driver = scripted_driver();
        driver.set_count(selectors::INVENTORY_ITEM, 2);

        let report = runner_for(&driver, test_config(5)).run().await.unwrap();

        assert_eq!(
            report
                .steps
                .iter()
                .filter(|s| s.name.starts_with("browse-product-"))
                .count(),
            2
        );
        assert_eq!(report.summary.outcome, RunOutcome::Completed);
    }

    #[tokio::test]
    async fn failed_logout_still_emits_a_summary() {
        let driver = scripted_driver();
        driver.fail(
            &format!("click {}", selectors::MENU_BUTTON),
            JourneyError::Timeout("menu".into()),
            3,
        );

        let report = runner_for(&driver, test_config(1)).run().await.unwrap();

        let logout = report
            .steps
            .iter()
            .find(|s| s.name == "logout")
            .expect("logout step recorded");
        assert!(matches!(logout.status, StepStatus::Failed { .. }));
        assert_eq!(
            report.summary.outcome,
            RunOutcome::CompletedWithPartialFailures {
                passed: 4,
                failed: 1
            }
        );
    }

    #[tokio::test]
    async fn interrupt_finishes_with_a_partial_summary() {
        let driver = scripted_driver();
        let handle = driver.clone();
        let factory: DriverFactory = Box::new(move || {
            let driver = handle.clone();
            Box::pin(async move { Ok(Box::new(driver) as Box<dyn BrowserDriver>) })
        });
        let stop = Arc::new(AtomicBool::new(true));
        let runner = JourneyRunner::new(factory, test_config(3), stop);

        let report = runner.run().await.unwrap();

        // The proxy check runs, then the interrupt short-circuits the rest.
        assert_eq!(step_names(&report), vec!["proxy-check"]);
        assert_eq!(
            report.summary.outcome,
            RunOutcome::Aborted {
                reason: "interrupted".into()
            }
        );
    }
}
