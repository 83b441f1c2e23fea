//! Scripted driver for journey and session-guard tests.
//!
//! Interactions are appended to an operation log; failures are injected per
//! operation key (e.g. `"click #login-button"`) and consumed in order.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::driver::traits::{BrowserDriver, DriverResult};
use crate::error::JourneyError;

#[derive(Default)]
struct MockState {
    url: String,
    log: Vec<String>,
    failures: HashMap<String, VecDeque<JourneyError>>,
    counts: HashMap<String, usize>,
    nav_on_click: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_url(&self, url: &str) {
        self.state.lock().unwrap().url = url.to_string();
    }

    pub fn set_count(&self, selector: &str, count: usize) {
        self.state
            .lock()
            .unwrap()
            .counts
            .insert(selector.to_string(), count);
    }

    /// After a successful click on `selector`, report `url` as the location.
    pub fn nav_on_click(&self, selector: &str, url: &str) {
        self.state
            .lock()
            .unwrap()
            .nav_on_click
            .insert(selector.to_string(), url.to_string());
    }

    /// Queue `times` copies of `err` for the operation `key`; they are
    /// consumed before the operation succeeds again.
    pub fn fail(&self, key: &str, err: JourneyError, times: usize) {
        let mut state = self.state.lock().unwrap();
        let queue = state.failures.entry(key.to_string()).or_default();
        for _ in 0..times {
            queue.push_back(err.clone());
        }
    }

    /// Every interaction performed, in order.
    pub fn operations(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn count_ops(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .filter(|op| op.starts_with(prefix))
            .count()
    }

    fn record(&self, op: String) {
        self.state.lock().unwrap().log.push(op);
    }

    fn take_failure(&self, key: &str) -> Option<JourneyError> {
        self.state
            .lock()
            .unwrap()
            .failures
            .get_mut(key)
            .and_then(|queue| queue.pop_front())
    }
}

#[async_trait]
impl BrowserDriver for MockDriver {
    async fn goto(&self, url: &str) -> DriverResult<()> {
        let key = format!("goto {}", url);
        self.record(key.clone());
        if let Some(err) = self.take_failure(&key) {
            return Err(err);
        }
        self.set_url(url);
        Ok(())
    }

    async fn current_url(&self) -> DriverResult<String> {
        // A location query is not an interaction; keep it out of the log.
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn click(&self, selector: &str) -> DriverResult<()> {
        let key = format!("click {}", selector);
        self.record(key.clone());
        if let Some(err) = self.take_failure(&key) {
            return Err(err);
        }
        let target = self
            .state
            .lock()
            .unwrap()
            .nav_on_click
            .get(selector)
            .cloned();
        if let Some(url) = target {
            self.set_url(&url);
        }
        Ok(())
    }

    async fn hover(&self, selector: &str) -> DriverResult<()> {
        let key = format!("hover {}", selector);
        self.record(key.clone());
        match self.take_failure(&key) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn type_char(&self, selector: &str, _ch: char) -> DriverResult<()> {
        let key = format!("type {}", selector);
        self.record(key.clone());
        match self.take_failure(&key) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn count(&self, selector: &str) -> DriverResult<usize> {
        let key = format!("count {}", selector);
        if let Some(err) = self.take_failure(&key) {
            return Err(err);
        }
        Ok(self
            .state
            .lock()
            .unwrap()
            .counts
            .get(selector)
            .copied()
            .unwrap_or(0))
    }

    async fn wait_visible(&self, selector: &str, _timeout_ms: u64) -> DriverResult<bool> {
        let key = format!("wait {}", selector);
        if let Some(err) = self.take_failure(&key) {
            return Err(err);
        }
        // Everything is visible unless a failure was scripted for the wait.
        Ok(true)
    }

    async fn text(&self, selector: &str) -> DriverResult<String> {
        let key = format!("text {}", selector);
        match self.take_failure(&key) {
            Some(err) => Err(err),
            None => Ok(String::new()),
        }
    }

    async fn scroll_to_bottom(&self) -> DriverResult<()> {
        self.record("scroll bottom".to_string());
        Ok(())
    }

    async fn scroll_to_top(&self) -> DriverResult<()> {
        self.record("scroll top".to_string());
        Ok(())
    }

    async fn back(&self) -> DriverResult<()> {
        self.record("back".to_string());
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> DriverResult<()> {
        self.record(format!("screenshot {}", path.display()));
        Ok(())
    }

    async fn close(&self) -> DriverResult<()> {
        self.record("close".to_string());
        Ok(())
    }
}
