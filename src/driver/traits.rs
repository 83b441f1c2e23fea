use std::path::Path;

use async_trait::async_trait;

use crate::error::JourneyError;

pub type DriverResult<T> = Result<T, JourneyError>;

/// Browser-side primitives the journey needs.
///
/// This is the seam between the journey runner and the real browser: the
/// production implementation wraps Playwright, tests substitute a scripted
/// driver. Any operation may fail with a timeout/navigation/element error
/// that the retry policy classifies.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate to an absolute URL.
    async fn goto(&self, url: &str) -> DriverResult<()>;

    /// The URL the browser is currently on.
    async fn current_url(&self) -> DriverResult<String>;

    /// Click the first element matching `selector`.
    async fn click(&self, selector: &str) -> DriverResult<()>;

    /// Move the pointer over the first element matching `selector`.
    async fn hover(&self, selector: &str) -> DriverResult<()>;

    /// Type one character into the element, appending to its value.
    async fn type_char(&self, selector: &str, ch: char) -> DriverResult<()>;

    /// Number of elements currently matching `selector`.
    async fn count(&self, selector: &str) -> DriverResult<usize>;

    /// Wait until `selector` is visible, up to `timeout_ms`.
    async fn wait_visible(&self, selector: &str, timeout_ms: u64) -> DriverResult<bool>;

    /// Visible text of the first match, or an empty string if none.
    async fn text(&self, selector: &str) -> DriverResult<String>;

    async fn scroll_to_bottom(&self) -> DriverResult<()>;

    async fn scroll_to_top(&self) -> DriverResult<()>;

    /// Browser history back.
    async fn back(&self) -> DriverResult<()>;

    /// Capture a screenshot to `path`, creating parent directories.
    async fn screenshot(&self, path: &Path) -> DriverResult<()>;

    /// Close the browser session.
    async fn close(&self) -> DriverResult<()>;
}
