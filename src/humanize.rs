//! Human-behavior composites over the driver primitives: typing cadence,
//! hover pauses, reading scrolls.

use crate::driver::BrowserDriver;
use crate::error::JourneyError;
use crate::pacing::Pacing;

/// Type `text` into the element one character at a time, pausing between
/// keystrokes.
pub async fn type_text(
    driver: &dyn BrowserDriver,
    pacing: &Pacing,
    selector: &str,
    text: &str,
) -> Result<(), JourneyError> {
    for ch in text.chars() {
        driver.type_char(selector, ch).await?;
        pacing.keystroke_pause().await;
    }
    Ok(())
}

/// Hover the element, then linger on it the way a reading user would.
pub async fn hover(
    driver: &dyn BrowserDriver,
    pacing: &Pacing,
    selector: &str,
) -> Result<(), JourneyError> {
    driver.hover(selector).await?;
    pacing.pause().await;
    Ok(())
}

/// Scan the page: scroll to the bottom, pause, scroll back up.
pub async fn scan_page(
    driver: &dyn BrowserDriver,
    pacing: &Pacing,
) -> Result<(), JourneyError> {
    driver.scroll_to_bottom().await?;
    pacing.pause().await;
    driver.scroll_to_top().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DelayRange;
    use crate::driver::mock::MockDriver;

    fn instant_pacing() -> Pacing {
        Pacing::new(DelayRange::new(0.0, 0.0), DelayRange::new(0.0, 0.0), Some(1))
    }

    #[tokio::test]
    async fn types_one_char_at_a_time() {
        let driver = MockDriver::new();
        let pacing = instant_pacing();

        type_text(&driver, &pacing, "#user-name", "standard_user")
            .await
            .unwrap();

        assert_eq!(driver.count_ops("type #user-name"), "standard_user".len());
    }

    #[tokio::test]
    async fn typing_stops_on_driver_failure() {
        let driver = MockDriver::new();
        driver.fail(
            "type #password",
            JourneyError::ElementNotReady("detached".into()),
            1,
        );
        let pacing = instant_pacing();

        let result = type_text(&driver, &pacing, "#password", "abc").await;

        assert!(matches!(result, Err(JourneyError::ElementNotReady(_))));
        assert_eq!(driver.count_ops("type #password"), 1);
    }

    #[tokio::test]
    async fn scan_page_scrolls_down_then_up() {
        let driver = MockDriver::new();
        let pacing = instant_pacing();

        scan_page(&driver, &pacing).await.unwrap();

        assert_eq!(
            driver.operations(),
            vec!["scroll bottom".to_string(), "scroll top".to_string()]
        );
    }
}
