use thiserror::Error;

/// Failure taxonomy for journey steps.
///
/// The retry policy consults [`JourneyError::is_retryable`] to decide whether
/// another attempt is worth making; the journey runner consults the same
/// classification at step boundaries to decide between recording a partial
/// failure and aborting the run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum JourneyError {
    /// Invalid configuration, detected before any browser session opens.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Network or proxy failure.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A navigation or element wait exceeded its deadline.
    #[error("timed out: {0}")]
    Timeout(String),

    /// An element exists in the script's model but was not interactable yet.
    #[error("element not ready: {0}")]
    ElementNotReady(String),

    /// The page loaded but its structure does not match what the journey
    /// expects. Retrying cannot fix a mismatch between site and script.
    #[error("unexpected page structure: {0}")]
    Structure(String),

    /// The session was dropped and re-login did not restore it.
    #[error("session lost, re-login landed on {location}")]
    SessionLost { location: String },
}

impl JourneyError {
    /// Transient failures worth another attempt under the retry budget.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            JourneyError::Timeout(_)
                | JourneyError::ElementNotReady(_)
                | JourneyError::Connection(_)
        )
    }
}
