pub mod events;
pub mod runner;
pub mod state;

pub use runner::{DriverFactory, JourneyRunner};
pub use state::{RunOutcome, RunSummary, StepRecord, StepStatus};
