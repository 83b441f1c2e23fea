use crate::journey::state::{RunSummary, StepReport};
use serde::{Deserialize, Serialize};

/// Finalized run record for report generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run_id: String,
    pub steps: Vec<StepReport>,
    pub summary: RunSummary,
    pub generated_at: String,
}
