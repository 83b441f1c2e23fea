use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Step execution status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StepStatus {
    Running,
    Passed,
    Failed { error: String },
    Skipped { reason: String },
    Retrying { attempt: u32, max_attempts: u32 },
}

impl StepStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Passed | StepStatus::Failed { .. } | StepStatus::Skipped { .. }
        )
    }
}

/// State for a single journey step.
///
/// Created when the step begins; never mutated after it reaches a terminal
/// status.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub index: usize,
    pub name: String,
    pub status: StepStatus,
    pub started_at: Instant,
    pub finished_at: Option<Instant>,
    pub duration_ms: Option<u64>,
    pub screenshot_path: Option<String>,
    pub retry_count: u32,
}

impl StepRecord {
    pub fn new(index: usize, name: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            status: StepStatus::Running,
            started_at: Instant::now(),
            finished_at: None,
            duration_ms: None,
            screenshot_path: None,
            retry_count: 0,
        }
    }

    pub fn pass(&mut self) {
        self.finish(StepStatus::Passed);
    }

    pub fn fail(&mut self, error: String) {
        self.finish(StepStatus::Failed { error });
    }

    pub fn skip(&mut self, reason: String) {
        self.finish(StepStatus::Skipped { reason });
    }

    pub fn retrying(&mut self, attempt: u32, max_attempts: u32) {
        self.status = StepStatus::Retrying {
            attempt,
            max_attempts,
        };
        self.retry_count = attempt.saturating_sub(1);
    }

    fn finish(&mut self, status: StepStatus) {
        self.status = status;
        let now = Instant::now();
        self.finished_at = Some(now);
        self.duration_ms = Some(now.duration_since(self.started_at).as_millis() as u64);
    }

    /// Serialize for reporting (without `Instant`, which isn't serializable).
    pub fn to_report(&self) -> StepReport {
        StepReport {
            index: self.index,
            name: self.name.clone(),
            status: self.status.clone(),
            duration_ms: self.duration_ms,
            screenshot_path: self.screenshot_path.clone(),
            retry_count: self.retry_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub index: usize,
    pub name: String,
    pub status: StepStatus,
    pub duration_ms: Option<u64>,
    pub screenshot_path: Option<String>,
    pub retry_count: u32,
}

/// Overall run outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RunOutcome {
    Running,
    Completed,
    CompletedWithPartialFailures { passed: u32, failed: u32 },
    Aborted { reason: String },
}

/// State for the whole journey run. Owned exclusively by the runner and
/// finalized exactly once, also on abort and on interrupt.
#[derive(Debug, Clone)]
pub struct JourneyState {
    pub run_id: String,
    pub steps: Vec<StepRecord>,
    pub outcome: RunOutcome,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    pub total_duration_ms: Option<u64>,
}

impl JourneyState {
    pub fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            steps: Vec::new(),
            outcome: RunOutcome::Running,
            started_at: None,
            finished_at: None,
            total_duration_ms: None,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Begin a new step and return its index.
    pub fn begin_step(&mut self, name: &str) -> usize {
        let index = self.steps.len();
        self.steps.push(StepRecord::new(index, name));
        index
    }

    pub fn step_mut(&mut self, index: usize) -> &mut StepRecord {
        &mut self.steps[index]
    }

    /// Finalize the run. An abort reason forces the `Aborted` outcome; an
    /// otherwise clean run is `Completed` or downgraded to
    /// `CompletedWithPartialFailures` when any step failed.
    pub fn finish(&mut self, abort_reason: Option<String>) {
        let now = Instant::now();
        self.finished_at = Some(now);
        if let Some(start) = self.started_at {
            self.total_duration_ms = Some(now.duration_since(start).as_millis() as u64);
        }

        let (passed, failed) = self
            .steps
            .iter()
            .fold((0, 0), |(p, f), step| match step.status {
                StepStatus::Passed => (p + 1, f),
                StepStatus::Failed { .. } => (p, f + 1),
                _ => (p, f),
            });

        self.outcome = match abort_reason {
            Some(reason) => RunOutcome::Aborted { reason },
            None if failed == 0 => RunOutcome::Completed,
            None => RunOutcome::CompletedWithPartialFailures { passed, failed },
        };
    }

    pub fn summary(&self) -> RunSummary {
        let mut passed = 0;
        let mut failed = 0;
        let mut skipped = 0;
        for step in &self.steps {
            match step.status {
                StepStatus::Passed => passed += 1,
                StepStatus::Failed { .. } => failed += 1,
                StepStatus::Skipped { .. } => skipped += 1,
                _ => {}
            }
        }

        RunSummary {
            run_id: self.run_id.clone(),
            total_steps: self.steps.len() as u32,
            passed,
            failed,
            skipped,
            outcome: self.outcome.clone(),
            total_duration_ms: self.total_duration_ms,
        }
    }

    pub fn step_reports(&self) -> Vec<StepReport> {
        self.steps.iter().map(|s| s.to_report()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: String,
    pub total_steps: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub outcome: RunOutcome,
    pub total_duration_ms: Option<u64>,
}
