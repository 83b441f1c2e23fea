use tokio::sync::broadcast;

use super::state::{RunOutcome, RunSummary};

/// Journey execution events for real-time console updates.
#[derive(Debug, Clone)]
pub enum JourneyEvent {
    RunStarted {
        run_id: String,
    },
    RunFinished {
        summary: RunSummary,
    },
    StepStarted {
        index: usize,
        name: String,
    },
    StepPassed {
        index: usize,
        duration_ms: u64,
    },
    StepFailed {
        index: usize,
        error: String,
        duration_ms: u64,
    },
    StepRetrying {
        index: usize,
        attempt: u32,
        max_attempts: u32,
    },
    StepSkipped {
        index: usize,
        reason: String,
    },
    Log {
        message: String,
    },
}

/// Event emitter for broadcasting journey events.
pub struct EventEmitter {
    sender: broadcast::Sender<JourneyEvent>,
}

impl EventEmitter {
    pub fn new() -> (Self, broadcast::Receiver<JourneyEvent>) {
        let (sender, receiver) = broadcast::channel(100);
        (Self { sender }, receiver)
    }

    pub fn emit(&self, event: JourneyEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JourneyEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }
}

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration as StdDuration;

/// Console event listener for printing real-time updates.
pub struct ConsoleEventListener;

impl ConsoleEventListener {
    pub async fn listen(mut receiver: broadcast::Receiver<JourneyEvent>) {
        use colored::Colorize;
        use indicatif::ProgressDrawTarget;
        use std::io::IsTerminal;

        // Hide the spinner when output is piped to avoid escape codes.
        let multi = if std::io::stdout().is_terminal() {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        let mut spinner: Option<ProgressBar> = None;
        let mut step_text = String::new();

        while let Ok(event) = receiver.recv().await {
            match event {
                JourneyEvent::RunStarted { run_id } => {
                    multi
                        .println(format!(
                            "\n{} Journey started: {}",
                            "▶".green().bold(),
                            run_id.cyan()
                        ))
                        .ok();
                }

                JourneyEvent::RunFinished { summary } => {
                    if let Some(pb) = spinner.take() {
                        pb.finish();
                    }
                    tokio::time::sleep(StdDuration::from_millis(200)).await;

                    let outcome = match &summary.outcome {
                        RunOutcome::Completed => "COMPLETED".green().bold(),
                        RunOutcome::CompletedWithPartialFailures { passed, failed } => {
                            format!("PARTIAL ({}/{} passed)", passed, passed + failed)
                                .yellow()
                                .bold()
                        }
                        RunOutcome::Aborted { reason } => {
                            format!("ABORTED ({})", reason).red().bold()
                        }
                        RunOutcome::Running => "UNKNOWN".white().bold(),
                    };

                    println!("\n{} Journey finished [{}]", "■".blue().bold(), outcome);
                    println!(
                        "  {} passed, {} failed, {} skipped ({} steps)",
                        summary.passed.to_string().green(),
                        summary.failed.to_string().red(),
                        summary.skipped.to_string().yellow(),
                        summary.total_steps
                    );
                    if let Some(duration) = summary.total_duration_ms {
                        println!("  Duration: {}ms", duration);
                    }
                }

                JourneyEvent::StepStarted { index, name } => {
                    let pb = multi.add(ProgressBar::new_spinner());
                    pb.set_style(
                        ProgressStyle::default_spinner()
                            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                            .template("    {spinner} {msg}")
                            .unwrap(),
                    );
                    step_text = format!("[{}] {}... ", index, name.dimmed());
                    pb.set_message(step_text.clone());
                    pb.enable_steady_tick(StdDuration::from_millis(100));
                    spinner = Some(pb);
                }

                JourneyEvent::StepPassed { duration_ms, .. } => {
                    let done = format!("    {} {}({}ms)", "✓".green(), step_text, duration_ms);
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                        tokio::time::sleep(StdDuration::from_millis(50)).await;
                    }
                    println!("{}", done);
                }

                JourneyEvent::StepFailed {
                    error, duration_ms, ..
                } => {
                    let done = format!("    {} {}({}ms)", "✗".red(), step_text, duration_ms);
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                        tokio::time::sleep(StdDuration::from_millis(50)).await;
                    }
                    println!("{}", done);
                    println!("      {}", error.red());
                }

                JourneyEvent::StepRetrying {
                    attempt,
                    max_attempts,
                    ..
                } => {
                    if let Some(pb) = &spinner {
                        pb.set_message(format!(
                            "{} {}",
                            step_text,
                            format!("↻ retry {}/{}", attempt, max_attempts).yellow()
                        ));
                    }
                }

                JourneyEvent::StepSkipped { reason, .. } => {
                    let done = format!("    {} {}({})", "○".yellow(), step_text, reason.dimmed());
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                        tokio::time::sleep(StdDuration::from_millis(50)).await;
                    }
                    println!("{}", done);
                }

                JourneyEvent::Log { message } => {
                    multi.println(format!("      {}", message)).ok();
                }
            }
        }
    }
}
