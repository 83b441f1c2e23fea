use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::sleep;

use crate::config::DelayRange;

/// Produces the randomized pauses that make the journey read as human:
/// longer action delays for thinking/reading, short per-keystroke delays
/// for typing cadence.
///
/// All randomness in a run flows through this one seedable source so a
/// fixed seed reproduces the same pacing and the same item picks.
pub struct Pacing {
    action: DelayRange,
    typing: DelayRange,
    rng: Mutex<StdRng>,
}

impl Pacing {
    pub fn new(action: DelayRange, typing: DelayRange, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            action,
            typing,
            rng: Mutex::new(rng),
        }
    }

    /// Uniformly sampled pause between journey actions.
    pub fn action_delay(&self) -> Duration {
        self.sample(self.action)
    }

    /// Uniformly sampled pause between keystrokes.
    pub fn typing_delay(&self) -> Duration {
        self.sample(self.typing)
    }

    fn sample(&self, range: DelayRange) -> Duration {
        // min == max is a legal degenerate range and yields a constant delay.
        let secs = if range.min_secs >= range.max_secs {
            range.min_secs
        } else {
            let mut rng = self.rng.lock().unwrap();
            rng.gen_range(range.min_secs..=range.max_secs)
        };
        Duration::from_secs_f64(secs)
    }

    /// Uniform pick of an index in `0..len`. `len` must be non-zero.
    pub fn pick_index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap();
        rng.gen_range(0..len)
    }

    /// Sleep for one action delay.
    pub async fn pause(&self) {
        sleep(self.action_delay()).await;
    }

    /// Sleep for one keystroke delay.
    pub async fn keystroke_pause(&self) {
        sleep(self.typing_delay()).await;
    }
}
