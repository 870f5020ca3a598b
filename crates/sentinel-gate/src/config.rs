use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::router::DEFAULT_THRESHOLD;

/// Workflow configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Scores above this escalate (default: 5.0)
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Upper bound on one scoring call, in seconds
    #[serde(default = "default_scoring_timeout")]
    pub scoring_timeout_secs: u64,

    /// Upper bound on one signing call, in seconds
    #[serde(default = "default_signing_timeout")]
    pub signing_timeout_secs: u64,

    /// Multiplier from service score to dashboard score
    #[serde(default = "default_display_scale")]
    pub display_scale: f64,

    /// Dashboard scores are capped here
    #[serde(default = "default_display_cap")]
    pub display_cap: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            scoring_timeout_secs: 30,
            signing_timeout_secs: 120,
            display_scale: 10.0,
            display_cap: 100.0,
        }
    }
}

impl GateConfig {
    pub fn scoring_timeout(&self) -> Duration {
        Duration::from_secs(self.scoring_timeout_secs)
    }

    pub fn signing_timeout(&self) -> Duration {
        Duration::from_secs(self.signing_timeout_secs)
    }

    /// Scale a service score for the dashboard, capped and rounded to two
    /// decimals.
    pub fn display_score(&self, score: f64) -> f64 {
        let scaled = (score * self.display_scale).min(self.display_cap);
        (scaled * 100.0).round() / 100.0
    }
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_scoring_timeout() -> u64 {
    30
}

fn default_signing_timeout() -> u64 {
    120
}

fn default_display_scale() -> f64 {
    10.0
}

fn default_display_cap() -> f64 {
    100.0
}
