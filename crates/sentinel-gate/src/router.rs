use sentinel_types::RiskResult;
use serde::{Deserialize, Serialize};

/// Default escalation threshold, on the scoring service's 0-10 scale.
pub const DEFAULT_THRESHOLD: f64 = 5.0;

/// Commit path for a scored edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    AutoCommit,
    Escalate,
}

/// Classify a score against the threshold.
///
/// Inclusive on the low side: a score equal to the threshold auto-commits.
/// A NaN score never compares as low, so it escalates.
pub fn classify(score: f64, threshold: f64) -> Route {
    if score <= threshold {
        Route::AutoCommit
    } else {
        Route::Escalate
    }
}

/// Routes scored edits using one fixed threshold.
///
/// The service can also ask for escalation explicitly; either source can
/// escalate an edit and neither can downgrade one.
#[derive(Clone, Copy, Debug)]
pub struct ThresholdRouter {
    threshold: f64,
}

impl ThresholdRouter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn route(&self, result: &RiskResult) -> Route {
        if result.recommended_action.is_escalation() {
            return Route::Escalate;
        }
        classify(result.score, self.threshold)
    }
}

impl Default for ThresholdRouter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sentinel_types::{RecommendedAction, ScoringEndpoint};

    fn result(score: f64, action: RecommendedAction) -> RiskResult {
        RiskResult::new(score, "Test", action, ScoringEndpoint::EditComponent)
    }

    #[test]
    fn boundary_auto_commits() {
        assert_eq!(classify(5.0, 5.0), Route::AutoCommit);
        assert_eq!(classify(5.000_001, 5.0), Route::Escalate);
        assert_eq!(classify(4.999_999, 5.0), Route::AutoCommit);
    }

    #[test]
    fn nan_escalates() {
        assert_eq!(classify(f64::NAN, 5.0), Route::Escalate);
    }

    #[test]
    fn service_escalation_wins() {
        let router = ThresholdRouter::default();
        assert_eq!(
            router.route(&result(1.0, RecommendedAction::Escalate)),
            Route::Escalate
        );
    }

    #[test]
    fn score_can_escalate_service_auto() {
        let router = ThresholdRouter::default();
        assert_eq!(
            router.route(&result(9.1, RecommendedAction::AutoCommit)),
            Route::Escalate
        );
        assert_eq!(
            router.route(&result(3.2, RecommendedAction::AutoCommit)),
            Route::AutoCommit
        );
    }

    proptest! {
        #[test]
        fn at_or_below_threshold_auto_commits(threshold in 0.0f64..10.0, delta in 0.0f64..10.0) {
            prop_assert_eq!(classify(threshold - delta, threshold), Route::AutoCommit);
        }

        #[test]
        fn above_threshold_escalates(threshold in 0.0f64..10.0, delta in 0.001f64..10.0) {
            prop_assert_eq!(classify(threshold + delta, threshold), Route::Escalate);
        }

        #[test]
        fn route_never_downgrades(score in 0.0f64..20.0) {
            let router = ThresholdRouter::default();
            prop_assert_eq!(router.route(&result(score, RecommendedAction::Escalate)), Route::Escalate);
        }
    }
}
