use serde::{Deserialize, Serialize};

use crate::ids::RevisionRef;

/// What the scoring service recommends doing with an edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendedAction {
    AutoCommit,
    Escalate,
}

impl RecommendedAction {
    pub fn is_escalation(&self) -> bool {
        matches!(self, RecommendedAction::Escalate)
    }
}

impl std::fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendedAction::AutoCommit => f.write_str("auto-commit"),
            RecommendedAction::Escalate => f.write_str("escalate"),
        }
    }
}

/// The scoring endpoint a request is sent to, and whose response shape a
/// result was normalized from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringEndpoint {
    #[default]
    EditComponent,
    RecordDecision,
}

impl ScoringEndpoint {
    /// Request path on the scoring service.
    pub fn path(&self) -> &'static str {
        match self {
            ScoringEndpoint::EditComponent => "/edit_component/",
            ScoringEndpoint::RecordDecision => "/record_decision/",
        }
    }
}

/// Canonical scoring result, normalized from either service response shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub score: f64,
    pub category: String,
    pub recommended_action: RecommendedAction,
    /// Locator of the revision the service produced for this edit, if any.
    pub new_revision_ref: Option<RevisionRef>,
    pub warning: Option<String>,
    /// Service-side decision identifier (or ledger stub), when one is returned.
    pub decision_id: Option<String>,
    pub source: ScoringEndpoint,
}

impl RiskResult {
    pub fn new(
        score: f64,
        category: impl Into<String>,
        recommended_action: RecommendedAction,
        source: ScoringEndpoint,
    ) -> Self {
        Self {
            score,
            category: category.into(),
            recommended_action,
            new_revision_ref: None,
            warning: None,
            decision_id: None,
            source,
        }
    }

    pub fn with_revision(mut self, revision: RevisionRef) -> Self {
        self.new_revision_ref = Some(revision);
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    pub fn with_decision_id(mut self, decision_id: impl Into<String>) -> Self {
        self.decision_id = Some(decision_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&RecommendedAction::AutoCommit).unwrap(),
            "\"auto-commit\""
        );
        assert_eq!(RecommendedAction::Escalate.to_string(), "escalate");
    }

    #[test]
    fn endpoint_paths() {
        assert_eq!(ScoringEndpoint::EditComponent.path(), "/edit_component/");
        assert_eq!(ScoringEndpoint::RecordDecision.path(), "/record_decision/");
    }

    #[test]
    fn builder_style_helpers() {
        let result = RiskResult::new(
            8.5,
            "Critical",
            RecommendedAction::Escalate,
            ScoringEndpoint::EditComponent,
        )
        .with_revision(RevisionRef::new("https://storage.example/v2.glb"))
        .with_warning("Governance escalation required")
        .with_decision_id("42");

        assert!(result.recommended_action.is_escalation());
        assert_eq!(result.decision_id.as_deref(), Some("42"));
        assert!(result.new_revision_ref.is_some());
    }
}
