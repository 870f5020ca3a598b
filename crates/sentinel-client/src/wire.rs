//! Request and response bodies of the scoring service.
//!
//! The service exposes two endpoints with different response shapes. Both are
//! parsed through one untagged [`ScoringResponse`] and normalized into a
//! [`RiskResult`]; a body matching neither shape is a
//! [`ClientError::Malformed`].

use sentinel_types::{
    EditParameters, EditRequest, RecommendedAction, RevisionRef, RiskResult, ScoringEndpoint,
};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// `threshold_action` value that marks an edit for escalation.
pub const ESCALATE_ACTION: &str = "blockchain";

/// Decision-endpoint scores above this escalate.
pub const DECISION_ESCALATION_SCORE: f64 = 1.0;

const UNCLASSIFIED: &str = "Unclassified";

/// Body of `POST /edit_component/`.
#[derive(Debug, Serialize)]
pub struct EditComponentRequest<'a> {
    pub component_id: &'a str,
    pub model_url: Option<&'a str>,
    pub edit_type: &'a str,
    pub edit_params: &'a EditParameters,
}

/// Body of `POST /record_decision/`.
#[derive(Debug, Serialize)]
pub struct RecordDecisionRequest<'a> {
    pub component_id: &'a str,
    pub decision_type: &'a str,
    pub mitigation_flag: bool,
}

impl<'a> EditComponentRequest<'a> {
    pub fn from_edit(request: &'a EditRequest, model: Option<&'a RevisionRef>) -> Self {
        Self {
            component_id: request.element_id().as_str(),
            model_url: model.map(RevisionRef::as_str),
            edit_type: request.edit_type(),
            edit_params: request.parameters(),
        }
    }
}

impl<'a> RecordDecisionRequest<'a> {
    pub fn from_edit(request: &'a EditRequest) -> Self {
        Self {
            component_id: request.element_id().as_str(),
            decision_type: request.edit_type(),
            mitigation_flag: request.parameters().mitigation,
        }
    }
}

/// Response of `POST /edit_component/`.
#[derive(Debug, Deserialize)]
pub struct EditComponentResponse {
    pub risk_score: f64,
    pub threshold_action: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub storage_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub decision_id: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

/// Response of `POST /record_decision/`.
#[derive(Debug, Deserialize)]
pub struct RecordDecisionResponse {
    pub final_score: f64,
    #[serde(default)]
    pub risk_category: Option<String>,
    #[serde(default)]
    pub blockchain_hash_stub: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub decision_id: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub warning: Option<String>,
}

/// Either response shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ScoringResponse {
    Edit(EditComponentResponse),
    Decision(RecordDecisionResponse),
}

impl ScoringResponse {
    /// Normalize into the canonical result.
    pub fn normalize(self) -> ClientResult<RiskResult> {
        match self {
            ScoringResponse::Edit(resp) => {
                check_score(resp.risk_score)?;
                let action = if resp.threshold_action.eq_ignore_ascii_case(ESCALATE_ACTION) {
                    RecommendedAction::Escalate
                } else {
                    RecommendedAction::AutoCommit
                };
                Ok(RiskResult {
                    score: resp.risk_score,
                    category: non_empty(resp.category).unwrap_or_else(|| UNCLASSIFIED.into()),
                    recommended_action: action,
                    new_revision_ref: non_empty(resp.storage_url).map(RevisionRef),
                    warning: non_empty(resp.warning),
                    decision_id: non_empty(resp.decision_id),
                    source: ScoringEndpoint::EditComponent,
                })
            }
            ScoringResponse::Decision(resp) => {
                check_score(resp.final_score)?;
                let action = if resp.final_score > DECISION_ESCALATION_SCORE {
                    RecommendedAction::Escalate
                } else {
                    RecommendedAction::AutoCommit
                };
                Ok(RiskResult {
                    score: resp.final_score,
                    category: non_empty(resp.risk_category)
                        .unwrap_or_else(|| UNCLASSIFIED.into()),
                    recommended_action: action,
                    new_revision_ref: None,
                    warning: non_empty(resp.warning),
                    // The ledger stub is what the approval record should point at.
                    decision_id: non_empty(resp.blockchain_hash_stub)
                        .or_else(|| non_empty(resp.decision_id)),
                    source: ScoringEndpoint::RecordDecision,
                })
            }
        }
    }
}

/// Parse a scoring response body into a [`RiskResult`].
pub fn parse_scoring_response(body: &[u8]) -> ClientResult<RiskResult> {
    let response: ScoringResponse = serde_json::from_slice(body).map_err(|e| {
        ClientError::Malformed(format!("body matches no known scoring shape: {e}"))
    })?;
    response.normalize()
}

fn check_score(score: f64) -> ClientResult<()> {
    if score.is_finite() && score >= 0.0 {
        Ok(())
    } else {
        Err(ClientError::Malformed(format!("invalid risk score {score}")))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accept ids sent as either JSON strings or numbers.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!("unexpected id value: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_shape_auto() {
        let result = parse_scoring_response(br#"{"risk_score": 3.2, "threshold_action": "auto"}"#)
            .unwrap();

        assert_eq!(result.score, 3.2);
        assert_eq!(result.recommended_action, RecommendedAction::AutoCommit);
        assert_eq!(result.category, "Unclassified");
        assert!(result.new_revision_ref.is_none());
        assert_eq!(result.source, ScoringEndpoint::EditComponent);
    }

    #[test]
    fn edit_shape_blockchain_escalates() {
        let body = br#"{
            "risk_score": 8.5,
            "category": "Critical",
            "threshold_action": "blockchain",
            "storage_url": "https://storage.example/projects/1/models/7/v2.glb",
            "decision_id": 17
        }"#;
        let result = parse_scoring_response(body).unwrap();

        assert_eq!(result.recommended_action, RecommendedAction::Escalate);
        assert_eq!(result.category, "Critical");
        assert_eq!(result.decision_id.as_deref(), Some("17"));
        assert_eq!(
            result.new_revision_ref,
            Some(RevisionRef::new("https://storage.example/projects/1/models/7/v2.glb"))
        );
    }

    #[test]
    fn empty_storage_url_is_no_revision() {
        let result = parse_scoring_response(
            br#"{"risk_score": 1.0, "threshold_action": "merkle", "storage_url": ""}"#,
        )
        .unwrap();
        assert!(result.new_revision_ref.is_none());
    }

    #[test]
    fn decision_shape_uses_score_rule() {
        let low = parse_scoring_response(
            br#"{"final_score": 0.8, "risk_category": "Medium", "decision_id": 3}"#,
        )
        .unwrap();
        assert_eq!(low.recommended_action, RecommendedAction::AutoCommit);
        assert_eq!(low.source, ScoringEndpoint::RecordDecision);
        assert_eq!(low.decision_id.as_deref(), Some("3"));

        let boundary = parse_scoring_response(br#"{"final_score": 1.0}"#).unwrap();
        assert_eq!(boundary.recommended_action, RecommendedAction::AutoCommit);

        let high = parse_scoring_response(
            br#"{"final_score": 1.42, "risk_category": "High", "blockchain_hash_stub": "SS-4-High-1.42", "decision_id": 4, "warning": "Governance escalation required"}"#,
        )
        .unwrap();
        assert_eq!(high.recommended_action, RecommendedAction::Escalate);
        assert_eq!(high.decision_id.as_deref(), Some("SS-4-High-1.42"));
        assert_eq!(high.warning.as_deref(), Some("Governance escalation required"));
    }

    #[test]
    fn unknown_shape_is_malformed() {
        let err = parse_scoring_response(br#"{"score": 2.0}"#).unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));

        let err = parse_scoring_response(b"not json").unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));

        let err = parse_scoring_response(br#"{"risk_score": "high", "threshold_action": "auto"}"#)
            .unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
    }

    #[test]
    fn negative_score_is_malformed() {
        let err = parse_scoring_response(br#"{"risk_score": -1.0, "threshold_action": "auto"}"#)
            .unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
    }

    #[test]
    fn edit_request_body_shape() {
        let request = EditRequest::builder("wall_1").mitigation(true).build().unwrap();
        let model = RevisionRef::new("https://storage.example/m.glb");
        let body = serde_json::to_value(EditComponentRequest::from_edit(&request, Some(&model)))
            .unwrap();

        assert_eq!(body["component_id"], "wall_1");
        assert_eq!(body["model_url"], "https://storage.example/m.glb");
        assert_eq!(body["edit_type"], "Structural Edit");
        assert_eq!(body["edit_params"]["span_length"], 12.0);
        assert_eq!(body["edit_params"]["cost_impact"], 65000.0);
        assert_eq!(body["edit_params"]["delay_days"], 7);
        assert_eq!(body["edit_params"]["mitigation"], true);
    }

    #[test]
    fn decision_request_body_shape() {
        let request = EditRequest::builder("beam_2")
            .edit_type("Steel Beam")
            .build()
            .unwrap();
        let body = serde_json::to_value(RecordDecisionRequest::from_edit(&request)).unwrap();

        assert_eq!(body["component_id"], "beam_2");
        assert_eq!(body["decision_type"], "Steel Beam");
        assert_eq!(body["mitigation_flag"], false);
    }
}
