use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::ElementId;

/// Edit type sent when the caller does not name one.
pub const DEFAULT_EDIT_TYPE: &str = "Structural Edit";

/// Fixed-shape parameter record attached to every edit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditParameters {
    /// Span length in metres.
    pub span_length: f64,
    /// Cost impact in currency units.
    pub cost_impact: f64,
    /// Schedule delay in days.
    pub delay_days: u32,
    /// Whether a mitigation action accompanies the edit.
    pub mitigation: bool,
}

impl Default for EditParameters {
    fn default() -> Self {
        Self {
            span_length: 12.0,
            cost_impact: 65_000.0,
            delay_days: 7,
            mitigation: false,
        }
    }
}

/// Partial parameter set supplied by the operator.
///
/// Anything left as `None` falls back to [`EditParameters::default`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterOverrides {
    #[serde(default)]
    pub span_length: Option<f64>,
    #[serde(default)]
    pub cost_impact: Option<f64>,
    #[serde(default)]
    pub delay_days: Option<u32>,
    #[serde(default)]
    pub mitigation: Option<bool>,
}

impl ParameterOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn span_length(mut self, span_length: f64) -> Self {
        self.span_length = Some(span_length);
        self
    }

    pub fn cost_impact(mut self, cost_impact: f64) -> Self {
        self.cost_impact = Some(cost_impact);
        self
    }

    pub fn delay_days(mut self, delay_days: u32) -> Self {
        self.delay_days = Some(delay_days);
        self
    }

    pub fn mitigation(mut self, mitigation: bool) -> Self {
        self.mitigation = Some(mitigation);
        self
    }

    /// Fill the gaps with the documented defaults.
    pub fn resolve(&self) -> EditParameters {
        let defaults = EditParameters::default();
        EditParameters {
            span_length: self.span_length.unwrap_or(defaults.span_length),
            cost_impact: self.cost_impact.unwrap_or(defaults.cost_impact),
            delay_days: self.delay_days.unwrap_or(defaults.delay_days),
            mitigation: self.mitigation.unwrap_or(defaults.mitigation),
        }
    }
}

/// A normalized, fully-populated edit submission.
///
/// Built fresh per submission through [`EditRequest::builder`]; there are no
/// setters, so a request cannot change after it has been handed to the
/// scoring client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditRequest {
    element_id: ElementId,
    edit_type: String,
    parameters: EditParameters,
}

impl EditRequest {
    pub fn builder(element_id: impl Into<ElementId>) -> EditRequestBuilder {
        EditRequestBuilder {
            element_id: element_id.into(),
            edit_type: None,
            overrides: ParameterOverrides::default(),
        }
    }

    pub fn element_id(&self) -> &ElementId {
        &self.element_id
    }

    pub fn edit_type(&self) -> &str {
        &self.edit_type
    }

    pub fn parameters(&self) -> &EditParameters {
        &self.parameters
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditRequestError {
    #[error("element id must not be empty")]
    EmptyElementId,
}

/// Builder for [`EditRequest`].
pub struct EditRequestBuilder {
    element_id: ElementId,
    edit_type: Option<String>,
    overrides: ParameterOverrides,
}

impl EditRequestBuilder {
    pub fn edit_type(mut self, edit_type: impl Into<String>) -> Self {
        self.edit_type = Some(edit_type.into());
        self
    }

    pub fn overrides(mut self, overrides: ParameterOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn span_length(mut self, span_length: f64) -> Self {
        self.overrides.span_length = Some(span_length);
        self
    }

    pub fn cost_impact(mut self, cost_impact: f64) -> Self {
        self.overrides.cost_impact = Some(cost_impact);
        self
    }

    pub fn delay_days(mut self, delay_days: u32) -> Self {
        self.overrides.delay_days = Some(delay_days);
        self
    }

    pub fn mitigation(mut self, mitigation: bool) -> Self {
        self.overrides.mitigation = Some(mitigation);
        self
    }

    /// Produce the request. Only the element id is mandatory.
    pub fn build(self) -> Result<EditRequest, EditRequestError> {
        if self.element_id.as_str().trim().is_empty() {
            return Err(EditRequestError::EmptyElementId);
        }

        let edit_type = self
            .edit_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EDIT_TYPE.to_string());

        Ok(EditRequest {
            element_id: self.element_id,
            edit_type,
            parameters: self.overrides.resolve(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameters_take_defaults() {
        let req = EditRequest::builder("wall_1").build().unwrap();

        assert_eq!(req.element_id().as_str(), "wall_1");
        assert_eq!(req.edit_type(), DEFAULT_EDIT_TYPE);
        assert_eq!(req.parameters().span_length, 12.0);
        assert_eq!(req.parameters().cost_impact, 65_000.0);
        assert_eq!(req.parameters().delay_days, 7);
        assert!(!req.parameters().mitigation);
    }

    #[test]
    fn supplied_parameters_win() {
        let req = EditRequest::builder("beam_2")
            .edit_type("Steel Beam")
            .span_length(20.0)
            .cost_impact(120_000.0)
            .delay_days(14)
            .mitigation(true)
            .build()
            .unwrap();

        assert_eq!(req.edit_type(), "Steel Beam");
        assert_eq!(
            req.parameters(),
            &EditParameters {
                span_length: 20.0,
                cost_impact: 120_000.0,
                delay_days: 14,
                mitigation: true,
            }
        );
    }

    #[test]
    fn partial_overrides_mix_with_defaults() {
        let overrides = ParameterOverrides::new().mitigation(true).delay_days(3);
        let req = EditRequest::builder("wall_1")
            .overrides(overrides)
            .build()
            .unwrap();

        assert!(req.parameters().mitigation);
        assert_eq!(req.parameters().delay_days, 3);
        assert_eq!(req.parameters().span_length, 12.0);
    }

    #[test]
    fn empty_element_id_rejected() {
        assert_eq!(
            EditRequest::builder("").build(),
            Err(EditRequestError::EmptyElementId)
        );
        assert_eq!(
            EditRequest::builder("   ").build(),
            Err(EditRequestError::EmptyElementId)
        );
    }

    #[test]
    fn blank_edit_type_falls_back() {
        let req = EditRequest::builder("wall_1").edit_type("  ").build().unwrap();
        assert_eq!(req.edit_type(), DEFAULT_EDIT_TYPE);
    }
}
