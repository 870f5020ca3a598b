use serde::{Deserialize, Serialize};

use crate::ids::ElementId;

/// A selectable, named component of the 3D model.
///
/// `current_risk_score` stays `None` until the first risk result for the
/// element has been applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub display_name: String,
    pub current_risk_score: Option<f64>,
}

impl Element {
    pub fn new(id: impl Into<ElementId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            current_risk_score: None,
        }
    }

    /// Whether a risk analysis has been applied to this element yet.
    pub fn is_analyzed(&self) -> bool {
        self.current_risk_score.is_some()
    }
}

