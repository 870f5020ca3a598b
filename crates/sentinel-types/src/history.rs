use serde::{Deserialize, Serialize};

/// One bar of the risk dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub label: String,
    pub score: f64,
}

impl HistoryEntry {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Entry shown in place of an empty chart.
    pub fn placeholder() -> Self {
        Self::new("No edits yet", 0.0)
    }
}
