use std::collections::HashMap;

use sentinel_types::{ElementId, HistoryEntry};

/// Append-only chart series of scored edits.
///
/// Entries are kept in the order their results were applied. Nothing is
/// ever removed or reordered.
#[derive(Debug, Default)]
pub struct RiskHistory {
    entries: Vec<HistoryEntry>,
    per_element: HashMap<ElementId, u32>,
}

impl RiskHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. The only mutator.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Append the next numbered entry for `element`.
    pub(crate) fn record(&mut self, element: &ElementId, display_score: f64) -> HistoryEntry {
        let count = self.per_element.entry(element.clone()).or_insert(0);
        *count += 1;
        let entry = HistoryEntry::new(format!("{element} edit #{count}"), display_score);
        self.append(entry.clone());
        entry
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Series to render; a single placeholder bar while empty.
    pub fn chart(&self) -> Vec<HistoryEntry> {
        if self.entries.is_empty() {
            vec![HistoryEntry::placeholder()]
        } else {
            self.entries.clone()
        }
    }

    /// Number of scored edits applied for `element`.
    pub fn edits_for(&self, element: &ElementId) -> u32 {
        self.per_element.get(element).copied().unwrap_or(0)
    }
}
