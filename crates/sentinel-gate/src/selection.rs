use std::collections::HashMap;

use sentinel_types::{Element, ElementId};

/// Which element is targeted, plus the last-known score of every element
/// seen this session.
#[derive(Debug, Default)]
pub struct SelectionState {
    elements: HashMap<ElementId, Element>,
    selected: Option<ElementId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target an element, registering it on first sight.
    ///
    /// A known element keeps its score; a non-empty name replaces the old one.
    pub fn select(&mut self, id: ElementId, display_name: impl Into<String>) -> &Element {
        let display_name = display_name.into();
        let element = self
            .elements
            .entry(id.clone())
            .or_insert_with(|| Element::new(id.clone(), display_name.clone()));
        if !display_name.trim().is_empty() {
            element.display_name = display_name;
        }
        self.selected = Some(id);
        element
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Element> {
        self.selected.as_ref().and_then(|id| self.elements.get(id))
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Record the score of an applied risk result.
    pub(crate) fn apply_score(&mut self, id: &ElementId, score: f64) {
        self.elements
            .entry(id.clone())
            .or_insert_with(|| Element::new(id.clone(), id.as_str()))
            .current_risk_score = Some(score);
    }
}
