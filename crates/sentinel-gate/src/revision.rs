//! Active model revision.
//!
//! The revision is published on a watch channel so a viewer can reload the
//! model whenever it changes. Observers never see a partially applied swap:
//! the value is replaced in one send, and only when it actually differs.

use sentinel_types::{RevisionRef, RiskResult};
use serde::Serialize;
use tokio::sync::watch;

/// Effect of a risk result on the active revision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum RevisionChange {
    Replaced {
        previous: Option<RevisionRef>,
        current: RevisionRef,
    },
    Unchanged,
}

impl RevisionChange {
    pub fn is_replaced(&self) -> bool {
        matches!(self, RevisionChange::Replaced { .. })
    }
}

/// Owner of the active model revision.
pub struct RevisionResolver {
    active: watch::Sender<Option<RevisionRef>>,
}

impl RevisionResolver {
    pub fn new(initial: Option<RevisionRef>) -> Self {
        let (active, _) = watch::channel(initial);
        Self { active }
    }

    pub fn active(&self) -> Option<RevisionRef> {
        self.active.borrow().clone()
    }

    /// Watch for revision swaps.
    pub fn subscribe(&self) -> watch::Receiver<Option<RevisionRef>> {
        self.active.subscribe()
    }

    /// Adopt the result's revision if it carries a new one.
    ///
    /// Only the auto-commit path calls this.
    pub(crate) fn resolve(&self, result: &RiskResult) -> RevisionChange {
        let Some(candidate) = result.new_revision_ref.as_ref() else {
            return RevisionChange::Unchanged;
        };

        let mut previous = None;
        let replaced = self.active.send_if_modified(|active| {
            if active.as_ref() == Some(candidate) {
                return false;
            }
            previous = active.replace(candidate.clone());
            true
        });

        if replaced {
            RevisionChange::Replaced {
                previous,
                current: candidate.clone(),
            }
        } else {
            RevisionChange::Unchanged
        }
    }
}

impl Default for RevisionResolver {
    fn default() -> Self {
        Self::new(None)
    }
}
