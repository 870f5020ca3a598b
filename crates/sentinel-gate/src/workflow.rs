use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use sentinel_client::{approval_message, ScoringService, SigningProvider};
use sentinel_types::{
    ApprovalId, ApprovalRecord, ApprovalResolution, EditRequest, Element, ElementId,
    HistoryEntry, ParameterOverrides, RevisionRef, RiskResult,
};
use serde::Serialize;
use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

use crate::approval::{ApprovalGate, GateState, GateTransition, PendingApproval};
use crate::config::GateConfig;
use crate::error::{WorkflowError, WorkflowResult};
use crate::history::RiskHistory;
use crate::revision::{RevisionChange, RevisionResolver};
use crate::router::{Route, ThresholdRouter};
use crate::selection::SelectionState;

/// How a successful submission was applied.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Committed {
        result: RiskResult,
        entry: HistoryEntry,
        revision: RevisionChange,
    },
    Escalated {
        result: RiskResult,
        entry: HistoryEntry,
        approval_id: ApprovalId,
    },
}

impl SubmissionOutcome {
    pub fn result(&self) -> &RiskResult {
        match self {
            SubmissionOutcome::Committed { result, .. }
            | SubmissionOutcome::Escalated { result, .. } => result,
        }
    }

    pub fn entry(&self) -> &HistoryEntry {
        match self {
            SubmissionOutcome::Committed { entry, .. }
            | SubmissionOutcome::Escalated { entry, .. } => entry,
        }
    }

    pub fn route(&self) -> Route {
        match self {
            SubmissionOutcome::Committed { .. } => Route::AutoCommit,
            SubmissionOutcome::Escalated { .. } => Route::Escalate,
        }
    }
}

#[derive(Default)]
struct WorkflowState {
    selection: SelectionState,
    history: RiskHistory,
    gate: ApprovalGate,
}

/// One element's claim on a slot set, released when dropped.
///
/// Dropping covers every exit, including a caller abandoning the future.
struct ElementSlot<'a> {
    set: &'a Mutex<HashSet<ElementId>>,
    element: ElementId,
}

impl<'a> ElementSlot<'a> {
    fn acquire(
        set: &'a Mutex<HashSet<ElementId>>,
        element: &ElementId,
        busy: fn(ElementId) -> WorkflowError,
    ) -> WorkflowResult<Self> {
        let inserted = set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(element.clone());
        if !inserted {
            return Err(busy(element.clone()));
        }
        Ok(Self {
            set,
            element: element.clone(),
        })
    }
}

impl Drop for ElementSlot<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.element);
    }
}

/// The risk-gated edit workflow.
///
/// Owns selection, history, the approval gate and the active revision.
/// Share it behind an `Arc`; every operation takes `&self`.
pub struct EditWorkflow {
    scoring: Arc<dyn ScoringService>,
    signer: Arc<dyn SigningProvider>,
    router: ThresholdRouter,
    config: GateConfig,
    revisions: RevisionResolver,
    state: RwLock<WorkflowState>,
    in_flight: Mutex<HashSet<ElementId>>,
    signing: Mutex<HashSet<ElementId>>,
}

impl EditWorkflow {
    pub fn new(
        scoring: Arc<dyn ScoringService>,
        signer: Arc<dyn SigningProvider>,
        config: GateConfig,
    ) -> Self {
        Self {
            scoring,
            signer,
            router: ThresholdRouter::new(config.threshold),
            config,
            revisions: RevisionResolver::default(),
            state: RwLock::new(WorkflowState::default()),
            in_flight: Mutex::new(HashSet::new()),
            signing: Mutex::new(HashSet::new()),
        }
    }

    /// Start from an already loaded model revision.
    pub fn with_initial_model(mut self, revision: RevisionRef) -> Self {
        self.revisions = RevisionResolver::new(Some(revision));
        self
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    // --- selection ---

    pub async fn select(&self, id: impl Into<ElementId>, display_name: &str) -> Element {
        let mut state = self.state.write().await;
        state.selection.select(id.into(), display_name).clone()
    }

    pub async fn clear_selection(&self) {
        self.state.write().await.selection.clear();
    }

    pub async fn selected(&self) -> Option<Element> {
        self.state.read().await.selection.selected().cloned()
    }

    pub async fn element(&self, id: &ElementId) -> Option<Element> {
        self.state.read().await.selection.element(id).cloned()
    }

    // --- submission ---

    /// Score an edit and apply the result.
    ///
    /// Rejected up front if the element already has a request in flight or
    /// an approval pending. A failed scoring call leaves every piece of
    /// state as it was.
    pub async fn submit(&self, request: EditRequest) -> WorkflowResult<SubmissionOutcome> {
        let element = request.element_id().clone();
        let _slot = ElementSlot::acquire(
            &self.in_flight,
            &element,
            WorkflowError::ConcurrentSubmissionRejected,
        )?;

        if self.state.read().await.gate.state(&element) == GateState::Pending {
            return Err(WorkflowError::ApprovalPending(element));
        }

        let model = self.revisions.active();
        info!(
            element = %element,
            edit_type = request.edit_type(),
            "submitting edit for scoring"
        );

        let timeout = self.config.scoring_timeout();
        let scored = tokio::time::timeout(timeout, self.scoring.submit(&request, model.as_ref()));
        let result = match scored.await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!(element = %element, error = %e, "scoring failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(element = %element, timeout = ?timeout, "scoring timed out");
                return Err(WorkflowError::ScoringTimeout(timeout));
            }
        };

        self.apply(&element, result).await
    }

    /// Build and submit an edit for `element`.
    pub async fn submit_edit(
        &self,
        element: impl Into<ElementId>,
        edit_type: Option<&str>,
        overrides: ParameterOverrides,
    ) -> WorkflowResult<SubmissionOutcome> {
        let mut builder = EditRequest::builder(element).overrides(overrides);
        if let Some(edit_type) = edit_type {
            builder = builder.edit_type(edit_type);
        }
        self.submit(builder.build()?).await
    }

    /// Submit an edit for the selected element.
    pub async fn submit_selected(
        &self,
        edit_type: Option<&str>,
        overrides: ParameterOverrides,
    ) -> WorkflowResult<SubmissionOutcome> {
        let element = self
            .selected()
            .await
            .map(|e| e.id)
            .ok_or(WorkflowError::NoSelection)?;
        self.submit_edit(element, edit_type, overrides).await
    }

    async fn apply(
        &self,
        element: &ElementId,
        result: RiskResult,
    ) -> WorkflowResult<SubmissionOutcome> {
        let route = self.router.route(&result);
        let display = self.config.display_score(result.score);
        if let Some(warning) = &result.warning {
            warn!(element = %element, warning = %warning, "scoring service warning");
        }
        let mut state = self.state.write().await;

        match route {
            Route::Escalate => {
                let approval_id = state.gate.escalate(element, result.clone(), display)?;
                state.selection.apply_score(element, result.score);
                let entry = state.history.record(element, display);
                info!(
                    element = %element,
                    score = result.score,
                    category = %result.category,
                    "edit escalated"
                );
                Ok(SubmissionOutcome::Escalated {
                    result,
                    entry,
                    approval_id,
                })
            }
            Route::AutoCommit => {
                state.selection.apply_score(element, result.score);
                let entry = state.history.record(element, display);
                let revision = self.revisions.resolve(&result);
                info!(
                    element = %element,
                    score = result.score,
                    revision_swapped = revision.is_replaced(),
                    "edit committed"
                );
                Ok(SubmissionOutcome::Committed {
                    result,
                    entry,
                    revision,
                })
            }
        }
    }

    // --- approval ---

    /// Ask the signing provider to approve the pending escalation.
    ///
    /// On any signing failure the approval stays pending and may be retried.
    /// A signature that arrives after the approval was cancelled is dropped.
    pub async fn approve(&self, element: &ElementId) -> WorkflowResult<ApprovalRecord> {
        let _signing =
            ElementSlot::acquire(&self.signing, element, WorkflowError::SigningInProgress)?;
        let pending = self
            .state
            .read()
            .await
            .gate
            .pending(element)
            .cloned()
            .ok_or_else(|| WorkflowError::NoPendingApproval(element.clone()))?;
        let message = approval_message(element, pending.display_score);
        let timeout = self.config.signing_timeout();

        let signed = match tokio::time::timeout(timeout, self.signer.sign(&message)).await {
            Ok(Ok(signed)) => signed,
            Ok(Err(e)) => {
                warn!(element = %element, error = %e, "signing failed, approval still pending");
                return Err(e.into());
            }
            Err(_) => {
                warn!(element = %element, timeout = ?timeout, "signing timed out, approval still pending");
                return Err(WorkflowError::SigningUnavailable(format!(
                    "no signature within {timeout:?}"
                )));
            }
        };

        let mut state = self.state.write().await;
        state
            .gate
            .complete_approval(element, &pending.approval_id, message, signed)
            .map_err(|e| {
                warn!(element = %element, "late signature discarded");
                e
            })
    }

    /// Dismiss the pending approval for `element`.
    pub async fn cancel(&self, element: &ElementId) -> WorkflowResult<ApprovalId> {
        self.state.write().await.gate.cancel(element)
    }

    // --- reads ---

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.state.read().await.history.entries().to_vec()
    }

    /// History as rendered, with the placeholder when empty.
    pub async fn chart(&self) -> Vec<HistoryEntry> {
        self.state.read().await.history.chart()
    }

    pub fn active_revision(&self) -> Option<RevisionRef> {
        self.revisions.active()
    }

    pub fn subscribe_revisions(&self) -> watch::Receiver<Option<RevisionRef>> {
        self.revisions.subscribe()
    }

    pub async fn gate_state(&self, element: &ElementId) -> GateState {
        self.state.read().await.gate.state(element)
    }

    pub async fn pending_approval(&self, element: &ElementId) -> Option<PendingApproval> {
        self.state.read().await.gate.pending(element).cloned()
    }

    pub async fn approvals(&self) -> Vec<ApprovalRecord> {
        self.state.read().await.gate.approvals().cloned().collect()
    }

    pub async fn resolutions(&self) -> Vec<ApprovalResolution> {
        self.state.read().await.gate.resolutions().to_vec()
    }

    pub async fn transitions(&self) -> Vec<GateTransition> {
        self.state.read().await.gate.transitions().to_vec()
    }

    pub fn is_in_flight(&self, element: &ElementId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(element)
    }

    /// Whether a signature request for `element` is outstanding.
    pub fn is_signing(&self, element: &ElementId) -> bool {
        self.signing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(element)
    }
}
