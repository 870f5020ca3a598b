//! Per-element approval gate.
//!
//! ```text
//! Idle ──escalate──▶ Pending ──signature──▶ Approved ──▶ Idle
//!                       │
//!                       └──────cancel─────▶ Cancelled ─▶ Idle
//! ```
//!
//! `Approved` and `Cancelled` are passed through on resolution and show up
//! in the transition log; [`ApprovalGate::state`] only ever reports `Idle`
//! or `Pending`. Each escalation ends in exactly one resolution.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sentinel_types::{
    ApprovalId, ApprovalRecord, ApprovalResolution, ElementId, RiskResult, SignedMessage,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{WorkflowError, WorkflowResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Idle,
    Pending,
    Approved,
    Cancelled,
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateState::Idle => f.write_str("idle"),
            GateState::Pending => f.write_str("pending"),
            GateState::Approved => f.write_str("approved"),
            GateState::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// An escalated result waiting for a human decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingApproval {
    pub approval_id: ApprovalId,
    pub element_id: ElementId,
    pub result: RiskResult,
    /// Score as shown on the dashboard and in the approval message.
    pub display_score: f64,
    pub escalated_at: DateTime<Utc>,
}

/// One recorded state change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateTransition {
    pub element_id: ElementId,
    pub approval_id: ApprovalId,
    pub from: GateState,
    pub to: GateState,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct ApprovalGate {
    pending: HashMap<ElementId, PendingApproval>,
    resolutions: Vec<ApprovalResolution>,
    transitions: Vec<GateTransition>,
}

impl ApprovalGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, element: &ElementId) -> GateState {
        if self.pending.contains_key(element) {
            GateState::Pending
        } else {
            GateState::Idle
        }
    }

    pub fn pending(&self, element: &ElementId) -> Option<&PendingApproval> {
        self.pending.get(element)
    }

    pub fn pending_all(&self) -> impl Iterator<Item = &PendingApproval> {
        self.pending.values()
    }

    /// Move `element` to `Pending` holding `result`.
    pub fn escalate(
        &mut self,
        element: &ElementId,
        result: RiskResult,
        display_score: f64,
    ) -> WorkflowResult<ApprovalId> {
        if self.pending.contains_key(element) {
            return Err(WorkflowError::ApprovalPending(element.clone()));
        }

        let approval_id = ApprovalId::new();
        let now = Utc::now();
        self.pending.insert(
            element.clone(),
            PendingApproval {
                approval_id: approval_id.clone(),
                element_id: element.clone(),
                result,
                display_score,
                escalated_at: now,
            },
        );
        self.transition(element, &approval_id, GateState::Idle, GateState::Pending, now);
        info!(element = %element, approval = %approval_id, "approval pending");
        Ok(approval_id)
    }

    /// Resolve the approval with a signature.
    ///
    /// Fails with `NoPendingApproval` when the approval it was requested for
    /// is gone, in which case the signature is discarded.
    pub fn complete_approval(
        &mut self,
        element: &ElementId,
        approval_id: &ApprovalId,
        message: String,
        signed: SignedMessage,
    ) -> WorkflowResult<ApprovalRecord> {
        let matches = self
            .pending
            .get(element)
            .is_some_and(|p| &p.approval_id == approval_id);
        if !matches {
            return Err(WorkflowError::NoPendingApproval(element.clone()));
        }
        let pending = self
            .pending
            .remove(element)
            .ok_or_else(|| WorkflowError::NoPendingApproval(element.clone()))?;

        let record = ApprovalRecord {
            approval_id: pending.approval_id.clone(),
            element_id: element.clone(),
            score: pending.result.score,
            category: pending.result.category,
            decision_id: pending.result.decision_id,
            message,
            signer: signed.address,
            signature: signed.signature,
            signed_at: signed.timestamp,
        };

        let now = Utc::now();
        self.transition(element, approval_id, GateState::Pending, GateState::Approved, now);
        self.transition(element, approval_id, GateState::Approved, GateState::Idle, now);
        self.resolutions
            .push(ApprovalResolution::Approved(record.clone()));
        info!(
            element = %element,
            approval = %approval_id,
            signer = %record.signer,
            "approval signed"
        );
        Ok(record)
    }

    /// Dismiss the pending approval. Immediate, even while signing.
    pub fn cancel(&mut self, element: &ElementId) -> WorkflowResult<ApprovalId> {
        let pending = self
            .pending
            .remove(element)
            .ok_or_else(|| WorkflowError::NoPendingApproval(element.clone()))?;

        let now = Utc::now();
        let approval_id = pending.approval_id;
        self.transition(element, &approval_id, GateState::Pending, GateState::Cancelled, now);
        self.transition(element, &approval_id, GateState::Cancelled, GateState::Idle, now);
        self.resolutions.push(ApprovalResolution::Cancelled {
            approval_id: approval_id.clone(),
            element_id: element.clone(),
            at: now,
        });
        info!(element = %element, approval = %approval_id, "approval cancelled");
        Ok(approval_id)
    }

    /// Every resolution so far, oldest first.
    pub fn resolutions(&self) -> &[ApprovalResolution] {
        &self.resolutions
    }

    pub fn approvals(&self) -> impl Iterator<Item = &ApprovalRecord> {
        self.resolutions.iter().filter_map(|r| match r {
            ApprovalResolution::Approved(record) => Some(record),
            ApprovalResolution::Cancelled { .. } => None,
        })
    }

    pub fn transitions(&self) -> &[GateTransition] {
        &self.transitions
    }

    fn transition(
        &mut self,
        element: &ElementId,
        approval_id: &ApprovalId,
        from: GateState,
        to: GateState,
        at: DateTime<Utc>,
    ) {
        self.transitions.push(GateTransition {
            element_id: element.clone(),
            approval_id: approval_id.clone(),
            from,
            to,
            at,
        });
    }
}
