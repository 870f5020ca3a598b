//! Risk-gated edit commit workflow.
//!
//! An operator selects a model element and submits an edit. The edit is
//! scored by an external service, and the score decides the commit path:
//!
//! 1. **Auto-commit**: the score is at or below the threshold. A history
//!    entry is appended, then the active model revision is swapped if the
//!    service produced a new one.
//! 2. **Escalate**: the score is above the threshold, or the service asked
//!    for escalation. A history entry is appended at once and the element's
//!    approval gate turns `Pending` until a human signs off or cancels.
//!
//! ## Guarantees
//!
//! - At most one scoring request per element is in flight; a second
//!   submission is rejected, never queued.
//! - Scoring failures never touch history, selection or revision state.
//! - The risk history is append-only and kept in submission order.
//! - Approval records the sign-off only; it never applies a revision.
//! - Signing failures leave the approval pending and are retryable.
//!
//! [`EditWorkflow`] owns all of this state; every mutation goes through its
//! operations.

pub mod approval;
pub mod config;
pub mod error;
pub mod history;
pub mod revision;
pub mod router;
pub mod selection;
pub mod workflow;

pub use approval::{ApprovalGate, GateState, GateTransition, PendingApproval};
pub use config::GateConfig;
pub use error::{WorkflowError, WorkflowResult};
pub use history::RiskHistory;
pub use revision::{RevisionChange, RevisionResolver};
pub use router::{classify, Route, ThresholdRouter, DEFAULT_THRESHOLD};
pub use selection::SelectionState;
pub use workflow::{EditWorkflow, SubmissionOutcome};
