//! Core type definitions for Strata Sentinel.
//!
//! This crate holds the shared data model of the risk-gated edit workflow:
//! model elements, edit requests, normalized risk results, revision
//! references, history entries and approval records. No workflow logic
//! lives here. The scoring client and the gate both depend on this crate.

pub mod approval;
pub mod catalog;
pub mod edit;
pub mod element;
pub mod history;
pub mod ids;
pub mod risk;

pub use approval::{ApprovalId, ApprovalRecord, ApprovalResolution, SignedMessage};
pub use catalog::{Category, ModelEntry};
pub use edit::{
    EditParameters, EditRequest, EditRequestBuilder, EditRequestError, ParameterOverrides,
    DEFAULT_EDIT_TYPE,
};
pub use element::Element;
pub use history::HistoryEntry;
pub use ids::{ElementId, RevisionRef};
pub use risk::{RecommendedAction, RiskResult, ScoringEndpoint};
