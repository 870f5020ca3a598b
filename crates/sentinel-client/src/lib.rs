//! Clients for the services the edit workflow talks to.
//!
//! - [`HttpScoringClient`] posts edit requests to the risk-scoring service and
//!   normalizes either response shape into one [`RiskResult`](sentinel_types::RiskResult).
//! - [`CatalogClient`] lists the published models and categories.
//! - [`LocalKeySigner`] signs approval messages with an Ed25519 key.
//!
//! The workflow depends only on the [`ScoringService`] and [`SigningProvider`]
//! traits; [`mocks`] provides scripted implementations for tests.

pub mod catalog;
pub mod error;
pub mod mocks;
pub mod scoring;
pub mod signing;
mod transport;
pub mod wire;

pub use catalog::{parse_catalog, parse_categories, CatalogClient};
pub use error::{ClientError, ClientResult, SigningError};
pub use mocks::{MockScoringService, MockSigner, SignBehaviour};
pub use scoring::{HttpScoringClient, ScoringService};
pub use signing::{approval_message, LocalKeySigner, SigningProvider};
pub use wire::{parse_scoring_response, DECISION_ESCALATION_SCORE, ESCALATE_ACTION};
