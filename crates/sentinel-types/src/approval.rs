use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ElementId;

/// Identifies one escalation awaiting a human decision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApprovalId(pub uuid::Uuid);

impl ApprovalId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ApprovalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ApprovalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "apr:{}", self.0)
    }
}

/// What a signing provider hands back for a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedMessage {
    /// Signer identity (address derived from the public key).
    pub address: String,
    /// Hex-encoded signature over the message bytes.
    pub signature: String,
    pub timestamp: DateTime<Utc>,
}

/// Governance record written when an escalated edit is signed off.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub approval_id: ApprovalId,
    pub element_id: ElementId,
    pub score: f64,
    pub category: String,
    pub decision_id: Option<String>,
    /// The exact message that was signed.
    pub message: String,
    pub signer: String,
    pub signature: String,
    pub signed_at: DateTime<Utc>,
}

/// How a pending approval ended. Exactly one per escalation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApprovalResolution {
    Approved(ApprovalRecord),
    Cancelled {
        approval_id: ApprovalId,
        element_id: ElementId,
        at: DateTime<Utc>,
    },
}

impl ApprovalResolution {
    pub fn approval_id(&self) -> &ApprovalId {
        match self {
            ApprovalResolution::Approved(record) => &record.approval_id,
            ApprovalResolution::Cancelled { approval_id, .. } => approval_id,
        }
    }

    pub fn element_id(&self) -> &ElementId {
        match self {
            ApprovalResolution::Approved(record) => &record.element_id,
            ApprovalResolution::Cancelled { element_id, .. } => element_id,
        }
    }
}
