use std::time::Duration;

use sentinel_client::{ClientError, SigningError};
use sentinel_types::{EditRequestError, ElementId};
use thiserror::Error;

/// Errors surfaced by the edit workflow.
///
/// None of these is fatal: after any error the workflow is back in an
/// interactive state, either idle or with the same approval still pending.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("invalid edit request: {0}")]
    InvalidRequest(#[from] EditRequestError),

    #[error("no element selected")]
    NoSelection,

    #[error("scoring transport failure: {0}")]
    TransportFailure(String),

    #[error("malformed scoring response: {0}")]
    MalformedResponse(String),

    #[error("scoring client misconfigured: {0}")]
    Misconfigured(String),

    #[error("scoring request timed out after {0:?}")]
    ScoringTimeout(Duration),

    #[error("signing provider unavailable: {0}")]
    SigningUnavailable(String),

    #[error("signature rejected: {0}")]
    SigningRejected(String),

    #[error("a scoring request for element {0} is already in flight")]
    ConcurrentSubmissionRejected(ElementId),

    #[error("element {0} has an approval pending")]
    ApprovalPending(ElementId),

    #[error("no pending approval for element {0}")]
    NoPendingApproval(ElementId),

    #[error("approval for element {0} is already being signed")]
    SigningInProgress(ElementId),
}

impl WorkflowError {
    /// Whether the same operation may succeed if simply tried again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WorkflowError::TransportFailure(_)
                | WorkflowError::ScoringTimeout(_)
                | WorkflowError::SigningUnavailable(_)
                | WorkflowError::SigningRejected(_)
                | WorkflowError::ConcurrentSubmissionRejected(_)
                | WorkflowError::SigningInProgress(_)
        )
    }
}

impl From<ClientError> for WorkflowError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Malformed(msg) => WorkflowError::MalformedResponse(msg),
            ClientError::Config(msg) => WorkflowError::Misconfigured(msg),
            other => WorkflowError::TransportFailure(other.to_string()),
        }
    }
}

impl From<SigningError> for WorkflowError {
    fn from(err: SigningError) -> Self {
        match err {
            SigningError::Rejected(msg) => WorkflowError::SigningRejected(msg),
            SigningError::Unavailable(msg) | SigningError::InvalidKey(msg) => {
                WorkflowError::SigningUnavailable(msg)
            }
        }
    }
}

/// Result type for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_taxonomy() {
        let api = ClientError::Api {
            status: 502,
            message: "bad gateway".into(),
        };
        assert!(matches!(
            WorkflowError::from(api),
            WorkflowError::TransportFailure(_)
        ));
        assert!(matches!(
            WorkflowError::from(ClientError::Malformed("x".into())),
            WorkflowError::MalformedResponse(_)
        ));
    }

    #[test]
    fn client_config_error_is_not_retryable() {
        let err = WorkflowError::from(ClientError::Config("invalid base URL".into()));
        assert!(matches!(err, WorkflowError::Misconfigured(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn signing_errors_map_to_taxonomy() {
        assert!(matches!(
            WorkflowError::from(SigningError::Rejected("no".into())),
            WorkflowError::SigningRejected(_)
        ));
        assert!(matches!(
            WorkflowError::from(SigningError::Unavailable("gone".into())),
            WorkflowError::SigningUnavailable(_)
        ));
    }

    #[test]
    fn retryability() {
        assert!(WorkflowError::SigningUnavailable("x".into()).is_retryable());
        assert!(WorkflowError::ConcurrentSubmissionRejected(ElementId::new("a")).is_retryable());
        assert!(!WorkflowError::MalformedResponse("x".into()).is_retryable());
        assert!(!WorkflowError::NoPendingApproval(ElementId::new("a")).is_retryable());
    }
}
