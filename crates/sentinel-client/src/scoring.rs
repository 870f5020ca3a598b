use std::time::Duration;

use async_trait::async_trait;
use sentinel_types::{EditRequest, RevisionRef, RiskResult, ScoringEndpoint};
use tracing::{debug, warn};

use crate::error::ClientResult;
use crate::transport::ServiceHttp;
use crate::wire::{parse_scoring_response, EditComponentRequest, RecordDecisionRequest};

/// The external risk-scoring service, as seen by the workflow.
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Score one edit against the given model revision.
    ///
    /// Any transport or parse problem is an error; a failure is never
    /// reported as a zero score.
    async fn submit(
        &self,
        request: &EditRequest,
        model: Option<&RevisionRef>,
    ) -> ClientResult<RiskResult>;
}

/// HTTP implementation of [`ScoringService`].
pub struct HttpScoringClient {
    http: ServiceHttp,
    endpoint: ScoringEndpoint,
}

impl HttpScoringClient {
    /// Create a client for `base_url`, posting to the given endpoint.
    pub fn new(base_url: &str, endpoint: ScoringEndpoint, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            http: ServiceHttp::new(base_url, timeout)?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> ScoringEndpoint {
        self.endpoint
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

#[async_trait]
impl ScoringService for HttpScoringClient {
    async fn submit(
        &self,
        request: &EditRequest,
        model: Option<&RevisionRef>,
    ) -> ClientResult<RiskResult> {
        let url = self.http.url(self.endpoint.path());
        debug!(
            url = %url,
            element = %request.element_id(),
            edit_type = request.edit_type(),
            "Posting edit for scoring"
        );

        let body = match self.endpoint {
            ScoringEndpoint::EditComponent => {
                self.http
                    .post(&url, &EditComponentRequest::from_edit(request, model))
                    .await
            }
            ScoringEndpoint::RecordDecision => {
                self.http
                    .post(&url, &RecordDecisionRequest::from_edit(request))
                    .await
            }
        };

        let body = body.map_err(|e| {
            warn!(element = %request.element_id(), error = %e, "Scoring request failed");
            e
        })?;

        parse_scoring_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = HttpScoringClient::new(
            "http://localhost:8000/",
            ScoringEndpoint::RecordDecision,
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.endpoint(), ScoringEndpoint::RecordDecision);
    }
}
