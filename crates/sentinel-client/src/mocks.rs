use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sentinel_types::{EditRequest, RevisionRef, RiskResult, SignedMessage};
use tokio::sync::{Mutex, Semaphore};

use crate::error::{ClientError, ClientResult, SigningError};
use crate::scoring::ScoringService;
use crate::signing::SigningProvider;

/// Scripted scoring service for tests.
///
/// Responses are served in the order they were pushed. A gate semaphore can
/// hold every call until the test releases a permit, which keeps a request
/// in flight for as long as the test needs.
pub struct MockScoringService {
    responses: Mutex<VecDeque<ClientResult<RiskResult>>>,
    requests: Mutex<Vec<(EditRequest, Option<RevisionRef>)>>,
    gate: Option<Arc<Semaphore>>,
    delay: Option<Duration>,
}

impl MockScoringService {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            gate: None,
            delay: None,
        }
    }

    /// Hold each call until a permit is available on `gate`.
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push_result(&self, result: RiskResult) {
        self.responses.lock().await.push_back(Ok(result));
    }

    pub async fn push_failure(&self, error: ClientError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// Number of requests received so far.
    pub async fn calls(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Requests received so far, with the model revision each was sent against.
    pub async fn requests(&self) -> Vec<(EditRequest, Option<RevisionRef>)> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockScoringService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScoringService for MockScoringService {
    async fn submit(
        &self,
        request: &EditRequest,
        model: Option<&RevisionRef>,
    ) -> ClientResult<RiskResult> {
        self.requests
            .lock()
            .await
            .push((request.clone(), model.cloned()));

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| ClientError::Config("mock gate closed".into()))?;
            permit.forget();
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Malformed("no scripted response left".into())))
    }
}

/// How a [`MockSigner`] answers one signing request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignBehaviour {
    Approve,
    Unavailable,
    Reject,
}

/// Scripted signing provider for tests.
///
/// Queued behaviours are used first; once the queue is empty every call
/// falls back to the default behaviour.
pub struct MockSigner {
    address: String,
    default: SignBehaviour,
    queue: Mutex<VecDeque<SignBehaviour>>,
    messages: Mutex<Vec<String>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockSigner {
    fn with_default(default: SignBehaviour) -> Self {
        Self {
            address: "0x00000000000000000000000000000000000000aa".into(),
            default,
            queue: Mutex::new(VecDeque::new()),
            messages: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Signs everything.
    pub fn approving() -> Self {
        Self::with_default(SignBehaviour::Approve)
    }

    /// Behaves as if no wallet were reachable.
    pub fn unavailable() -> Self {
        Self::with_default(SignBehaviour::Unavailable)
    }

    /// Behaves as if the human declined every request.
    pub fn rejecting() -> Self {
        Self::with_default(SignBehaviour::Reject)
    }

    /// Answer the next calls with these behaviours, in order.
    pub fn then(mut self, behaviours: impl IntoIterator<Item = SignBehaviour>) -> Self {
        self.queue.get_mut().extend(behaviours);
        self
    }

    /// Hold each call until a permit is available on `gate`.
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Every message this signer was asked to sign.
    pub async fn messages(&self) -> Vec<String> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl SigningProvider for MockSigner {
    async fn sign(&self, message: &str) -> Result<SignedMessage, SigningError> {
        self.messages.lock().await.push(message.to_string());

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| SigningError::Unavailable("mock gate closed".into()))?;
            permit.forget();
        }

        let behaviour = self.queue.lock().await.pop_front().unwrap_or(self.default);
        match behaviour {
            SignBehaviour::Approve => Ok(SignedMessage {
                address: self.address.clone(),
                signature: format!("mock-signature-{}", message.len()),
                timestamp: Utc::now(),
            }),
            SignBehaviour::Unavailable => Err(SigningError::Unavailable("no wallet found".into())),
            SignBehaviour::Reject => Err(SigningError::Rejected("user declined".into())),
        }
    }
}
