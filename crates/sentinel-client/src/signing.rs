use async_trait::async_trait;
use chrono::Utc;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use sentinel_types::{ElementId, SignedMessage};
use tracing::debug;

use crate::error::SigningError;

/// The message an approver signs for an escalated edit.
///
/// `display_score` is the dashboard-scaled score, rendered as a percentage.
pub fn approval_message(element: &ElementId, display_score: f64) -> String {
    format!("Approving BIM Element: {element} with Risk Score: {display_score}%")
}

/// External signer used to authorize escalated edits.
#[async_trait]
pub trait SigningProvider: Send + Sync {
    /// Sign `message`, or fail if no signer is reachable or the human declines.
    async fn sign(&self, message: &str) -> Result<SignedMessage, SigningError>;
}

/// Ed25519 signer holding its key in process.
///
/// The address is `0x` followed by the first 20 bytes of the BLAKE3 digest
/// of the verifying key.
pub struct LocalKeySigner {
    key: SigningKey,
}

impl LocalKeySigner {
    /// Fresh random key.
    pub fn generate() -> Self {
        Self {
            key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(&seed),
        }
    }

    /// Load from a 64-character hex seed.
    pub fn from_hex_seed(seed: &str) -> Result<Self, SigningError> {
        let bytes = hex::decode(seed.trim())
            .map_err(|e| SigningError::InvalidKey(format!("seed is not hex: {e}")))?;
        let seed: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            SigningError::InvalidKey(format!("seed must be 32 bytes, got {}", b.len()))
        })?;
        Ok(Self::from_seed(seed))
    }

    pub fn address(&self) -> String {
        let digest = blake3::hash(self.key.verifying_key().as_bytes());
        format!("0x{}", hex::encode(&digest.as_bytes()[..20]))
    }

    /// Check a signature this signer produced.
    pub fn verify(&self, message: &str, signed: &SignedMessage) -> bool {
        if signed.address != self.address() {
            return false;
        }
        let Ok(bytes) = hex::decode(&signed.signature) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(&bytes) else {
            return false;
        };
        self.key
            .verifying_key()
            .verify(message.as_bytes(), &signature)
            .is_ok()
    }
}

#[async_trait]
impl SigningProvider for LocalKeySigner {
    async fn sign(&self, message: &str) -> Result<SignedMessage, SigningError> {
        let signature = self.key.sign(message.as_bytes());
        let address = self.address();
        debug!(signer = %address, "Signed approval message");

        Ok(SignedMessage {
            address,
            signature: hex::encode(signature.to_bytes()),
            timestamp: Utc::now(),
        })
    }
}
