//! Payload encoding and proposal id derivation.

use sha2::{Digest, Sha256};

use crate::action::GovernanceAction;
use crate::types::{GovernanceError, ProposalId, Result};

/// Domain separator mixed into every proposal id.
const PROPOSAL_ID_DOMAIN: &[u8] = b"trust-anchor/proposal/v1";

/// Canonical payload bytes for an action.
pub fn encode_payload(action: &GovernanceAction) -> Result<Vec<u8>> {
    serde_json::to_vec(action).map_err(|e| GovernanceError::Encoding(e.to_string()))
}

/// Decode payload bytes back into an action.
pub fn decode_payload(payload: &[u8]) -> Result<GovernanceAction> {
    serde_json::from_slice(payload).map_err(|e| GovernanceError::Encoding(e.to_string()))
}

/// Derive a proposal id from the engine nonce and the encoded payload.
///
/// The nonce makes re-proposals of an identical action distinct.
pub fn derive_proposal_id(nonce: u64, payload: &[u8]) -> ProposalId {
    let mut hasher = Sha256::new();
    hasher.update(PROPOSAL_ID_DOMAIN);
    hasher.update(nonce.to_be_bytes());
    hasher.update(payload);
    let digest = hasher.finalize();

    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    ProposalId::from_bytes(bytes)
}
