//! Core types for the governance engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use did_registry::{Address, RegistryError};

use crate::action::GovernanceAction;

/// Unique proposal identifier (SHA-256 digest).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProposalId([u8; 32]);

impl ProposalId {
    /// Wrap a raw digest.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProposalId({})", self)
    }
}

impl FromStr for ProposalId {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| GovernanceError::Encoding(format!("invalid proposal id {s}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl Serialize for ProposalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProposalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A pending or executed governance action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Proposal ID
    pub id: ProposalId,
    /// Action applied once approved
    pub action: GovernanceAction,
    /// Canonical encoding of `action`
    pub payload: Vec<u8>,
    /// Whether the action is unanimity-tier
    pub requires_unanimity: bool,
    /// Owner that created the proposal
    pub proposer: Address,
    /// Owners who approved, in approval order
    pub approvals: Vec<Address>,
    /// Set once, when the action has been applied
    pub executed: bool,
    /// When the proposal was created
    pub created_at: DateTime<Utc>,
    /// When the proposal was executed
    pub executed_at: Option<DateTime<Utc>>,
}

impl Proposal {
    /// Whether `owner` has approved.
    pub fn has_approved(&self, owner: &Address) -> bool {
        self.approvals.contains(owner)
    }
}

/// Lifecycle event emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GovernanceEvent {
    /// A proposal was opened
    ProposalCreated {
        id: ProposalId,
        payload: Vec<u8>,
        requires_unanimity: bool,
        proposer: Address,
        at: DateTime<Utc>,
    },
    /// An owner approved a proposal
    ApprovalRecorded {
        id: ProposalId,
        owner: Address,
        at: DateTime<Utc>,
    },
    /// A proposal's action was applied
    ProposalExecuted { id: ProposalId, at: DateTime<Utc> },
}

impl GovernanceEvent {
    /// Proposal the event refers to.
    pub fn proposal_id(&self) -> ProposalId {
        match self {
            Self::ProposalCreated { id, .. }
            | Self::ApprovalRecorded { id, .. }
            | Self::ProposalExecuted { id, .. } => *id,
        }
    }
}

/// Result of an approval or explicit execution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// Threshold not reached yet
    Pending { approvals: usize, required: usize },
    /// Threshold reached and the action was applied
    Executed,
    /// Threshold reached but the action failed; the proposal stays pending
    ExecutionFailed { error: GovernanceError },
}

impl ApprovalOutcome {
    /// Whether the action was applied.
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed)
    }
}

/// Errors that can occur in the governance engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GovernanceError {
    /// Caller is not a current owner
    #[error("Not an owner: {0}")]
    NotOwner(Address),

    /// Fast-path call aimed at the engine's own identity
    #[error("Self-target requires proposal: {0}")]
    SelfTargetRequiresProposal(Address),

    /// Capability query refused the write
    #[error("Capability denied: {caller} may not author {operation} on {subject}")]
    CapabilityDenied {
        caller: Address,
        subject: Address,
        operation: String,
    },

    /// Zero or otherwise unusable address
    #[error("Invalid {0} address")]
    InvalidAddress(&'static str),

    /// Owner already present
    #[error("Owner already exists: {0}")]
    DuplicateOwner(Address),

    /// Owner not present
    #[error("Owner not found: {0}")]
    OwnerNotFound(Address),

    /// Would leave the owner set empty
    #[error("Cannot remove the last owner: {0}")]
    LastOwner(Address),

    /// Would leave quorum outside 1..=owners
    #[error("Invalid quorum {quorum} for {owners} owners")]
    InvalidQuorum { quorum: usize, owners: usize },

    /// Unknown proposal
    #[error("Proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    /// Proposal already applied
    #[error("Proposal already executed: {0}")]
    AlreadyExecuted(ProposalId),

    /// Owner already approved this proposal
    #[error("Owner {owner} already approved proposal {id}")]
    AlreadyApproved { id: ProposalId, owner: Address },

    /// Registry rejected the write
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Payload or id encoding failed
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Result type for governance operations.
pub type Result<T> = std::result::Result<T, GovernanceError>;
