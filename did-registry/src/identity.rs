//! Identity registry: owner-of-record, attributes and delegate grants.
//!
//! Follows ERC-1056 semantics. Every identity is owned by itself until its
//! ownership is changed, attributes and delegates carry a `valid_to`
//! timestamp, and every write is appended to an event log that links back to
//! the identity's previous change.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::{RegistryError, Result};
use crate::types::{Address, AttributeCategory, OperationCategory};

/// Identity registry surface consumed by the governance engine.
///
/// `caller` is the principal presenting the write. Every write either
/// applies fully or fails with a [`RegistryError`].
#[async_trait]
pub trait IdentityRegistry: Send + Sync {
    /// Current owner-of-record.
    async fn identity_owner(&self, identity: Address) -> Address;

    /// Transfer owner-of-record. Caller must be the current owner.
    async fn change_owner(&self, caller: Address, identity: Address, new_owner: Address)
        -> Result<()>;

    /// Set an attribute valid for `validity_secs`.
    async fn set_attribute(
        &self,
        caller: Address,
        identity: Address,
        name: &str,
        value: &[u8],
        validity_secs: u64,
    ) -> Result<()>;

    /// Revoke a live attribute with exactly this value.
    async fn revoke_attribute(
        &self,
        caller: Address,
        identity: Address,
        name: &str,
        value: &[u8],
    ) -> Result<()>;

    /// Live attribute value, if any.
    async fn attribute(&self, identity: Address, name: &str) -> Option<Vec<u8>>;

    /// Grant a delegate for `validity_secs`. Caller must be the owner.
    async fn add_delegate(
        &self,
        caller: Address,
        identity: Address,
        delegate_type: &str,
        delegate: Address,
        validity_secs: u64,
    ) -> Result<()>;

    /// Revoke a live delegate grant. Caller must be the owner.
    async fn revoke_delegate(
        &self,
        caller: Address,
        identity: Address,
        delegate_type: &str,
        delegate: Address,
    ) -> Result<()>;

    /// Whether `delegate` currently holds a grant of `delegate_type`.
    async fn valid_delegate(&self, identity: Address, delegate_type: &str, delegate: Address)
        -> bool;

    /// Whether a write of `category` by `caller` on `identity` would be accepted.
    async fn can_author(&self, caller: Address, identity: Address, category: OperationCategory)
        -> bool;
}

/// An entry in the identity registry's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum IdentityEvent {
    /// Owner-of-record changed
    OwnerChanged {
        identity: Address,
        owner: Address,
        previous_change: u64,
    },
    /// Attribute set (or revoked, with `valid_to == 0`)
    AttributeChanged {
        identity: Address,
        name: String,
        value: Vec<u8>,
        valid_to: u64,
        previous_change: u64,
    },
    /// Delegate granted or revoked
    DelegateChanged {
        identity: Address,
        delegate_type: String,
        delegate: Address,
        valid_to: u64,
        previous_change: u64,
    },
}

impl IdentityEvent {
    /// Identity the event belongs to.
    pub fn identity(&self) -> Address {
        match self {
            Self::OwnerChanged { identity, .. }
            | Self::AttributeChanged { identity, .. }
            | Self::DelegateChanged { identity, .. } => *identity,
        }
    }
}

#[derive(Debug, Clone)]
struct AttributeRecord {
    value: Vec<u8>,
    valid_to: u64,
}

#[derive(Debug, Default)]
struct IdentityState {
    owners: HashMap<Address, Address>,
    attributes: HashMap<(Address, String), AttributeRecord>,
    delegates: HashMap<(Address, String, Address), u64>,
    changed: HashMap<Address, u64>,
    change_counter: u64,
    events: Vec<IdentityEvent>,
}

impl IdentityState {
    fn owner_of(&self, identity: Address) -> Address {
        self.owners.get(&identity).copied().unwrap_or(identity)
    }

    fn delegate_valid_to(&self, identity: Address, delegate_type: &str, delegate: Address) -> u64 {
        self.delegates
            .get(&(identity, delegate_type.to_string(), delegate))
            .copied()
            .unwrap_or(0)
    }

    fn can_author(
        &self,
        caller: Address,
        identity: Address,
        category: OperationCategory,
        now: u64,
    ) -> bool {
        if caller == self.owner_of(identity) {
            return true;
        }
        match category {
            OperationCategory::Attribute(attribute) => attribute
                .scoped_delegate_type()
                .map(|t| self.delegate_valid_to(identity, t, caller) > now)
                .unwrap_or(false),
            _ => false,
        }
    }

    fn require_owner(&self, caller: Address, identity: Address) -> Result<()> {
        if caller != self.owner_of(identity) {
            return Err(RegistryError::NotIdentityOwner { identity, caller });
        }
        Ok(())
    }

    fn require_attribute_author(
        &self,
        caller: Address,
        identity: Address,
        name: &str,
        now: u64,
    ) -> Result<()> {
        let category = OperationCategory::Attribute(AttributeCategory::of(name));
        if !self.can_author(caller, identity, category, now) {
            return Err(RegistryError::AttributeNotAuthorized {
                identity,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Bump the change sequence and log the event built from the previous one.
    fn record_change(&mut self, identity: Address, event: impl FnOnce(u64) -> IdentityEvent) {
        let previous_change = self.changed.get(&identity).copied().unwrap_or(0);
        self.change_counter += 1;
        self.changed.insert(identity, self.change_counter);
        self.events.push(event(previous_change));
    }
}

/// In-memory [`IdentityRegistry`].
pub struct InMemoryIdentityRegistry {
    /// Time source for validity windows
    clock: Arc<dyn Clock>,
    /// Registry state
    state: RwLock<IdentityState>,
}

impl InMemoryIdentityRegistry {
    /// Create a registry backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a registry with a custom clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: RwLock::new(IdentityState::default()),
        }
    }

    /// Full event log in write order.
    pub async fn events(&self) -> Vec<IdentityEvent> {
        self.state.read().await.events.clone()
    }

    /// Events for one identity in write order.
    pub async fn events_for(&self, identity: Address) -> Vec<IdentityEvent> {
        let state = self.state.read().await;
        state
            .events
            .iter()
            .filter(|e| e.identity() == identity)
            .cloned()
            .collect()
    }

    /// Sequence number of the identity's last change (0 if never changed).
    pub async fn changed(&self, identity: Address) -> u64 {
        let state = self.state.read().await;
        state.changed.get(&identity).copied().unwrap_or(0)
    }
}

impl Default for InMemoryIdentityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityRegistry for InMemoryIdentityRegistry {
    async fn identity_owner(&self, identity: Address) -> Address {
        self.state.read().await.owner_of(identity)
    }

    async fn change_owner(
        &self,
        caller: Address,
        identity: Address,
        new_owner: Address,
    ) -> Result<()> {
        if new_owner.is_zero() {
            return Err(RegistryError::InvalidAddress("owner"));
        }

        let mut state = self.state.write().await;
        state.require_owner(caller, identity)?;
        state.owners.insert(identity, new_owner);
        state.record_change(identity, |previous_change| IdentityEvent::OwnerChanged {
            identity,
            owner: new_owner,
            previous_change,
        });

        info!(identity = %identity, owner = %new_owner, "Identity owner changed");
        Ok(())
    }

    async fn set_attribute(
        &self,
        caller: Address,
        identity: Address,
        name: &str,
        value: &[u8],
        validity_secs: u64,
    ) -> Result<()> {
        let now = self.clock.now_secs();
        let valid_to = now.saturating_add(validity_secs);

        let mut state = self.state.write().await;
        state.require_attribute_author(caller, identity, name, now)?;
        state.attributes.insert(
            (identity, name.to_string()),
            AttributeRecord {
                value: value.to_vec(),
                valid_to,
            },
        );
        state.record_change(identity, |previous_change| IdentityEvent::AttributeChanged {
            identity,
            name: name.to_string(),
            value: value.to_vec(),
            valid_to,
            previous_change,
        });

        debug!(identity = %identity, name = %name, valid_to, "Attribute set");
        Ok(())
    }

    async fn revoke_attribute(
        &self,
        caller: Address,
        identity: Address,
        name: &str,
        value: &[u8],
    ) -> Result<()> {
        let now = self.clock.now_secs();

        let mut state = self.state.write().await;
        state.require_attribute_author(caller, identity, name, now)?;

        let key = (identity, name.to_string());
        let live = state
            .attributes
            .get(&key)
            .map(|r| r.valid_to > now && r.value == value)
            .unwrap_or(false);
        if !live {
            return Err(RegistryError::AttributeNotFound {
                identity,
                name: name.to_string(),
            });
        }

        state.attributes.remove(&key);
        state.record_change(identity, |previous_change| IdentityEvent::AttributeChanged {
            identity,
            name: name.to_string(),
            value: value.to_vec(),
            valid_to: 0,
            previous_change,
        });

        debug!(identity = %identity, name = %name, "Attribute revoked");
        Ok(())
    }

    async fn attribute(&self, identity: Address, name: &str) -> Option<Vec<u8>> {
        let now = self.clock.now_secs();
        let state = self.state.read().await;
        state
            .attributes
            .get(&(identity, name.to_string()))
            .filter(|r| r.valid_to > now)
            .map(|r| r.value.clone())
    }

    async fn add_delegate(
        &self,
        caller: Address,
        identity: Address,
        delegate_type: &str,
        delegate: Address,
        validity_secs: u64,
    ) -> Result<()> {
        if delegate.is_zero() {
            return Err(RegistryError::InvalidAddress("delegate"));
        }
        let valid_to = self.clock.now_secs().saturating_add(validity_secs);

        let mut state = self.state.write().await;
        state.require_owner(caller, identity)?;
        state
            .delegates
            .insert((identity, delegate_type.to_string(), delegate), valid_to);
        state.record_change(identity, |previous_change| IdentityEvent::DelegateChanged {
            identity,
            delegate_type: delegate_type.to_string(),
            delegate,
            valid_to,
            previous_change,
        });

        info!(
            identity = %identity,
            delegate_type = %delegate_type,
            delegate = %delegate,
            valid_to,
            "Delegate added"
        );
        Ok(())
    }

    async fn revoke_delegate(
        &self,
        caller: Address,
        identity: Address,
        delegate_type: &str,
        delegate: Address,
    ) -> Result<()> {
        let now = self.clock.now_secs();

        let mut state = self.state.write().await;
        state.require_owner(caller, identity)?;
        if state.delegate_valid_to(identity, delegate_type, delegate) <= now {
            return Err(RegistryError::DelegateNotFound {
                identity,
                delegate_type: delegate_type.to_string(),
                delegate,
            });
        }

        state
            .delegates
            .insert((identity, delegate_type.to_string(), delegate), now);
        state.record_change(identity, |previous_change| IdentityEvent::DelegateChanged {
            identity,
            delegate_type: delegate_type.to_string(),
            delegate,
            valid_to: now,
            previous_change,
        });

        info!(
            identity = %identity,
            delegate_type = %delegate_type,
            delegate = %delegate,
            "Delegate revoked"
        );
        Ok(())
    }

    async fn valid_delegate(
        &self,
        identity: Address,
        delegate_type: &str,
        delegate: Address,
    ) -> bool {
        let now = self.clock.now_secs();
        self.state
            .read()
            .await
            .delegate_valid_to(identity, delegate_type, delegate)
            > now
    }

    async fn can_author(
        &self,
        caller: Address,
        identity: Address,
        category: OperationCategory,
    ) -> bool {
        let now = self.clock.now_secs();
        self.state
            .read()
            .await
            .can_author(caller, identity, category, now)
    }
}
