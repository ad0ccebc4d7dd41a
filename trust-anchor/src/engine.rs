//! Governance engine - owner set, quorum and the proposal lifecycle.
//!
//! Every state transition (propose, approve, execute, owner/quorum change)
//! runs under the write half of a single lock, including the awaited
//! registry write it triggers. Fast-path calls hold the read half so the
//! owner set cannot change underneath them.

use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use did_registry::{Address, AssetMarketplace, CompanyRegistry, IdentityRegistry};

use crate::action::{FastPathCall, GovernanceAction, IdentityCall};
use crate::config::GovernanceConfig;
use crate::encoding::{derive_proposal_id, encode_payload};
use crate::types::{
    ApprovalOutcome, GovernanceError, GovernanceEvent, Proposal, ProposalId, Result,
};

/// Owner set, quorum and proposal table.
#[derive(Debug)]
struct EngineState {
    owners: Vec<Address>,
    quorum: usize,
    proposals: HashMap<ProposalId, Proposal>,
    /// Proposal ids in creation order
    order: Vec<ProposalId>,
    nonce: u64,
}

impl EngineState {
    fn is_owner(&self, addr: &Address) -> bool {
        self.owners.contains(addr)
    }

    fn require_owner(&self, caller: Address) -> Result<()> {
        if !self.is_owner(&caller) {
            return Err(GovernanceError::NotOwner(caller));
        }
        Ok(())
    }

    fn proposal(&self, id: &ProposalId) -> Result<&Proposal> {
        self.proposals
            .get(id)
            .ok_or(GovernanceError::ProposalNotFound(*id))
    }

    fn proposal_mut(&mut self, id: &ProposalId) -> Result<&mut Proposal> {
        self.proposals
            .get_mut(id)
            .ok_or(GovernanceError::ProposalNotFound(*id))
    }

    /// Recorded approvals and the requirement, against the current owner set.
    fn tally(&self, proposal: &Proposal) -> (usize, usize) {
        let required = proposal
            .action
            .required_approvals(self.owners.len(), self.quorum);
        (proposal.approvals.len(), required)
    }

    /// Propose-time checks. Owner-count invariants are re-checked on execution.
    fn validate_proposal(&self, action: &GovernanceAction) -> Result<()> {
        match action {
            GovernanceAction::AddOwner { owner } => {
                if owner.is_zero() {
                    return Err(GovernanceError::InvalidAddress("owner"));
                }
                if self.is_owner(owner) {
                    return Err(GovernanceError::DuplicateOwner(*owner));
                }
                Ok(())
            }
            GovernanceAction::RemoveOwner { owner } => {
                if owner.is_zero() {
                    return Err(GovernanceError::InvalidAddress("owner"));
                }
                if !self.is_owner(owner) {
                    return Err(GovernanceError::OwnerNotFound(*owner));
                }
                Ok(())
            }
            GovernanceAction::SetQuorum { quorum } => {
                if *quorum == 0 {
                    return Err(GovernanceError::InvalidQuorum {
                        quorum: 0,
                        owners: self.owners.len(),
                    });
                }
                Ok(())
            }
            GovernanceAction::Identity(call) => call.validate(),
        }
    }

    fn add_owner(&mut self, owner: Address) -> Result<()> {
        if owner.is_zero() {
            return Err(GovernanceError::InvalidAddress("owner"));
        }
        if self.is_owner(&owner) {
            return Err(GovernanceError::DuplicateOwner(owner));
        }
        self.owners.push(owner);
        Ok(())
    }

    fn remove_owner(&mut self, owner: Address) -> Result<()> {
        let index = self
            .owners
            .iter()
            .position(|o| *o == owner)
            .ok_or(GovernanceError::OwnerNotFound(owner))?;
        if self.owners.len() == 1 {
            return Err(GovernanceError::LastOwner(owner));
        }
        let remaining = self.owners.len() - 1;
        if self.quorum > remaining {
            return Err(GovernanceError::InvalidQuorum {
                quorum: self.quorum,
                owners: remaining,
            });
        }
        self.owners.remove(index);
        Ok(())
    }

    fn set_quorum(&mut self, quorum: usize) -> Result<()> {
        if quorum == 0 || quorum > self.owners.len() {
            return Err(GovernanceError::InvalidQuorum {
                quorum,
                owners: self.owners.len(),
            });
        }
        self.quorum = quorum;
        Ok(())
    }
}

/// Owner-quorum governance over the Trust Anchor identity and its companies.
pub struct GovernanceEngine {
    /// The engine's own identity
    anchor: Address,
    /// Mutable governance state
    state: RwLock<EngineState>,
    /// Identity registry
    identities: Arc<dyn IdentityRegistry>,
    /// Company registry
    companies: Arc<dyn CompanyRegistry>,
    /// Live event channel
    events_tx: broadcast::Sender<GovernanceEvent>,
    /// Bounded event history
    history: RwLock<VecDeque<GovernanceEvent>>,
    /// Maximum history length
    history_limit: usize,
}

impl GovernanceEngine {
    /// Create a builder.
    pub fn builder() -> GovernanceEngineBuilder {
        GovernanceEngineBuilder::new()
    }

    /// The engine's own identity.
    pub fn anchor(&self) -> Address {
        self.anchor
    }

    /// Current owners in the order they were added.
    pub async fn owners(&self) -> Vec<Address> {
        self.state.read().await.owners.clone()
    }

    /// Current quorum.
    pub async fn quorum(&self) -> usize {
        self.state.read().await.quorum
    }

    /// Whether `addr` is a current owner.
    pub async fn is_owner(&self, addr: Address) -> bool {
        self.state.read().await.is_owner(&addr)
    }

    /// Look up a proposal.
    pub async fn proposal(&self, id: ProposalId) -> Option<Proposal> {
        self.state.read().await.proposals.get(&id).cloned()
    }

    /// Owners who approved a proposal, in approval order.
    pub async fn approvals(&self, id: ProposalId) -> Result<Vec<Address>> {
        let state = self.state.read().await;
        Ok(state.proposal(&id)?.approvals.clone())
    }

    /// All proposals in creation order.
    pub async fn proposals(&self) -> Vec<Proposal> {
        let state = self.state.read().await;
        state
            .order
            .iter()
            .filter_map(|id| state.proposals.get(id).cloned())
            .collect()
    }

    /// Proposals not yet executed, in creation order.
    pub async fn pending_proposals(&self) -> Vec<Proposal> {
        let state = self.state.read().await;
        state
            .order
            .iter()
            .filter_map(|id| state.proposals.get(id))
            .filter(|p| !p.executed)
            .cloned()
            .collect()
    }

    /// Approvals a proposal needs against the current owner set.
    pub async fn required_approvals(&self, id: ProposalId) -> Result<usize> {
        let state = self.state.read().await;
        let proposal = state.proposal(&id)?;
        Ok(state.tally(proposal).1)
    }

    /// Recent lifecycle events, oldest first.
    pub async fn events(&self) -> Vec<GovernanceEvent> {
        self.history.read().await.iter().cloned().collect()
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<GovernanceEvent> {
        self.events_tx.subscribe()
    }

    /// Open a proposal. Proposing does not approve.
    pub async fn propose(&self, caller: Address, action: GovernanceAction) -> Result<ProposalId> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        state.require_owner(caller)?;
        state.validate_proposal(&action)?;

        let payload = encode_payload(&action)?;
        let id = derive_proposal_id(state.nonce, &payload);
        state.nonce += 1;

        let requires_unanimity = action.requires_unanimity();
        let created_at = Utc::now();
        info!(
            proposal_id = %id,
            proposer = %caller,
            action = action.name(),
            requires_unanimity,
            "Proposal created"
        );

        state.proposals.insert(
            id,
            Proposal {
                id,
                action,
                payload: payload.clone(),
                requires_unanimity,
                proposer: caller,
                approvals: Vec::new(),
                executed: false,
                created_at,
                executed_at: None,
            },
        );
        state.order.push(id);

        self.emit(GovernanceEvent::ProposalCreated {
            id,
            payload,
            requires_unanimity,
            proposer: caller,
            at: created_at,
        })
        .await;

        Ok(id)
    }

    /// Propose transferring owner-of-record of `identity`.
    pub async fn propose_change_owner(
        &self,
        caller: Address,
        identity: Address,
        new_owner: Address,
    ) -> Result<ProposalId> {
        let call = IdentityCall::ChangeOwner {
            identity,
            new_owner,
        };
        self.propose(caller, GovernanceAction::Identity(call)).await
    }

    /// Propose adding an owner.
    pub async fn propose_add_owner(&self, caller: Address, owner: Address) -> Result<ProposalId> {
        self.propose(caller, GovernanceAction::AddOwner { owner }).await
    }

    /// Propose removing an owner.
    pub async fn propose_remove_owner(
        &self,
        caller: Address,
        owner: Address,
    ) -> Result<ProposalId> {
        self.propose(caller, GovernanceAction::RemoveOwner { owner })
            .await
    }

    /// Propose a new quorum.
    pub async fn propose_quorum_update(
        &self,
        caller: Address,
        quorum: usize,
    ) -> Result<ProposalId> {
        self.propose(caller, GovernanceAction::SetQuorum { quorum })
            .await
    }

    /// Propose setting an attribute on `identity`.
    pub async fn propose_set_attribute(
        &self,
        caller: Address,
        identity: Address,
        name: impl Into<String>,
        value: impl Into<Vec<u8>>,
        validity_secs: u64,
    ) -> Result<ProposalId> {
        let call = IdentityCall::SetAttribute {
            identity,
            name: name.into(),
            value: value.into(),
            validity_secs,
        };
        self.propose(caller, GovernanceAction::Identity(call)).await
    }

    /// Propose revoking an attribute on `identity`.
    pub async fn propose_revoke_attribute(
        &self,
        caller: Address,
        identity: Address,
        name: impl Into<String>,
        value: impl Into<Vec<u8>>,
    ) -> Result<ProposalId> {
        let call = IdentityCall::RevokeAttribute {
            identity,
            name: name.into(),
            value: value.into(),
        };
        self.propose(caller, GovernanceAction::Identity(call)).await
    }

    /// Propose granting a delegate on `identity`.
    pub async fn propose_add_delegate(
        &self,
        caller: Address,
        identity: Address,
        delegate_type: impl Into<String>,
        delegate: Address,
        validity_secs: u64,
    ) -> Result<ProposalId> {
        let call = IdentityCall::AddDelegate {
            identity,
            delegate_type: delegate_type.into(),
            delegate,
            validity_secs,
        };
        self.propose(caller, GovernanceAction::Identity(call)).await
    }

    /// Propose revoking a delegate on `identity`.
    pub async fn propose_revoke_delegate(
        &self,
        caller: Address,
        identity: Address,
        delegate_type: impl Into<String>,
        delegate: Address,
    ) -> Result<ProposalId> {
        let call = IdentityCall::RevokeDelegate {
            identity,
            delegate_type: delegate_type.into(),
            delegate,
        };
        self.propose(caller, GovernanceAction::Identity(call)).await
    }

    /// Propose setting an attribute on the engine's own identity.
    pub async fn propose_set_attribute_on_anchor(
        &self,
        caller: Address,
        name: impl Into<String>,
        value: impl Into<Vec<u8>>,
        validity_secs: u64,
    ) -> Result<ProposalId> {
        self.propose_set_attribute(caller, self.anchor, name, value, validity_secs)
            .await
    }

    /// Propose revoking an attribute on the engine's own identity.
    pub async fn propose_revoke_attribute_on_anchor(
        &self,
        caller: Address,
        name: impl Into<String>,
        value: impl Into<Vec<u8>>,
    ) -> Result<ProposalId> {
        self.propose_revoke_attribute(caller, self.anchor, name, value)
            .await
    }

    /// Propose granting a delegate on the engine's own identity.
    pub async fn propose_add_delegate_on_anchor(
        &self,
        caller: Address,
        delegate_type: impl Into<String>,
        delegate: Address,
        validity_secs: u64,
    ) -> Result<ProposalId> {
        self.propose_add_delegate(caller, self.anchor, delegate_type, delegate, validity_secs)
            .await
    }

    /// Propose revoking a delegate on the engine's own identity.
    pub async fn propose_revoke_delegate_on_anchor(
        &self,
        caller: Address,
        delegate_type: impl Into<String>,
        delegate: Address,
    ) -> Result<ProposalId> {
        self.propose_revoke_delegate(caller, self.anchor, delegate_type, delegate)
            .await
    }

    /// Record an approval and execute if the threshold is met.
    pub async fn approve(&self, caller: Address, id: ProposalId) -> Result<ApprovalOutcome> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        state.require_owner(caller)?;

        let proposal = state.proposal_mut(&id)?;
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(id));
        }
        if proposal.has_approved(&caller) {
            return Err(GovernanceError::AlreadyApproved { id, owner: caller });
        }
        proposal.approvals.push(caller);

        info!(proposal_id = %id, owner = %caller, "Approval recorded");
        self.emit(GovernanceEvent::ApprovalRecorded {
            id,
            owner: caller,
            at: Utc::now(),
        })
        .await;

        self.try_execute(state, id).await
    }

    /// Re-evaluate a pending proposal and execute if the threshold is met.
    ///
    /// Used to retry a proposal whose execution failed.
    pub async fn execute(&self, caller: Address, id: ProposalId) -> Result<ApprovalOutcome> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        state.require_owner(caller)?;
        if state.proposal(&id)?.executed {
            return Err(GovernanceError::AlreadyExecuted(id));
        }
        self.try_execute(state, id).await
    }

    /// Apply a call against a company identity immediately.
    ///
    /// The engine's own identity is refused; it must go through a proposal.
    pub async fn exec_call(&self, caller: Address, call: FastPathCall) -> Result<()> {
        let state = self.state.read().await;
        state.require_owner(caller)?;

        let target = call.target();
        if target == self.anchor {
            return Err(GovernanceError::SelfTargetRequiresProposal(target));
        }

        match &call {
            FastPathCall::Identity(c) => {
                c.validate()?;
                c.apply(self.identities.as_ref(), self.anchor).await?;
            }
            FastPathCall::Company(c) => {
                c.validate()?;
                c.apply(self.companies.as_ref(), self.anchor).await?;
            }
        }

        info!(subject = %target, owner = %caller, call = call.name(), "Fast-path call applied");
        Ok(())
    }

    /// Publish an asset on a marketplace the engine owns.
    pub async fn publish_marketplace_data(
        &self,
        caller: Address,
        marketplace: &AssetMarketplace,
        data: &str,
        asset_owner: Address,
    ) -> Result<u64> {
        let state = self.state.read().await;
        state.require_owner(caller)?;

        let asset_id = marketplace
            .publish_data(self.anchor, data, asset_owner)
            .await?;
        info!(asset_id, owner = %caller, "Marketplace data published");
        Ok(asset_id)
    }

    async fn try_execute(&self, state: &mut EngineState, id: ProposalId) -> Result<ApprovalOutcome> {
        let proposal = state.proposal(&id)?;
        let (approvals, required) = state.tally(proposal);
        debug!(proposal_id = %id, approvals, required, "Threshold evaluated");
        if approvals < required {
            return Ok(ApprovalOutcome::Pending {
                approvals,
                required,
            });
        }

        let action = proposal.action.clone();
        if let Err(error) = self.apply_action(state, &action).await {
            warn!(proposal_id = %id, error = %error, "Execution failed, proposal stays pending");
            return Ok(ApprovalOutcome::ExecutionFailed { error });
        }

        let executed_at = Utc::now();
        let proposal = state.proposal_mut(&id)?;
        proposal.executed = true;
        proposal.executed_at = Some(executed_at);

        info!(proposal_id = %id, action = action.name(), "Proposal executed");
        self.emit(GovernanceEvent::ProposalExecuted {
            id,
            at: executed_at,
        })
        .await;

        Ok(ApprovalOutcome::Executed)
    }

    async fn apply_action(&self, state: &mut EngineState, action: &GovernanceAction) -> Result<()> {
        match action {
            GovernanceAction::AddOwner { owner } => state.add_owner(*owner),
            GovernanceAction::RemoveOwner { owner } => state.remove_owner(*owner),
            GovernanceAction::SetQuorum { quorum } => state.set_quorum(*quorum),
            GovernanceAction::Identity(call) => {
                call.validate()?;
                call.apply(self.identities.as_ref(), self.anchor).await
            }
        }
    }

    async fn emit(&self, event: GovernanceEvent) {
        {
            let mut history = self.history.write().await;
            history.push_back(event.clone());
            while history.len() > self.history_limit {
                history.pop_front();
            }
        }

        // No subscribers is fine
        let _ = self.events_tx.send(event);
    }
}

/// Builder for [`GovernanceEngine`].
pub struct GovernanceEngineBuilder {
    config: Option<GovernanceConfig>,
    identities: Option<Arc<dyn IdentityRegistry>>,
    companies: Option<Arc<dyn CompanyRegistry>>,
}

impl GovernanceEngineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            identities: None,
            companies: None,
        }
    }

    /// Set the configuration.
    pub fn config(mut self, config: GovernanceConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the identity registry.
    pub fn identity_registry(mut self, registry: Arc<dyn IdentityRegistry>) -> Self {
        self.identities = Some(registry);
        self
    }

    /// Set the company registry.
    pub fn company_registry(mut self, registry: Arc<dyn CompanyRegistry>) -> Self {
        self.companies = Some(registry);
        self
    }

    /// Build the engine.
    pub fn build(self) -> Result<GovernanceEngine> {
        let config = self
            .config
            .ok_or_else(|| GovernanceError::Config("missing configuration".into()))?;
        config.validate()?;
        let identities = self
            .identities
            .ok_or_else(|| GovernanceError::Config("missing identity registry".into()))?;
        let companies = self
            .companies
            .ok_or_else(|| GovernanceError::Config("missing company registry".into()))?;

        if companies.governor() != config.anchor {
            return Err(GovernanceError::Config(format!(
                "company registry is governed by {}, not {}",
                companies.governor(),
                config.anchor
            )));
        }

        let (events_tx, _) = broadcast::channel(config.events.channel_capacity);
        info!(
            anchor = %config.anchor,
            owners = config.owners.len(),
            quorum = config.quorum,
            "Governance engine initialized"
        );

        Ok(GovernanceEngine {
            anchor: config.anchor,
            state: RwLock::new(EngineState {
                owners: config.owners,
                quorum: config.quorum,
                proposals: HashMap::new(),
                order: Vec::new(),
                nonce: 0,
            }),
            identities,
            companies,
            events_tx,
            history: RwLock::new(VecDeque::new()),
            history_limit: config.events.history_limit,
        })
    }
}

impl Default for GovernanceEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use did_registry::{InMemoryCompanyRegistry, InMemoryIdentityRegistry};

    const A: Address = Address::repeat_byte(0x01);
    const B: Address = Address::repeat_byte(0x02);
    const C: Address = Address::repeat_byte(0x03);
    const ANCHOR: Address = Address::repeat_byte(0xa0);

    fn engine_with(config: GovernanceConfig) -> GovernanceEngine {
        GovernanceEngine::builder()
            .config(config)
            .identity_registry(Arc::new(InMemoryIdentityRegistry::new()))
            .company_registry(Arc::new(InMemoryCompanyRegistry::new(ANCHOR)))
            .build()
            .unwrap()
    }

    fn engine() -> GovernanceEngine {
        engine_with(GovernanceConfig::new(ANCHOR, vec![A, B, C], 2))
    }

    #[tokio::test]
    async fn test_propose_is_not_an_approval() {
        let engine = engine();
        let id = engine.propose_quorum_update(A, 1).await.unwrap();

        let proposal = engine.proposal(id).await.unwrap();
        assert!(proposal.approvals.is_empty());
        assert!(proposal.requires_unanimity);
        assert!(!proposal.executed);
        assert_eq!(proposal.proposer, A);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_propose_or_approve() {
        let engine = engine();
        let outsider = Address::repeat_byte(0x09);

        let err = engine.propose_quorum_update(outsider, 1).await.unwrap_err();
        assert_eq!(err, GovernanceError::NotOwner(outsider));

        let id = engine.propose_quorum_update(A, 1).await.unwrap();
        let err = engine.approve(outsider, id).await.unwrap_err();
        assert_eq!(err, GovernanceError::NotOwner(outsider));
        assert!(engine.approvals(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_double_approval_rejected() {
        let engine = engine();
        let id = engine.propose_quorum_update(A, 1).await.unwrap();

        engine.approve(A, id).await.unwrap();
        let err = engine.approve(A, id).await.unwrap_err();
        assert_eq!(err, GovernanceError::AlreadyApproved { id, owner: A });
        assert_eq!(engine.approvals(id).await.unwrap(), vec![A]);
    }

    #[tokio::test]
    async fn test_identical_proposals_get_distinct_ids() {
        let engine = engine();
        let first = engine.propose_quorum_update(A, 1).await.unwrap();
        let second = engine.propose_quorum_update(A, 1).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(engine.proposals().await.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_proposal() {
        let engine = engine();
        let id = ProposalId::from_bytes([7; 32]);
        assert_eq!(
            engine.approve(A, id).await.unwrap_err(),
            GovernanceError::ProposalNotFound(id)
        );
        assert_eq!(
            engine.required_approvals(id).await.unwrap_err(),
            GovernanceError::ProposalNotFound(id)
        );
    }

    #[tokio::test]
    async fn test_propose_time_validation() {
        let engine = engine();
        assert_eq!(
            engine.propose_add_owner(A, B).await.unwrap_err(),
            GovernanceError::DuplicateOwner(B)
        );
        assert_eq!(
            engine.propose_add_owner(A, Address::ZERO).await.unwrap_err(),
            GovernanceError::InvalidAddress("owner")
        );
        let stranger = Address::repeat_byte(0x44);
        assert_eq!(
            engine.propose_remove_owner(A, stranger).await.unwrap_err(),
            GovernanceError::OwnerNotFound(stranger)
        );
        assert!(matches!(
            engine.propose_quorum_update(A, 0).await.unwrap_err(),
            GovernanceError::InvalidQuorum { quorum: 0, .. }
        ));
        assert!(engine.proposals().await.is_empty());
    }

    #[tokio::test]
    async fn test_target_approval_counts_toward_removal() {
        let engine = engine();
        let id = engine.propose_remove_owner(A, C).await.unwrap();

        engine.approve(A, id).await.unwrap();
        let outcome = engine.approve(C, id).await.unwrap();
        assert_eq!(outcome, ApprovalOutcome::Executed);
        assert_eq!(engine.owners().await, vec![A, B]);
    }

    #[tokio::test]
    async fn test_last_owner_cannot_be_removed() {
        let solo = engine_with(GovernanceConfig::new(ANCHOR, vec![A], 1));
        let id = solo.propose_remove_owner(A, A).await.unwrap();

        let outcome = solo.approve(A, id).await.unwrap();
        assert_eq!(
            outcome,
            ApprovalOutcome::ExecutionFailed {
                error: GovernanceError::LastOwner(A)
            }
        );
        assert_eq!(solo.owners().await, vec![A]);
        assert_eq!(solo.approvals(id).await.unwrap(), vec![A]);
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let mut config = GovernanceConfig::new(ANCHOR, vec![A, B, C], 2);
        config.events.history_limit = 2;
        let engine = engine_with(config);

        for _ in 0..3 {
            engine.propose_quorum_update(A, 1).await.unwrap();
        }
        assert_eq!(engine.events().await.len(), 2);
    }

    #[tokio::test]
    async fn test_builder_requires_collaborators() {
        let result = GovernanceEngine::builder()
            .config(GovernanceConfig::new(ANCHOR, vec![A], 1))
            .identity_registry(Arc::new(InMemoryIdentityRegistry::new()))
            .build();
        assert!(matches!(result, Err(GovernanceError::Config(_))));

        let result = GovernanceEngine::builder()
            .config(GovernanceConfig::new(ANCHOR, vec![A], 1))
            .identity_registry(Arc::new(InMemoryIdentityRegistry::new()))
            .company_registry(Arc::new(InMemoryCompanyRegistry::new(B)))
            .build();
        assert!(matches!(result, Err(GovernanceError::Config(_))));
    }
}
