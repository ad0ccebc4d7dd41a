//! Governance actions and their classification.
//!
//! Every registry write the engine can perform is a variant here. The same
//! calls serve both the fast path ([`FastPathCall`]) and the vote path
//! ([`GovernanceAction`]); which tier a proposal needs is a direct match on
//! the variant.

use serde::{Deserialize, Serialize};
use tracing::debug;

use did_registry::{
    Address, AttributeCategory, CompanyRegistry, IdentityRegistry, OperationCategory,
};

use crate::types::{GovernanceError, Result};

/// Identity registry writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityCall {
    /// Transfer owner-of-record
    ChangeOwner { identity: Address, new_owner: Address },
    /// Set an attribute
    SetAttribute {
        identity: Address,
        name: String,
        value: Vec<u8>,
        validity_secs: u64,
    },
    /// Revoke an attribute
    RevokeAttribute {
        identity: Address,
        name: String,
        value: Vec<u8>,
    },
    /// Grant a delegate
    AddDelegate {
        identity: Address,
        delegate_type: String,
        delegate: Address,
        validity_secs: u64,
    },
    /// Revoke a delegate
    RevokeDelegate {
        identity: Address,
        delegate_type: String,
        delegate: Address,
    },
}

impl IdentityCall {
    /// Identity the call mutates.
    pub fn identity(&self) -> Address {
        match self {
            Self::ChangeOwner { identity, .. }
            | Self::SetAttribute { identity, .. }
            | Self::RevokeAttribute { identity, .. }
            | Self::AddDelegate { identity, .. }
            | Self::RevokeDelegate { identity, .. } => *identity,
        }
    }

    /// Capability needed to author the call.
    pub fn operation_category(&self) -> OperationCategory {
        match self {
            Self::ChangeOwner { .. } => OperationCategory::ChangeOwner,
            Self::SetAttribute { name, .. } | Self::RevokeAttribute { name, .. } => {
                OperationCategory::Attribute(AttributeCategory::of(name))
            }
            Self::AddDelegate { .. } | Self::RevokeDelegate { .. } => OperationCategory::Delegate,
        }
    }

    /// Reject calls with unusable addresses.
    pub fn validate(&self) -> Result<()> {
        if self.identity().is_zero() {
            return Err(GovernanceError::InvalidAddress("identity"));
        }
        match self {
            Self::ChangeOwner { new_owner, .. } if new_owner.is_zero() => {
                Err(GovernanceError::InvalidAddress("new owner"))
            }
            Self::AddDelegate { delegate, .. } | Self::RevokeDelegate { delegate, .. }
                if delegate.is_zero() =>
            {
                Err(GovernanceError::InvalidAddress("delegate"))
            }
            _ => Ok(()),
        }
    }

    /// Check the capability, then apply the call as `caller`.
    pub async fn apply(&self, registry: &dyn IdentityRegistry, caller: Address) -> Result<()> {
        let identity = self.identity();
        let category = self.operation_category();
        if !registry.can_author(caller, identity, category).await {
            return Err(GovernanceError::CapabilityDenied {
                caller,
                subject: identity,
                operation: self.name().to_string(),
            });
        }
        debug!(identity = %identity, call = self.name(), "Applying identity call");

        match self {
            Self::ChangeOwner {
                identity,
                new_owner,
            } => registry.change_owner(caller, *identity, *new_owner).await?,
            Self::SetAttribute {
                identity,
                name,
                value,
                validity_secs,
            } => {
                registry
                    .set_attribute(caller, *identity, name, value, *validity_secs)
                    .await?
            }
            Self::RevokeAttribute {
                identity,
                name,
                value,
            } => registry.revoke_attribute(caller, *identity, name, value).await?,
            Self::AddDelegate {
                identity,
                delegate_type,
                delegate,
                validity_secs,
            } => {
                registry
                    .add_delegate(caller, *identity, delegate_type, *delegate, *validity_secs)
                    .await?
            }
            Self::RevokeDelegate {
                identity,
                delegate_type,
                delegate,
            } => {
                registry
                    .revoke_delegate(caller, *identity, delegate_type, *delegate)
                    .await?
            }
        }
        Ok(())
    }

    /// Short operation name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChangeOwner { .. } => "change_owner",
            Self::SetAttribute { .. } => "set_attribute",
            Self::RevokeAttribute { .. } => "revoke_attribute",
            Self::AddDelegate { .. } => "add_delegate",
            Self::RevokeDelegate { .. } => "revoke_delegate",
        }
    }
}

/// Company registry writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyCall {
    /// Record company metadata
    RegisterCompany { company: Address, name: String },
    /// Grant admin rights
    AddCompanyAdmin { company: Address, admin: Address },
    /// Remove admin rights
    RemoveCompanyAdmin { company: Address, admin: Address },
    /// Publish a revocation pointer
    UpdateRevocationCid { company: Address, cid: String },
}

impl CompanyCall {
    /// Company the call mutates.
    pub fn company(&self) -> Address {
        match self {
            Self::RegisterCompany { company, .. }
            | Self::AddCompanyAdmin { company, .. }
            | Self::RemoveCompanyAdmin { company, .. }
            | Self::UpdateRevocationCid { company, .. } => *company,
        }
    }

    /// Capability needed to author the call.
    pub fn operation_category(&self) -> OperationCategory {
        match self {
            Self::RegisterCompany { .. } => OperationCategory::CompanyRegistration,
            Self::AddCompanyAdmin { .. } | Self::RemoveCompanyAdmin { .. } => {
                OperationCategory::CompanyAdmin
            }
            Self::UpdateRevocationCid { .. } => OperationCategory::RevocationPointer,
        }
    }

    /// Reject calls with unusable addresses.
    pub fn validate(&self) -> Result<()> {
        if self.company().is_zero() {
            return Err(GovernanceError::InvalidAddress("company"));
        }
        match self {
            Self::AddCompanyAdmin { admin, .. } | Self::RemoveCompanyAdmin { admin, .. }
                if admin.is_zero() =>
            {
                Err(GovernanceError::InvalidAddress("admin"))
            }
            _ => Ok(()),
        }
    }

    /// Check the capability, then apply the call as `caller`.
    pub async fn apply(&self, registry: &dyn CompanyRegistry, caller: Address) -> Result<()> {
        let company = self.company();
        let category = self.operation_category();
        if !registry.can_author(caller, company, category).await {
            return Err(GovernanceError::CapabilityDenied {
                caller,
                subject: company,
                operation: self.name().to_string(),
            });
        }
        debug!(company = %company, call = self.name(), "Applying company call");

        match self {
            Self::RegisterCompany { company, name } => {
                registry.register_company(caller, *company, name).await?
            }
            Self::AddCompanyAdmin { company, admin } => {
                registry.add_company_admin(caller, *company, *admin).await?
            }
            Self::RemoveCompanyAdmin { company, admin } => {
                registry.remove_company_admin(caller, *company, *admin).await?
            }
            Self::UpdateRevocationCid { company, cid } => {
                registry.update_revocation_cid(caller, *company, cid).await?
            }
        }
        Ok(())
    }

    /// Short operation name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterCompany { .. } => "register_company",
            Self::AddCompanyAdmin { .. } => "add_company_admin",
            Self::RemoveCompanyAdmin { .. } => "remove_company_admin",
            Self::UpdateRevocationCid { .. } => "update_revocation_cid",
        }
    }
}

/// Single-owner call against either registry.
///
/// The variant selects the target registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FastPathCall {
    Identity(IdentityCall),
    Company(CompanyCall),
}

impl FastPathCall {
    /// Identity or company the call mutates.
    pub fn target(&self) -> Address {
        match self {
            Self::Identity(call) => call.identity(),
            Self::Company(call) => call.company(),
        }
    }

    /// Short operation name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity(call) => call.name(),
            Self::Company(call) => call.name(),
        }
    }
}

impl From<IdentityCall> for FastPathCall {
    fn from(call: IdentityCall) -> Self {
        Self::Identity(call)
    }
}

impl From<CompanyCall> for FastPathCall {
    fn from(call: CompanyCall) -> Self {
        Self::Company(call)
    }
}

/// Approval tier of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalTier {
    /// `approvals >= quorum`
    Quorum,
    /// Every current owner (one fewer for owner removal)
    Unanimity,
}

/// Action carried by a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceAction {
    /// Add an owner
    AddOwner { owner: Address },
    /// Remove an owner
    RemoveOwner { owner: Address },
    /// Change the quorum
    SetQuorum { quorum: usize },
    /// Identity registry write
    Identity(IdentityCall),
}

impl GovernanceAction {
    /// Approval tier, fixed by the variant.
    pub fn tier(&self) -> ApprovalTier {
        match self {
            Self::AddOwner { .. }
            | Self::RemoveOwner { .. }
            | Self::SetQuorum { .. }
            | Self::Identity(IdentityCall::ChangeOwner { .. }) => ApprovalTier::Unanimity,
            Self::Identity(_) => ApprovalTier::Quorum,
        }
    }

    /// Whether the action is unanimity-tier.
    pub fn requires_unanimity(&self) -> bool {
        self.tier() == ApprovalTier::Unanimity
    }

    /// Approvals needed against the current owner count and quorum.
    pub fn required_approvals(&self, owner_count: usize, quorum: usize) -> usize {
        let required = match (self.tier(), self) {
            (ApprovalTier::Quorum, _) => quorum,
            (ApprovalTier::Unanimity, Self::RemoveOwner { .. }) => owner_count.saturating_sub(1),
            (ApprovalTier::Unanimity, _) => owner_count,
        };
        required.max(1)
    }

    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddOwner { .. } => "add_owner",
            Self::RemoveOwner { .. } => "remove_owner",
            Self::SetQuorum { .. } => "set_quorum",
            Self::Identity(call) => call.name(),
        }
    }
}
