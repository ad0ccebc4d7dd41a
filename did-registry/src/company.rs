//! Company revocation registry.
//!
//! The Trust Anchor (the registry's governor) decides who may administer
//! each company. Company admins then publish the content identifier of the
//! company's current credential revocation list without further approval.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{RegistryError, Result};
use crate::identity::IdentityRegistry;
use crate::types::{Address, OperationCategory};

/// Attribute name under which a company's revocation endpoint is published.
pub const REVOCATION_ATTRIBUTE: &str = "did/svc/CredentialRevocationList";

/// Registry read function a verifier calls to resolve the current pointer.
pub const REVOCATION_LOOKUP_FUNCTION: &str = "getRevocationCID";

/// Company registry surface consumed by the governance engine.
#[async_trait]
pub trait CompanyRegistry: Send + Sync {
    /// The principal allowed to register companies and manage admins.
    fn governor(&self) -> Address;

    /// Record company metadata. Caller must be the governor.
    async fn register_company(&self, caller: Address, company: Address, name: &str) -> Result<()>;

    /// Company metadata, if registered.
    async fn company(&self, company: Address) -> Option<CompanyRecord>;

    /// Grant admin rights. Caller must be the governor.
    async fn add_company_admin(&self, caller: Address, company: Address, admin: Address)
        -> Result<()>;

    /// Remove admin rights. Caller must be the governor.
    async fn remove_company_admin(
        &self,
        caller: Address,
        company: Address,
        admin: Address,
    ) -> Result<()>;

    /// Whether `admin` may publish for `company`.
    async fn is_company_admin(&self, company: Address, admin: Address) -> bool;

    /// Admins of `company` in the order they were added.
    async fn company_admins(&self, company: Address) -> Vec<Address>;

    /// Publish a new revocation pointer. Caller must be a company admin.
    async fn update_revocation_cid(&self, caller: Address, company: Address, cid: &str)
        -> Result<()>;

    /// Current revocation pointer, if one was ever published.
    async fn revocation_cid(&self, company: Address) -> Option<String>;

    /// Whether a write of `category` by `caller` for `company` would be accepted.
    async fn can_author(&self, caller: Address, company: Address, category: OperationCategory)
        -> bool;
}

/// Company metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Company identity
    pub company: Address,
    /// Display name
    pub name: String,
    /// Trust anchor that registered the company
    pub trust_anchor: Address,
    /// Whether the company is active
    pub active: bool,
    /// When the company was registered
    pub registered_at: DateTime<Utc>,
}

/// An entry in the company registry's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CompanyEvent {
    /// Company metadata recorded
    CompanyRegistered { company: Address, name: String },
    /// Admin granted
    AdminAdded { company: Address, admin: Address },
    /// Admin removed
    AdminRemoved { company: Address, admin: Address },
    /// Revocation pointer published
    RevocationCidUpdated { company: Address, cid: String },
}

/// In-memory [`CompanyRegistry`].
pub struct InMemoryCompanyRegistry {
    /// Governor (the Trust Anchor identity)
    governor: Address,
    /// Identity registry used to check company ownership on registration
    identities: Option<Arc<dyn IdentityRegistry>>,
    /// Registered company metadata
    companies: DashMap<Address, CompanyRecord>,
    /// Admins per company
    admins: DashMap<Address, Vec<Address>>,
    /// Revocation pointers per company
    cids: DashMap<Address, String>,
    /// Event log
    events: RwLock<Vec<CompanyEvent>>,
}

impl InMemoryCompanyRegistry {
    /// Create a registry governed by `governor`.
    pub fn new(governor: Address) -> Self {
        Self {
            governor,
            identities: None,
            companies: DashMap::new(),
            admins: DashMap::new(),
            cids: DashMap::new(),
            events: RwLock::new(Vec::new()),
        }
    }

    /// Check company ownership against an identity registry on registration.
    pub fn with_identity_registry(mut self, identities: Arc<dyn IdentityRegistry>) -> Self {
        self.identities = Some(identities);
        self
    }

    /// Full event log in write order.
    pub async fn events(&self) -> Vec<CompanyEvent> {
        self.events.read().await.clone()
    }

    fn require_governor(&self, caller: Address) -> Result<()> {
        if caller != self.governor {
            return Err(RegistryError::NotGovernor { caller });
        }
        Ok(())
    }

    async fn emit(&self, event: CompanyEvent) {
        self.events.write().await.push(event);
    }
}

#[async_trait]
impl CompanyRegistry for InMemoryCompanyRegistry {
    fn governor(&self) -> Address {
        self.governor
    }

    async fn register_company(&self, caller: Address, company: Address, name: &str) -> Result<()> {
        if company.is_zero() {
            return Err(RegistryError::InvalidAddress("company"));
        }
        self.require_governor(caller)?;

        if let Some(identities) = &self.identities {
            if identities.identity_owner(company).await != self.governor {
                return Err(RegistryError::IdentityNotHeld(company));
            }
        }

        match self.companies.entry(company) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(RegistryError::CompanyExists(company));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(CompanyRecord {
                    company,
                    name: name.to_string(),
                    trust_anchor: self.governor,
                    active: true,
                    registered_at: Utc::now(),
                });
            }
        }

        self.emit(CompanyEvent::CompanyRegistered {
            company,
            name: name.to_string(),
        })
        .await;
        info!(company = %company, name = %name, "Company registered");
        Ok(())
    }

    async fn company(&self, company: Address) -> Option<CompanyRecord> {
        self.companies.get(&company).map(|r| r.value().clone())
    }

    async fn add_company_admin(
        &self,
        caller: Address,
        company: Address,
        admin: Address,
    ) -> Result<()> {
        if company.is_zero() {
            return Err(RegistryError::InvalidAddress("company"));
        }
        if admin.is_zero() {
            return Err(RegistryError::InvalidAddress("admin"));
        }
        self.require_governor(caller)?;

        {
            let mut admins = self.admins.entry(company).or_default();
            if admins.contains(&admin) {
                return Ok(());
            }
            admins.push(admin);
        }

        self.emit(CompanyEvent::AdminAdded { company, admin }).await;
        info!(company = %company, admin = %admin, "Company admin added");
        Ok(())
    }

    async fn remove_company_admin(
        &self,
        caller: Address,
        company: Address,
        admin: Address,
    ) -> Result<()> {
        if admin.is_zero() {
            return Err(RegistryError::InvalidAddress("admin"));
        }
        self.require_governor(caller)?;

        let removed = self
            .admins
            .get_mut(&company)
            .map(|mut admins| {
                let before = admins.len();
                admins.retain(|a| *a != admin);
                admins.len() < before
            })
            .unwrap_or(false);
        if !removed {
            return Err(RegistryError::AdminNotFound { company, admin });
        }

        self.emit(CompanyEvent::AdminRemoved { company, admin }).await;
        info!(company = %company, admin = %admin, "Company admin removed");
        Ok(())
    }

    async fn is_company_admin(&self, company: Address, admin: Address) -> bool {
        self.admins
            .get(&company)
            .map(|admins| admins.contains(&admin))
            .unwrap_or(false)
    }

    async fn company_admins(&self, company: Address) -> Vec<Address> {
        self.admins
            .get(&company)
            .map(|admins| admins.value().clone())
            .unwrap_or_default()
    }

    async fn update_revocation_cid(
        &self,
        caller: Address,
        company: Address,
        cid: &str,
    ) -> Result<()> {
        if !self.is_company_admin(company, caller).await {
            return Err(RegistryError::OnlyCompanyAdmin { company, caller });
        }
        if cid.is_empty() {
            return Err(RegistryError::EmptyCid);
        }

        self.cids.insert(company, cid.to_string());
        self.emit(CompanyEvent::RevocationCidUpdated {
            company,
            cid: cid.to_string(),
        })
        .await;
        info!(company = %company, cid = %cid, "Revocation CID updated");
        Ok(())
    }

    async fn revocation_cid(&self, company: Address) -> Option<String> {
        self.cids.get(&company).map(|cid| cid.value().clone())
    }

    async fn can_author(
        &self,
        caller: Address,
        company: Address,
        category: OperationCategory,
    ) -> bool {
        match category {
            OperationCategory::CompanyAdmin | OperationCategory::CompanyRegistration => {
                caller == self.governor
            }
            OperationCategory::RevocationPointer => self.is_company_admin(company, caller).await,
            _ => false,
        }
    }
}

/// Service-endpoint document that points verifiers at the registry.
///
/// Stored once on a company identity under [`REVOCATION_ATTRIBUTE`]. A
/// verifier reads it, substitutes the company identity into `params`, and
/// calls `function` on `registry` to get the current pointer. Later CID
/// updates therefore need no further identity writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationEndpoint {
    /// Registry holding the pointer
    #[serde(rename = "contract")]
    pub registry: Address,
    /// Chain the registry lives on
    pub chain_id: u64,
    /// Read function to call
    pub function: String,
    /// Call parameters; `{{identity}}` is replaced by the company identity
    pub params: Vec<String>,
}

impl RevocationEndpoint {
    /// Endpoint for `registry` on `chain_id`.
    pub fn new(registry: Address, chain_id: u64) -> Self {
        Self {
            registry,
            chain_id,
            function: REVOCATION_LOOKUP_FUNCTION.to_string(),
            params: vec!["{{identity}}".to_string()],
        }
    }

    /// Attribute value to store on the company identity.
    pub fn to_attribute_value(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Parse a stored attribute value.
    pub fn from_attribute_value(value: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(value)
    }
}

/// `ipfs://` URI for a revocation list CID.
pub fn ipfs_uri(cid: &str) -> String {
    format!("ipfs://{}", cid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::InMemoryIdentityRegistry;

    fn governor() -> Address {
        Address::repeat_byte(0xa0)
    }

    fn company() -> Address {
        Address::repeat_byte(0xc0)
    }

    fn admin1() -> Address {
        Address::repeat_byte(0x01)
    }

    fn admin2() -> Address {
        Address::repeat_byte(0x02)
    }

    #[tokio::test]
    async fn test_only_governor_manages_admins() {
        let registry = InMemoryCompanyRegistry::new(governor());

        let err = registry
            .add_company_admin(admin1(), company(), admin1())
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::NotGovernor { caller: admin1() });
        assert!(!registry.is_company_admin(company(), admin1()).await);

        registry
            .add_company_admin(governor(), company(), admin1())
            .await
            .unwrap();
        assert!(registry.is_company_admin(company(), admin1()).await);
    }

    #[tokio::test]
    async fn test_multiple_admins_last_write_wins() {
        let registry = InMemoryCompanyRegistry::new(governor());
        registry
            .add_company_admin(governor(), company(), admin1())
            .await
            .unwrap();
        registry
            .add_company_admin(governor(), company(), admin2())
            .await
            .unwrap();
        assert_eq!(registry.company_admins(company()).await, vec![admin1(), admin2()]);

        registry
            .update_revocation_cid(admin1(), company(), "QmCID1")
            .await
            .unwrap();
        registry
            .update_revocation_cid(admin2(), company(), "QmCID2")
            .await
            .unwrap();
        assert_eq!(
            registry.revocation_cid(company()).await.as_deref(),
            Some("QmCID2")
        );
    }

    #[tokio::test]
    async fn test_removed_admin_cannot_publish() {
        let registry = InMemoryCompanyRegistry::new(governor());
        registry
            .add_company_admin(governor(), company(), admin1())
            .await
            .unwrap();
        registry
            .update_revocation_cid(admin1(), company(), "QmBeforeRemoval")
            .await
            .unwrap();

        registry
            .remove_company_admin(governor(), company(), admin1())
            .await
            .unwrap();
        let err = registry
            .update_revocation_cid(admin1(), company(), "QmAfterRemoval")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("OnlyCompanyAdmin"));
        assert_eq!(
            registry.revocation_cid(company()).await.as_deref(),
            Some("QmBeforeRemoval")
        );

        let err = registry
            .remove_company_admin(governor(), company(), admin1())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::AdminNotFound { .. }));
    }

    #[tokio::test]
    async fn test_cid_update_emits_event() {
        let registry = InMemoryCompanyRegistry::new(governor());
        registry
            .add_company_admin(governor(), company(), admin1())
            .await
            .unwrap();
        registry
            .update_revocation_cid(admin1(), company(), "QmEventTest")
            .await
            .unwrap();

        let events = registry.events().await;
        assert_eq!(
            events.last(),
            Some(&CompanyEvent::RevocationCidUpdated {
                company: company(),
                cid: "QmEventTest".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_register_company_checks_identity_owner() {
        let identities = Arc::new(InMemoryIdentityRegistry::new());
        let registry =
            InMemoryCompanyRegistry::new(governor()).with_identity_registry(identities.clone());

        let err = registry
            .register_company(governor(), company(), "Test Company Ltd")
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::IdentityNotHeld(company()));

        identities
            .change_owner(company(), company(), governor())
            .await
            .unwrap();
        registry
            .register_company(governor(), company(), "Test Company Ltd")
            .await
            .unwrap();

        let record = registry.company(company()).await.unwrap();
        assert_eq!(record.name, "Test Company Ltd");
        assert_eq!(record.trust_anchor, governor());
        assert!(record.active);

        let err = registry
            .register_company(governor(), company(), "Another Name")
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::CompanyExists(company()));

        let err = registry
            .register_company(governor(), Address::ZERO, "Test")
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::InvalidAddress("company"));
    }

    #[test]
    fn test_revocation_endpoint_document() {
        let endpoint = RevocationEndpoint::new(Address::repeat_byte(0x11), 31337);
        let value = endpoint.to_attribute_value().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&value).unwrap();
        assert_eq!(json["function"], "getRevocationCID");
        assert_eq!(json["chainId"], 31337);
        assert_eq!(json["contract"], Address::repeat_byte(0x11).to_string());
        assert_eq!(RevocationEndpoint::from_attribute_value(&value).unwrap(), endpoint);
        assert_eq!(ipfs_uri("QmTest"), "ipfs://QmTest");
    }
}
