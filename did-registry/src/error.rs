//! Registry error types.

use crate::types::Address;

/// Errors returned by registry writes.
///
/// A failed write never leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Caller is not the owner-of-record of the identity
    #[error("Not authorized: {caller} is not the owner of {identity}")]
    NotIdentityOwner { identity: Address, caller: Address },

    /// Caller may not write this attribute
    #[error("Not authorized to set this attribute: {name} on {identity}")]
    AttributeNotAuthorized { identity: Address, name: String },

    /// Zero or otherwise unusable address
    #[error("Invalid {0} address")]
    InvalidAddress(&'static str),

    /// No live attribute record matches
    #[error("Attribute {name} not found on {identity}")]
    AttributeNotFound { identity: Address, name: String },

    /// No live delegate grant matches
    #[error("Delegate {delegate} of type {delegate_type} not found on {identity}")]
    DelegateNotFound {
        identity: Address,
        delegate_type: String,
        delegate: Address,
    },

    /// Caller is not the registry governor
    #[error("Not authorized: {caller} is not the registry governor")]
    NotGovernor { caller: Address },

    /// Caller is not an admin of the company
    #[error("OnlyCompanyAdmin: {caller} is not an admin of {company}")]
    OnlyCompanyAdmin { company: Address, caller: Address },

    /// Admin to remove is not registered
    #[error("Admin {admin} not found for company {company}")]
    AdminNotFound { company: Address, admin: Address },

    /// Company already registered
    #[error("Company already exists: {0}")]
    CompanyExists(Address),

    /// Governor does not own the company identity
    #[error("Trust anchor does not own this DID: {0}")]
    IdentityNotHeld(Address),

    /// Caller is not the marketplace owner
    #[error("Not the owner: {caller}")]
    NotMarketplaceOwner { caller: Address },

    /// Empty revocation pointer
    #[error("Revocation CID must not be empty")]
    EmptyCid,
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
