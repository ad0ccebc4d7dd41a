//! DID Registry - Identity and company revocation stores
//!
//! The collaborators a Trust Anchor governs:
//!
//! - **Identity registry**: owner-of-record, timed attributes and delegate
//!   grants per identity (ERC-1056 semantics)
//! - **Company registry**: per-company admin set and published revocation
//!   list pointer
//! - **Asset marketplace**: single-owner publication log
//! - **Capability queries**: `can_author` on both registries so callers can
//!   check a write before attempting it
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   Trust Anchor                       │
//! └───────┬──────────────────┬──────────────────┬────────┘
//!         │ owner            │ governor         │ owner
//! ┌───────▼────────┐ ┌───────▼────────┐ ┌───────▼────────┐
//! │    Identity    │ │    Company     │ │     Asset      │
//! │    Registry    │ │    Registry    │ │  Marketplace   │
//! └────────────────┘ └───────┬────────┘ └────────────────┘
//!                            │ admin
//!                    ┌───────▼────────┐
//!                    │ Company admins │
//!                    └────────────────┘
//! ```

pub mod clock;
pub mod company;
pub mod error;
pub mod identity;
pub mod marketplace;
pub mod types;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use company::{
    ipfs_uri, CompanyEvent, CompanyRecord, CompanyRegistry, InMemoryCompanyRegistry,
    RevocationEndpoint, REVOCATION_ATTRIBUTE, REVOCATION_LOOKUP_FUNCTION,
};
pub use error::{RegistryError, Result};
pub use identity::{IdentityEvent, IdentityRegistry, InMemoryIdentityRegistry};
pub use marketplace::{AssetMarketplace, DataPublished};
pub use types::*;
