//! Shared fixture for engine integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use did_registry::{
    Address, IdentityRegistry, InMemoryCompanyRegistry, InMemoryIdentityRegistry, ManualClock,
};
use trust_anchor::{GovernanceConfig, GovernanceEngine};

pub const A: Address = Address::repeat_byte(0x01);
pub const B: Address = Address::repeat_byte(0x02);
pub const C: Address = Address::repeat_byte(0x03);
pub const D: Address = Address::repeat_byte(0x04);
pub const OUTSIDER: Address = Address::repeat_byte(0x0f);
pub const ANCHOR: Address = Address::repeat_byte(0xa0);
pub const COMPANY: Address = Address::repeat_byte(0xc0);
pub const ADMIN: Address = Address::repeat_byte(0xd1);

pub const START: u64 = 1_700_000_000;
pub const DAY: u64 = 86_400;

pub struct Fixture {
    pub engine: GovernanceEngine,
    pub identities: Arc<InMemoryIdentityRegistry>,
    pub companies: Arc<InMemoryCompanyRegistry>,
    pub clock: Arc<ManualClock>,
}

/// Owners {A, B, C}, quorum 2, COMPANY held by the anchor.
pub async fn fixture() -> Fixture {
    fixture_with(vec![A, B, C], 2).await
}

pub async fn fixture_with(owners: Vec<Address>, quorum: usize) -> Fixture {
    let clock = Arc::new(ManualClock::new(START));
    let identities = Arc::new(InMemoryIdentityRegistry::with_clock(clock.clone()));
    let companies = Arc::new(
        InMemoryCompanyRegistry::new(ANCHOR).with_identity_registry(identities.clone()),
    );

    // The company hands its identity to the Trust Anchor
    identities
        .change_owner(COMPANY, COMPANY, ANCHOR)
        .await
        .expect("company transfers ownership");

    let engine = GovernanceEngine::builder()
        .config(GovernanceConfig::new(ANCHOR, owners, quorum))
        .identity_registry(identities.clone())
        .company_registry(companies.clone())
        .build()
        .expect("valid engine");

    Fixture {
        engine,
        identities,
        companies,
        clock,
    }
}
