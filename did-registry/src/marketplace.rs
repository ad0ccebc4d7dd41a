//! Digital asset marketplace.
//!
//! A single-owner publication log. Each published asset gets the next
//! sequential id and records which identity owns it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{RegistryError, Result};
use crate::types::Address;

/// Emitted for every published asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPublished {
    pub asset_id: u64,
    pub data: String,
    pub asset_owner: Address,
}

#[derive(Debug, Default)]
struct MarketplaceState {
    owner: Address,
    next_asset_id: u64,
    asset_owners: HashMap<u64, Address>,
    events: Vec<DataPublished>,
}

/// Marketplace that only its owner may publish to.
#[derive(Debug)]
pub struct AssetMarketplace {
    state: RwLock<MarketplaceState>,
}

impl AssetMarketplace {
    /// Create a marketplace owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            state: RwLock::new(MarketplaceState {
                owner,
                ..Default::default()
            }),
        }
    }

    /// Current owner.
    pub async fn owner(&self) -> Address {
        self.state.read().await.owner
    }

    /// Transfer ownership. Caller must be the current owner.
    pub async fn set_owner(&self, caller: Address, new_owner: Address) -> Result<()> {
        if new_owner.is_zero() {
            return Err(RegistryError::InvalidAddress("owner"));
        }
        let mut state = self.state.write().await;
        if caller != state.owner {
            return Err(RegistryError::NotMarketplaceOwner { caller });
        }
        state.owner = new_owner;
        info!(owner = %new_owner, "Marketplace owner changed");
        Ok(())
    }

    /// Publish an asset and return its id.
    pub async fn publish_data(
        &self,
        caller: Address,
        data: &str,
        asset_owner: Address,
    ) -> Result<u64> {
        let mut state = self.state.write().await;
        if caller != state.owner {
            return Err(RegistryError::NotMarketplaceOwner { caller });
        }

        let asset_id = state.next_asset_id;
        state.next_asset_id += 1;
        state.asset_owners.insert(asset_id, asset_owner);
        state.events.push(DataPublished {
            asset_id,
            data: data.to_string(),
            asset_owner,
        });

        info!(asset_id, asset_owner = %asset_owner, "Data published");
        Ok(asset_id)
    }

    /// Owner of a published asset.
    pub async fn asset_owner(&self, asset_id: u64) -> Option<Address> {
        self.state.read().await.asset_owners.get(&asset_id).copied()
    }

    /// Every publication in order.
    pub async fn events(&self) -> Vec<DataPublished> {
        self.state.read().await.events.clone()
    }
}
