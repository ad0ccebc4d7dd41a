//! Trust Anchor - Owner-quorum governance engine
//!
//! A fixed set of owners jointly governs the Trust Anchor identity and
//! manages the company identities it holds:
//!
//! - **Fast path**: any single owner writes to a company identity or the
//!   company registry immediately (`exec_call`)
//! - **Quorum tier**: attribute and delegate writes on the Trust Anchor
//!   identity need `quorum` approvals
//! - **Unanimity tier**: owner set, quorum and ownership changes need every
//!   current owner (one fewer for a removal)
//! - **Self-protection**: the Trust Anchor identity is never reachable
//!   through the fast path
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     GovernanceEngine                        │
//! │                                                             │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────┐                │
//! │  │ Propose  │──▶│ Approve  │──▶│ Execute  │──┐             │
//! │  └──────────┘   └──────────┘   └──────────┘  │             │
//! │                                               │             │
//! │  ┌──────────┐                                 │             │
//! │  │ execCall │─────────────────────────────────┤             │
//! │  └──────────┘                                 │             │
//! └───────────────────────────────────────────────┼─────────────┘
//!                            ┌──────────────────┴─────────┐
//!                    ┌───────▼────────┐          ┌────────▼───────┐
//!                    │    Identity    │          │    Company     │
//!                    │    Registry    │          │    Registry    │
//!                    └────────────────┘          └────────────────┘
//! ```

pub mod action;
pub mod config;
pub mod encoding;
pub mod engine;
pub mod types;

// Re-export main types
pub use action::{ApprovalTier, CompanyCall, FastPathCall, GovernanceAction, IdentityCall};
pub use config::{EventConfig, GovernanceConfig};
pub use engine::{GovernanceEngine, GovernanceEngineBuilder};
pub use types::*;
