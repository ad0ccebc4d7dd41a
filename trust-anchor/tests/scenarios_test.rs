//! End-to-end governance scenarios with owners {A, B, C} and quorum 2.

mod common;

use common::*;
use did_registry::{IdentityRegistry, REVOCATION_ATTRIBUTE};
use tokio_test::{assert_err, assert_ok};
use trust_anchor::{ApprovalOutcome, FastPathCall, GovernanceError, IdentityCall};

fn set_service_attribute(identity: did_registry::Address, value: &[u8]) -> FastPathCall {
    FastPathCall::Identity(IdentityCall::SetAttribute {
        identity,
        name: REVOCATION_ATTRIBUTE.to_string(),
        value: value.to_vec(),
        validity_secs: 365 * DAY,
    })
}

#[tokio::test]
async fn test_fast_path_updates_company_immediately() {
    let f = fixture().await;

    assert_ok!(
        f.engine
            .exec_call(A, set_service_attribute(COMPANY, b"ipfs://QmCompany"))
            .await
    );

    assert_eq!(
        f.identities.attribute(COMPANY, REVOCATION_ATTRIBUTE).await,
        Some(b"ipfs://QmCompany".to_vec())
    );
    assert!(f.engine.proposals().await.is_empty());
    assert!(f.engine.events().await.is_empty());
}

#[tokio::test]
async fn test_fast_path_refuses_anchor_identity() {
    let f = fixture().await;

    let err = assert_err!(
        f.engine
            .exec_call(A, set_service_attribute(ANCHOR, b"ipfs://QmAnchor"))
            .await
    );
    assert_eq!(err, GovernanceError::SelfTargetRequiresProposal(ANCHOR));
    assert_eq!(f.identities.attribute(ANCHOR, REVOCATION_ATTRIBUTE).await, None);
    assert_eq!(f.identities.changed(ANCHOR).await, 0);
}

#[tokio::test]
async fn test_anchor_attribute_needs_quorum() {
    let f = fixture().await;

    let id = assert_ok!(
        f.engine
            .propose_set_attribute_on_anchor(A, REVOCATION_ATTRIBUTE, b"ipfs://QmAnchor".to_vec(), DAY)
            .await
    );
    let proposal = f.engine.proposal(id).await.unwrap();
    assert!(!proposal.requires_unanimity);

    let outcome = assert_ok!(f.engine.approve(A, id).await);
    assert_eq!(
        outcome,
        ApprovalOutcome::Pending {
            approvals: 1,
            required: 2
        }
    );
    assert!(!f.engine.proposal(id).await.unwrap().executed);
    assert_eq!(f.identities.attribute(ANCHOR, REVOCATION_ATTRIBUTE).await, None);

    let outcome = assert_ok!(f.engine.approve(B, id).await);
    assert_eq!(outcome, ApprovalOutcome::Executed);
    assert!(f.engine.proposal(id).await.unwrap().executed);
    assert_eq!(
        f.identities.attribute(ANCHOR, REVOCATION_ATTRIBUTE).await,
        Some(b"ipfs://QmAnchor".to_vec())
    );
}

#[tokio::test]
async fn test_add_owner_needs_every_owner() {
    let f = fixture().await;

    let id = assert_ok!(f.engine.propose_add_owner(A, D).await);
    assert!(f.engine.proposal(id).await.unwrap().requires_unanimity);

    assert_ok!(f.engine.approve(A, id).await);
    let outcome = assert_ok!(f.engine.approve(B, id).await);
    assert_eq!(
        outcome,
        ApprovalOutcome::Pending {
            approvals: 2,
            required: 3
        }
    );
    assert_eq!(f.engine.owners().await, vec![A, B, C]);
    assert!(!f.engine.is_owner(D).await);

    let outcome = assert_ok!(f.engine.approve(C, id).await);
    assert_eq!(outcome, ApprovalOutcome::Executed);
    assert!(f.engine.is_owner(D).await);
    assert_eq!(f.engine.owners().await, vec![A, B, C, D]);
}

#[tokio::test]
async fn test_remove_owner_without_target_approval() {
    let f = fixture().await;

    let id = assert_ok!(f.engine.propose_remove_owner(A, C).await);
    assert_eq!(assert_ok!(f.engine.required_approvals(id).await), 2);

    assert_ok!(f.engine.approve(A, id).await);
    assert!(f.engine.is_owner(C).await);

    let outcome = assert_ok!(f.engine.approve(B, id).await);
    assert_eq!(outcome, ApprovalOutcome::Executed);
    assert!(!f.engine.is_owner(C).await);
    assert_eq!(f.engine.owners().await, vec![A, B]);
    assert_eq!(f.engine.quorum().await, 2);
}

#[tokio::test]
async fn test_quorum_above_owner_count_rejected_on_execution() {
    let f = fixture().await;

    let id = assert_ok!(f.engine.propose_quorum_update(A, 5).await);
    assert_ok!(f.engine.approve(A, id).await);
    assert_ok!(f.engine.approve(B, id).await);
    let outcome = assert_ok!(f.engine.approve(C, id).await);

    assert_eq!(
        outcome,
        ApprovalOutcome::ExecutionFailed {
            error: GovernanceError::InvalidQuorum {
                quorum: 5,
                owners: 3
            }
        }
    );
    assert_eq!(f.engine.quorum().await, 2);

    let proposal = f.engine.proposal(id).await.unwrap();
    assert!(!proposal.executed);
    assert_eq!(proposal.approvals, vec![A, B, C]);
}
