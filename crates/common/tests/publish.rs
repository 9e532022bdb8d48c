//! Integration tests for pointer updates through the coordinator

mod common;

use bytes::Bytes;

use ::common::crypto::SecretKey;
use ::common::linked_data::ContentAddress;
use ::common::mutation::{MutationRequest, Operation};
use ::common::prelude::*;

/// Scenario: create at cid-1, publish cid-2 from version 1, then replay
///  the same request.
#[tokio::test]
async fn publish_then_replay_conflicts() {
    let sync = common::setup();
    let alice = SecretKey::generate();
    common::create_board(&sync, &alice, "b1", "cid-1").await;

    let update = common::signed_update(&alice, "b1", "cid-2", 1);
    let record = sync.publish_update(update.clone()).await.unwrap();
    assert_eq!(record.version, 2);
    assert_eq!(record.content_address, common::address("cid-2"));

    let err = sync.publish_update(update).await.unwrap_err();
    assert_eq!(
        err,
        SyncError::VersionConflict {
            board_id: common::board("b1"),
            expected: 1,
            current: 2,
        }
    );

    let stored = sync.get_board(&common::board("b1")).await.unwrap().unwrap();
    assert_eq!(stored, record);
}

#[tokio::test]
async fn versions_increase_by_one_per_publish() {
    let sync = common::setup();
    let alice = SecretKey::generate();
    let created = common::create_board(&sync, &alice, "b1", "cid-1").await;

    let mut previous = created.clone();
    for version in 1..=5u64 {
        let label = format!("cid-{}", version + 1);
        let record = sync
            .publish_update(common::signed_update(&alice, "b1", &label, version))
            .await
            .unwrap();

        assert_eq!(record.version, version + 1);
        assert_eq!(record.created_at, created.created_at);
        assert!(record.updated_at >= previous.updated_at);
        previous = record;
    }
}

#[tokio::test]
async fn invalid_signature_never_reaches_commit() {
    let sync = common::setup();
    let alice = SecretKey::generate();
    let mallory = SecretKey::generate();
    let before = common::create_board(&sync, &alice, "b1", "cid-1").await;

    let err = sync
        .publish_update(common::signed_update(&mallory, "b1", "cid-evil", 1))
        .await
        .unwrap_err();

    assert_eq!(err, SyncError::InvalidSignature(common::board("b1")));
    assert_eq!(
        sync.get_board(&common::board("b1")).await.unwrap(),
        Some(before)
    );
}

#[tokio::test]
async fn signature_for_another_version_is_invalid() {
    let sync = common::setup();
    let alice = SecretKey::generate();
    common::create_board(&sync, &alice, "b1", "cid-1").await;

    // signed against version 1, retargeted to version 2 by a relay
    let mut update = common::signed_update(&alice, "b1", "cid-2", 1);
    update.expected_version = 2;

    let err = sync.publish_update(update).await.unwrap_err();
    assert_eq!(err.kind(), "invalid_signature");
}

#[tokio::test]
async fn create_signature_cannot_be_replayed_as_update() {
    let sync = common::setup();
    let alice = SecretKey::generate();
    let create = common::signed_create(&alice, "b1", "cid-1");
    sync.create_board(create.clone()).await.unwrap();

    let replay = PublishUpdateRequest {
        board_id: create.board_id,
        expected_version: 1,
        new_content_address: create.initial_content_address,
        signature: create.signature,
    };
    let err = sync.publish_update(replay).await.unwrap_err();
    assert_eq!(err.kind(), "invalid_signature");
}

#[tokio::test]
async fn publish_to_missing_board() {
    let sync = common::setup();
    let alice = SecretKey::generate();

    let err = sync
        .publish_update(common::signed_update(&alice, "ghost", "cid-2", 1))
        .await
        .unwrap_err();
    assert_eq!(err, SyncError::NotFound(common::board("ghost")));
}

#[tokio::test]
async fn publish_content_stages_and_swaps() {
    let sync = common::setup();
    let alice = SecretKey::generate();
    common::create_board(&sync, &alice, "b1", "cid-1").await;

    let content = Bytes::from_static(b"{\"responses\":[\"more coffee\"]}");
    let address = ContentAddress::for_content(&content);
    let signed =
        MutationRequest::sign(&alice, Operation::Update, common::board("b1"), address, 1)
            .unwrap();

    let record = sync
        .publish_content(common::board("b1"), 1, content.clone(), signed.signature)
        .await
        .unwrap();

    assert_eq!(record.version, 2);
    assert_eq!(record.content_address, address);
    assert_eq!(sync.store().get(&address).unwrap(), Some(content));
}

#[tokio::test]
async fn oversized_content_is_malformed() {
    let sync = common::setup();
    let alice = SecretKey::generate();
    common::create_board(&sync, &alice, "b1", "cid-1").await;

    let content = Bytes::from(vec![
        7u8;
        ::common::content_store::MAX_CONTENT_SIZE_BYTES + 1
    ]);
    let err = sync
        .publish_content(common::board("b1"), 1, content, vec![0; 64])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "malformed_request");
    assert!(sync.store().is_empty());
}
