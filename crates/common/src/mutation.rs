//! Mutation requests and the canonical bytes a wallet signs.
//!
//! The signed message binds every field that determines the effect of a
//! mutation: which operation, by whom, on which board, installing which
//! content, on top of which version. Including `expected_version` makes a
//! signature single-use: once the board moves past that version, replaying
//! the same request can only produce a version conflict.

use serde::{Deserialize, Serialize};

use crate::board::{BoardId, INITIAL_VERSION};
use crate::crypto::{PublicKey, SecretKey, SignatureVerifier, PUBLIC_KEY_SIZE};
use crate::linked_data::ContentAddress;

/// Domain separator, so a board signature is never valid for
///  anything else the same wallet signs
pub const SIGNING_DOMAIN: &str = "feedboard/mutation/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// First publish of a board
    Create,
    /// Pointer swap on an existing board
    Update,
}

#[derive(Serialize)]
struct SignedPayload<'a> {
    domain: &'a str,
    operation: Operation,
    owner: [u8; PUBLIC_KEY_SIZE],
    board_id: &'a str,
    content_address: Vec<u8>,
    expected_version: u64,
}

/// Canonical encoding of a mutation intent.
///
/// `bincode` with its default configuration (fixed-width little endian
///  integers, length-prefixed strings) is deterministic for this payload.
pub fn signed_message(
    operation: Operation,
    owner: &PublicKey,
    board_id: &BoardId,
    content_address: &ContentAddress,
    expected_version: u64,
) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(&SignedPayload {
        domain: SIGNING_DOMAIN,
        operation,
        owner: owner.to_bytes(),
        board_id: board_id.as_str(),
        content_address: content_address.to_bytes(),
        expected_version,
    })
}

/// A mutation as it is authenticated. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRequest {
    pub operation: Operation,
    pub owner: PublicKey,
    pub board_id: BoardId,
    pub new_content_address: ContentAddress,
    pub expected_version: u64,
    pub signature: Vec<u8>,
}

impl MutationRequest {
    /// A creation request. Creation is signed against the registry's
    ///  initial version.
    pub fn create(
        owner: PublicKey,
        board_id: BoardId,
        initial_content_address: ContentAddress,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            operation: Operation::Create,
            owner,
            board_id,
            new_content_address: initial_content_address,
            expected_version: INITIAL_VERSION,
            signature,
        }
    }

    pub fn update(
        owner: PublicKey,
        board_id: BoardId,
        new_content_address: ContentAddress,
        expected_version: u64,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            operation: Operation::Update,
            owner,
            board_id,
            new_content_address,
            expected_version,
            signature,
        }
    }

    /// Build and sign a request with a wallet key. The owner is the
    ///  key's public half.
    pub fn sign(
        secret: &SecretKey,
        operation: Operation,
        board_id: BoardId,
        new_content_address: ContentAddress,
        expected_version: u64,
    ) -> Result<Self, bincode::Error> {
        let owner = secret.public();
        let message = signed_message(
            operation,
            &owner,
            &board_id,
            &new_content_address,
            expected_version,
        )?;
        let signature = secret.sign(&message).to_bytes().to_vec();
        Ok(Self {
            operation,
            owner,
            board_id,
            new_content_address,
            expected_version,
            signature,
        })
    }

    pub fn signed_message(&self) -> Result<Vec<u8>, bincode::Error> {
        signed_message(
            self.operation,
            &self.owner,
            &self.board_id,
            &self.new_content_address,
            self.expected_version,
        )
    }

    pub fn verify<V: SignatureVerifier>(&self, verifier: &V) -> bool {
        match self.signed_message() {
            Ok(message) => verifier.verify(&message, &self.owner.to_bytes(), &self.signature),
            Err(_) => false,
        }
    }
}
