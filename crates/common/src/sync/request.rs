use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

use crate::board::BoardId;
use crate::crypto::PublicKey;
use crate::linked_data::ContentAddress;
use crate::mutation::MutationRequest;

/// First publish of a board. The signature covers a `create`
///  operation against the initial version.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBoardRequest {
    pub owner: PublicKey,
    pub board_id: BoardId,
    pub initial_content_address: ContentAddress,
    #[serde_as(as = "Hex")]
    pub signature: Vec<u8>,
}

impl From<MutationRequest> for CreateBoardRequest {
    fn from(request: MutationRequest) -> Self {
        Self {
            owner: request.owner,
            board_id: request.board_id,
            initial_content_address: request.new_content_address,
            signature: request.signature,
        }
    }
}

/// Pointer swap on an existing board. The owner is not carried: the
///  signature is checked against the owner on record.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishUpdateRequest {
    pub board_id: BoardId,
    pub expected_version: u64,
    pub new_content_address: ContentAddress,
    #[serde_as(as = "Hex")]
    pub signature: Vec<u8>,
}

impl From<MutationRequest> for PublishUpdateRequest {
    fn from(request: MutationRequest) -> Self {
        Self {
            board_id: request.board_id,
            expected_version: request.expected_version,
            new_content_address: request.new_content_address,
            signature: request.signature,
        }
    }
}
