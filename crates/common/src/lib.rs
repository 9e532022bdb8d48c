/**
 * Board records, identifiers and the timestamps
 *  the registry stamps on them.
 */
pub mod board;
/**
 * Registry of boards: the authoritative mapping
 *  from board id to its current content address.
 * Exposes a provider trait and an in-memory provider.
 */
pub mod board_registry;
/**
 * Content-addressed blob storage contract, plus
 *  an in-memory implementation for tests and
 *  ephemeral deployments.
 */
pub mod content_store;
/**
 * Cryptographic types and operations.
 *  - Wallet public and secret keys
 *  - Signature verification
 */
pub mod crypto;
/**
 * Content addresses: CIDs over BLAKE3 digests
 *  of raw content.
 */
pub mod linked_data;
/**
 * Canonical encoding of mutation intents, the
 *  bytes a wallet signs to authorize a mutation.
 */
pub mod mutation;
/**
 * The publish protocol: stage content, authenticate
 *  the signer, then swap the board's pointer.
 */
pub mod sync;
/**
 * Build version information.
 */
pub mod version;

pub mod prelude {
    pub use crate::board::{BoardId, BoardRecord, INITIAL_VERSION};
    pub use crate::board_registry::{BoardRegistry, MemoryBoardRegistry, RegistryError};
    pub use crate::content_store::{ContentStore, ContentStoreError, MemoryContentStore};
    pub use crate::crypto::{Ed25519Verifier, PublicKey, SecretKey, SignatureVerifier};
    pub use crate::linked_data::ContentAddress;
    pub use crate::mutation::{MutationRequest, Operation};
    pub use crate::sync::{
        CreateBoardRequest, PublishUpdateRequest, SyncConfig, SyncCoordinator, SyncError,
    };
    pub use crate::version::build_info;
}
