//! Cryptographic primitives for Feedboard
//!
//! Boards are owned by wallet identities rather than accounts. A wallet is an
//! Ed25519 keypair:
//!
//! - **Identity**: the `PublicKey` is the board owner, stored on every record
//! - **Authorization**: a mutation carries a detached signature over its
//!   canonical encoding (see [`crate::mutation`]), produced with the wallet's
//!   `SecretKey`
//! - **Verification**: [`SignatureVerifier`] decides whether a signature is
//!   valid for a message and a purported signer. It is a pure function over
//!   bytes and reports malformed input as an invalid signature.

mod keys;
mod verifier;

pub use ed25519_dalek::Signature;
pub use keys::{KeyError, PublicKey, SecretKey, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, SIGNATURE_SIZE};
pub use verifier::{Ed25519Verifier, SignatureVerifier};
