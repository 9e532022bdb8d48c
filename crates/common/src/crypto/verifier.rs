use std::fmt::Debug;

use super::keys::PublicKey;
use super::Signature;

/// Decides whether `signature` is a valid signature of `message` by the
/// holder of `public_identity`.
///
/// Implementations must be deterministic and free of side effects. Malformed
/// identities or signatures (wrong length, not a curve point, non-canonical
/// encoding) are answered with `false`; the caller decides how to surface that.
pub trait SignatureVerifier: Send + Sync + Debug + Clone + 'static {
    fn verify(&self, message: &[u8], public_identity: &[u8], signature: &[u8]) -> bool;
}

/// Ed25519 verification over raw key and signature bytes, matching the
/// wallet keypair format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, message: &[u8], public_identity: &[u8], signature: &[u8]) -> bool {
        let Ok(public_key) = PublicKey::try_from(public_identity) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        public_key.verify(message, &signature).is_ok()
    }
}
