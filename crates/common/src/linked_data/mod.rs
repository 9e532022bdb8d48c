//! Content addresses for board content.
//!
//! Board content is an opaque blob. Its address is a CIDv1 with the raw codec
//! over a BLAKE3 multihash, so identical bytes always produce the identical
//! address and a client can compute the address of its content locally,
//! before uploading, in order to sign it.

use std::fmt;
use std::str::FromStr;

use cid::Cid;
use multihash::Multihash;
use serde_with::{DeserializeFromStr, SerializeDisplay};

/// Multicodec code for raw binary content
pub const RAW_CODEC: u64 = 0x55;
/// Multihash code for BLAKE3-256
pub const BLAKE3_HASH_CODE: u64 = 0x1e;

#[derive(Debug, thiserror::Error)]
pub enum ContentAddressError {
    #[error("invalid content address: {0}")]
    InvalidCid(#[from] cid::Error),
}

/// Address of a blob within a content-addressed store.
///
/// The registry treats it as opaque: it is stored and compared, never
/// interpreted. Displayed and serialized in the CID's canonical string form
/// (base32 lower for v1).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub struct ContentAddress(Cid);

impl ContentAddress {
    /// Derive the address of `content`.
    pub fn for_content(content: &[u8]) -> Self {
        let digest = blake3::hash(content);
        let hash = Multihash::<64>::wrap(BLAKE3_HASH_CODE, digest.as_bytes())
            .expect("a 32 byte digest always fits a 64 byte multihash");
        Self(Cid::new_v1(RAW_CODEC, hash))
    }

    /// Binary form of the underlying CID.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }

    pub fn cid(&self) -> &Cid {
        &self.0
    }
}

impl From<Cid> for ContentAddress {
    fn from(cid: Cid) -> Self {
        Self(cid)
    }
}

impl From<ContentAddress> for Cid {
    fn from(address: ContentAddress) -> Self {
        address.0
    }
}

impl TryFrom<&[u8]> for ContentAddress {
    type Error = ContentAddressError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(Cid::try_from(bytes)?))
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentAddress {
    type Err = ContentAddressError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Cid::try_from(s)?))
    }
}
