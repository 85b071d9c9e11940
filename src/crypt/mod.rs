//! Cryptographic primitives adapter (SHA-256 hashing, AES-ECB/CBC).
//!
//! Only SHA-256 and AES (ECB for key transformation, CBC for the body
//! cipher) are needed here; there is no HMAC, SHA-512, SHA-1, or
//! challenge-response support, since none of that backs a KDBX2/3 read path.

use cipher::generic_array::{typenum::U32, GenericArray};
use sha2::{Digest, Sha256};

pub(crate) mod cipher_body;
pub(crate) mod kdf;

/// Hash the concatenation of `elements` with SHA-256.
pub(crate) fn calculate_sha256(elements: &[&[u8]]) -> GenericArray<u8, U32> {
    let mut digest = Sha256::new();
    for element in elements {
        digest.update(element);
    }
    digest.finalize()
}

/// A running SHA-256 hasher, used by [`crate::key::Key`] to fold one digest
/// per pushed key material into a composite key without holding every
/// material in memory at once.
#[derive(Clone)]
pub(crate) struct RunningSha256 {
    hasher: Sha256,
}

impl RunningSha256 {
    pub(crate) fn new() -> Self {
        RunningSha256 { hasher: Sha256::new() }
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    pub(crate) fn finalize(self) -> GenericArray<u8, U32> {
        self.hasher.finalize()
    }
}

impl zeroize::Zeroize for RunningSha256 {
    fn zeroize(&mut self) {
        // Sha256 holds no heap allocations to scrub; replacing the running
        // state with a fresh hasher is enough to drop the old block buffer.
        self.hasher = Sha256::new();
    }
}
