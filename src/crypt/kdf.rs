//! Key schedule: iterated AES-256-ECB transform of the composite key.
//!
//! KDBX3 hard-codes this as its only KDF; KDBX4's Argon2 variant dictionary
//! does not apply to this reader and is not implemented.

use aes::Aes256;
use cipher::{
    generic_array::{
        typenum::{U16, U32},
        GenericArray,
    },
    BlockEncrypt, KeyInit,
};
use sha2::{Digest, Sha256};

type Block = GenericArray<u8, U16>;

/// Runs `composite_key` through `rounds` rounds of AES-256-ECB encryption
/// keyed by `seed`, then mixes the result with `master_seed` via SHA-256.
///
/// The 32-byte composite key is treated as two independent 16-byte blocks
/// encrypted in place with the same ECB key each round.
pub(crate) struct AesKdf {
    pub(crate) seed: Vec<u8>,
    pub(crate) rounds: u64,
}

impl AesKdf {
    /// Iterates the AES-ECB transform, then folds the result with SHA-256.
    pub(crate) fn transform_key(&self, composite_key: &GenericArray<u8, U32>) -> GenericArray<u8, U32> {
        let block1 = GenericArray::clone_from_slice(&composite_key[..16]);
        let block2 = GenericArray::clone_from_slice(&composite_key[16..]);
        let (block1, block2) = self.encrypt_rounds(block1, block2);

        // Step 2: transformed = SHA256(composite_key_after_rounds)
        let mut digest = Sha256::new();
        digest.update(block1);
        digest.update(block2);
        digest.finalize()
    }

    /// Runs `self.rounds` rounds of AES-256-ECB encryption keyed by `self.seed`
    /// over each of the two 16-byte halves independently, returning the
    /// encrypted halves without the SHA-256 finalization step. Split out from
    /// [`AesKdf::transform_key`] so the iteration itself (not the one-way hash
    /// that follows it) can be tested for doubling equivalence.
    fn encrypt_rounds(&self, mut block1: Block, mut block2: Block) -> (Block, Block) {
        let cipher = Aes256::new(&GenericArray::clone_from_slice(&self.seed));
        for _ in 0..self.rounds {
            cipher.encrypt_block(&mut block1);
            cipher.encrypt_block(&mut block2);
        }
        (block1, block2)
    }
}
