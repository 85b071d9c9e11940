//! Composite key construction.
//!
//! `push_key` operates directly on caller-supplied key material — there is
//! no keyfile parsing or challenge-response path here — so building up a
//! composite key is a single method the caller invokes once per key source,
//! in order.

use cipher::generic_array::{typenum::U32, GenericArray};
use zeroize::ZeroizeOnDrop;

use crate::crypt::{calculate_sha256, RunningSha256};
use crate::error::DatabaseKeyError;

/// An ordered composite of key material, folded into a single 32-byte key.
///
/// `push_key` may be called more than once (e.g. passphrase, then key-file
/// bytes); order matters and is the caller's responsibility to get right.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Key {
    composite: RunningSha256,
    #[zeroize(skip)]
    sources: usize,
}

impl Default for Key {
    fn default() -> Self {
        Self::new()
    }
}

impl Key {
    pub fn new() -> Self {
        Key {
            composite: RunningSha256::new(),
            sources: 0,
        }
    }

    /// Hashes `material` with SHA-256 and folds the digest into the running
    /// composite key.
    pub fn push_key(&mut self, material: &[u8]) {
        let digest = calculate_sha256(&[material]);
        self.composite.update(&digest);
        self.sources += 1;
    }

    /// Discards all previously pushed key material.
    pub fn clear_keys(&mut self) {
        self.composite = RunningSha256::new();
        self.sources = 0;
    }

    pub(crate) fn has_sources(&self) -> bool {
        self.sources > 0
    }

    /// Finalizes the composite SHA-256 state into the 32-byte composite key
    /// consumed by [`crate::crypt::kdf::AesKdf::transform_key`].
    pub(crate) fn composite_key(&self) -> Result<GenericArray<u8, U32>, DatabaseKeyError> {
        if !self.has_sources() {
            return Err(DatabaseKeyError::NoKeySources);
        }
        Ok(self.composite.clone().finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        let key = Key::new();
        assert!(key.composite_key().is_err());
    }

    #[test]
    fn order_affects_composite() {
        let mut a = Key::new();
        a.push_key(b"passphrase");
        a.push_key(b"keyfile-bytes");

        let mut b = Key::new();
        b.push_key(b"keyfile-bytes");
        b.push_key(b"passphrase");

        assert_ne!(a.composite_key().unwrap(), b.composite_key().unwrap());
    }

    #[test]
    fn clear_keys_resets_state() {
        let mut a = Key::new();
        a.push_key(b"passphrase");
        a.clear_keys();
        assert!(a.composite_key().is_err());

        let mut b = Key::new();
        b.push_key(b"passphrase");

        let mut c = Key::new();
        c.push_key(b"something else");
        c.clear_keys();
        c.push_key(b"passphrase");

        assert_eq!(b.composite_key().unwrap(), c.composite_key().unwrap());
    }
}
