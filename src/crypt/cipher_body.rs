//! Body cipher: AES-256-CBC decryption with PKCS#7 unpadding.
//!
//! KDBX3 only ever selects AES-256 as its outer cipher, so this module
//! exposes a single free function rather than a multi-cipher trait.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};

use crate::error::CryptographyError;

type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Decrypts `ciphertext` in place with AES-256-CBC under `key`/`iv`, then
/// strips its PKCS#7 padding.
///
/// Fails if `key`/`iv` are not 32/16 bytes, if the ciphertext is not a whole
/// number of 16-byte blocks, or if the final block's padding is invalid —
/// the latter is this crate's primary "wrong password" signal.
pub(crate) fn aes256_cbc_decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptographyError> {
    let decryptor = Aes256CbcDec::new_from_slices(key, iv).map_err(|_| CryptographyError::InvalidKeyIvLength)?;

    let mut buf = ciphertext.to_vec();
    let plaintext_len = decryptor
        .decrypt_padded_mut::<Pkcs7>(&mut buf)
        .map_err(|_| CryptographyError::InvalidPadding)?
        .len();
    buf.truncate(plaintext_len);
    Ok(buf)
}
