//! Generic block cipher trait

use crate::error::{CipherModeError, Result};

/// Capability supplied by a concrete block cipher algorithm.
///
/// Implement [`block_size`](BlockCipher::block_size) and override
/// [`encrypt_block`](BlockCipher::encrypt_block) and
/// [`decrypt_block`](BlockCipher::decrypt_block) with the real
/// single-block transform. Modes that only ever run the cipher in the
/// forward direction (CFB, PGP-CFB, OFB, CTR) work without
/// `decrypt_block`.
pub trait BlockCipher {
    /// Block size of the cipher in bytes.
    fn block_size(&self) -> usize;

    /// Encrypts a single block under `key`.
    ///
    /// The default body reports the transform as unimplemented.
    fn encrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>> {
        let _ = (key, block);
        Err(CipherModeError::NotImplemented("encrypt_block"))
    }

    /// Decrypts a single block under `key`.
    ///
    /// The default body reports the transform as unimplemented.
    fn decrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>> {
        let _ = (key, block);
        Err(CipherModeError::NotImplemented("decrypt_block"))
    }
}
