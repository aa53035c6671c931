//! CFB and PGP-CFB: segment feedback.
//!
//! Each step runs the block transform forward over the full feedback
//! register and XORs the leading `segment_size/8` bytes of the result
//! with one input unit. The register then drops its leading unit and
//! appends the ciphertext unit (the output when encrypting, the input
//! when decrypting). One shift formula covers 8-bit through full-block
//! feedback, and PGP-CFB is full-block feedback over a register that may
//! carry two extra bytes.

use crate::cipher::BlockCipher;
use crate::error::{CipherModeError, Result};
use crate::modes::Cipher;
use crate::utils::xor_blocks;

impl<C: BlockCipher> Cipher<C> {
    /// Bytes per feedback unit.
    fn segment_bytes(&self) -> usize {
        self.segment_size / 8
    }

    pub(super) fn cfb_encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let segment = self.segment_bytes();
        if data.len() % segment != 0 {
            return Err(CipherModeError::InputNotSegmentAligned(segment));
        }

        let mut out = Vec::with_capacity(data.len());
        for unit in data.chunks(segment) {
            let encrypted_iv = self.cipher.encrypt_block(&self.key, &self.status)?;
            let ecd = xor_blocks(&encrypted_iv, unit);

            self.status.drain(..segment);
            self.status.extend_from_slice(&ecd);

            out.extend_from_slice(&ecd);
        }
        Ok(out)
    }

    pub(super) fn cfb_decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let segment = self.segment_bytes();
        if data.len() % segment != 0 {
            return Err(CipherModeError::InputNotSegmentAligned(segment));
        }

        let mut out = Vec::with_capacity(data.len());
        for unit in data.chunks(segment) {
            // The block transform always runs forward, ciphertext feeds
            // the register.
            let encrypted_iv = self.cipher.encrypt_block(&self.key, &self.status)?;
            let dec = xor_blocks(&encrypted_iv, unit);

            self.status.drain(..segment);
            self.status.extend_from_slice(unit);

            out.extend_from_slice(&dec);
        }
        Ok(out)
    }
}
