//! ECB and CBC: the block-aligned paths.

use crate::cipher::BlockCipher;
use crate::error::{CipherModeError, Result};
use crate::modes::{Cipher, Mode};
use crate::utils::xor_blocks;

impl<C: BlockCipher> Cipher<C> {
    pub(super) fn block_encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let block_size = self.cipher.block_size();
        if data.len() % block_size != 0 {
            return Err(CipherModeError::InputNotBlockAligned(block_size));
        }

        let mut out = Vec::with_capacity(data.len());
        for block in data.chunks(block_size) {
            let ecd = if self.mode == Mode::Ecb {
                self.cipher.encrypt_block(&self.key, block)?
            } else {
                // CBC: chain through the register, the ciphertext block
                // becomes the next register value.
                let xored = xor_blocks(&self.status, block);
                let ecd = self.cipher.encrypt_block(&self.key, &xored)?;
                self.status = ecd.clone();
                ecd
            };
            out.extend_from_slice(&ecd);
        }
        Ok(out)
    }

    pub(super) fn block_decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let block_size = self.cipher.block_size();
        if data.len() % block_size != 0 {
            return Err(CipherModeError::InputNotBlockAligned(block_size));
        }

        let mut out = Vec::with_capacity(data.len());
        for block in data.chunks(block_size) {
            let dec = if self.mode == Mode::Ecb {
                self.cipher.decrypt_block(&self.key, block)?
            } else {
                // CBC: undo the transform, then the XOR with the
                // previous ciphertext block (or the IV); the raw
                // ciphertext block becomes the next register value.
                let decrypted = self.cipher.decrypt_block(&self.key, block)?;
                let dec = xor_blocks(&self.status, &decrypted);
                self.status = block.to_vec();
                dec
            };
            out.extend_from_slice(&dec);
        }
        Ok(out)
    }
}
