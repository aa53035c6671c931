//! OFB and CTR: the keystream paths.
//!
//! The keystream is conceptually infinite but materialized one block at
//! a time: the register holds the last transform output, the cursor
//! tracks how much of it has been consumed. State carries across calls,
//! so piecewise encryption lines up with one-shot encryption at any
//! split.

use crate::cipher::BlockCipher;
use crate::error::{CipherModeError, Result};
use crate::modes::{Cipher, Mode};

impl<C: BlockCipher> Cipher<C> {
    pub(super) fn apply_keystream(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len());
        for &byte in data {
            if self.keystream_pos == self.keystream.len() {
                self.refill_keystream()?;
            }
            out.push(byte ^ self.keystream[self.keystream_pos]);
            self.keystream_pos += 1;
        }
        Ok(out)
    }

    /// Produces the next keystream block into `self.keystream`.
    ///
    /// A failure here (unimplemented transform, exhausted counter,
    /// counter block of the wrong size) contaminates the session: bytes
    /// may already have been consumed, so the caller must discard it.
    fn refill_keystream(&mut self) -> Result<()> {
        let block_size = self.cipher.block_size();

        let input = match self.mode {
            Mode::Ofb => std::mem::take(&mut self.status),
            Mode::Ctr => {
                let source = self
                    .counter
                    .as_mut()
                    .ok_or(CipherModeError::MissingCounter)?;
                let next = source.next_value()?;
                if next.len() != block_size {
                    return Err(CipherModeError::CounterOutputLength(block_size));
                }
                next
            }
            _ => return Err(CipherModeError::UnknownMode),
        };

        self.status = self.cipher.encrypt_block(&self.key, &input)?;
        self.keystream = self.status.clone();
        self.keystream_pos = 0;
        Ok(())
    }
}
