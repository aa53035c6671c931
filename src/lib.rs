//! # Block Modes Library
//!
//! This library implements block cipher modes of operation on top of a
//! pluggable single-block cipher. Implement the [`BlockCipher`] trait
//! for your algorithm and the chaining, feedback and keystream logic
//! comes for free.
//!
//! ## Supported Modes
//!
//! - **ECB** (Electronic Code Book) - Simple but insecure mode
//! - **CBC** (Cipher Block Chaining) - Widely used, requires IV
//! - **CFB** (Cipher Feedback) - Segment-wise feedback, 8 bit up to one block
//! - **PGP-CFB** - OpenPGP's full-block CFB variant
//! - **OFB** (Output Feedback) - Stream cipher mode
//! - **CTR** (Counter Mode) - Stream cipher mode, with a [`Counter`] generator
//!
//! ## Usage
//!
//! ```rust
//! use block_modes::{Cipher, CipherOptions, DummyCipher, Mode};
//!
//! // Create a cipher (replace with your real block cipher)
//! let key = b"my-secret-key-16";
//! let iv: &[u8] = b"initialization16";
//! let plaintext = b"one block of ptx";
//!
//! // Encrypt using CBC mode
//! let mut session = Cipher::new(
//!     DummyCipher::new(16),
//!     key,
//!     Mode::Cbc,
//!     CipherOptions::new().iv(iv),
//! )?;
//! let encrypted = session.encrypt(plaintext)?;
//!
//! // Decrypt with a fresh session under the same parameters
//! let mut session = Cipher::new(
//!     DummyCipher::new(16),
//!     key,
//!     Mode::Cbc,
//!     CipherOptions::new().iv(iv),
//! )?;
//! assert_eq!(session.decrypt(&encrypted)?, plaintext.to_vec());
//! # Ok::<(), block_modes::CipherModeError>(())
//! ```
//!
//! Sessions are stateful: `encrypt(a)` followed by `encrypt(b)` equals
//! one `encrypt(a ++ b)`, and a session must not be reused for a second
//! message. No padding is performed anywhere; for ECB/CBC the input of
//! every call must be block-aligned, for CFB aligned to the segment
//! size, while OFB/CTR take any length.

// Public modules
pub mod cipher;
pub mod counter;
pub mod error;
pub mod modes;
pub mod utils;

// Re-exports for easy access
pub use cipher::BlockCipher;
pub use counter::{Counter, CounterBuilder, CounterParams, CounterSource, Endian};
pub use error::{CipherModeError, Result};
pub use modes::{Cipher, CipherOptions, Mode};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dummy cipher implementation for testing and demonstration
///
/// This is a simple XOR-based "cipher" that should **never** be used in
/// production. It is only provided for exercising the modes of
/// operation without a real cipher implementation.
///
/// # Example
///
/// ```rust
/// use block_modes::{BlockCipher, DummyCipher};
///
/// let cipher = DummyCipher::new(16);
/// assert_eq!(cipher.block_size(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct DummyCipher {
    block_size: usize,
}

impl DummyCipher {
    /// Create a new dummy cipher with the specified block size in bytes.
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }
}

impl BlockCipher for DummyCipher {
    fn block_size(&self) -> usize {
        self.block_size
    }

    /// "Encrypt" a block using simple XOR (for testing only!)
    fn encrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>> {
        if key.is_empty() {
            return Err(CipherModeError::EncryptionError(
                "Key cannot be empty".to_string(),
            ));
        }

        // Repeating key pattern, so registers longer than one block
        // (PGP-CFB) work too.
        let key_cycle: Vec<u8> = key.iter().cycle().take(block.len()).cloned().collect();
        Ok(utils::xor_blocks(block, &key_cycle))
    }

    /// "Decrypt" a block using simple XOR (identical to encrypt for XOR)
    fn decrypt_block(&self, key: &[u8], block: &[u8]) -> Result<Vec<u8>> {
        self.encrypt_block(key, block)
    }
}
