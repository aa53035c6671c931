//! Block cipher modes of operation.
//!
//! [`Cipher`] is a stateful session: it owns the key, the chaining
//! register and the keystream cursor, and splits arbitrary-length input
//! into the units the selected mode works on. Encryption of a long
//! message can be broken up into several calls; `encrypt(a)` followed by
//! `encrypt(b)` produces the same bytes as a single `encrypt(a ++ b)`.
//! That also means a session must not be reused for a second independent
//! message.

mod block;
mod cfb;
mod keystream;

use crate::cipher::BlockCipher;
use crate::counter::CounterSource;
use crate::error::{CipherModeError, Result};

/// Mode of operation selector.
///
/// The discriminants match the classic PEP-272 numeric constants, so
/// callers holding a raw mode number can go through [`Mode::try_from`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Mode {
    /// Electronic codebook. No chaining, block-aligned input.
    Ecb = 1,
    /// Cipher block chaining. Requires an IV, block-aligned input.
    Cbc = 2,
    /// Cipher feedback. Requires an IV and a segment size in bits.
    Cfb = 3,
    /// OpenPGP's CFB variant: full-block feedback, the IV may carry two
    /// extra resynchronization bytes.
    Pgp = 4,
    /// Output feedback. Requires an IV, accepts input of any length.
    Ofb = 5,
    /// Counter mode. Requires a counter source, accepts input of any
    /// length.
    Ctr = 6,
}

impl Mode {
    fn needs_iv(self) -> bool {
        matches!(self, Mode::Cbc | Mode::Cfb | Mode::Pgp | Mode::Ofb)
    }

    fn uses_keystream(self) -> bool {
        matches!(self, Mode::Ofb | Mode::Ctr)
    }
}

impl TryFrom<u32> for Mode {
    type Error = CipherModeError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            1 => Ok(Mode::Ecb),
            2 => Ok(Mode::Cbc),
            3 => Ok(Mode::Cfb),
            4 => Ok(Mode::Pgp),
            5 => Ok(Mode::Ofb),
            6 => Ok(Mode::Ctr),
            _ => Err(CipherModeError::UnknownMode),
        }
    }
}

/// Named construction options for [`Cipher::new`].
///
/// Which options are required depends on the mode; anything a mode does
/// not use is ignored, see [`Cipher::new`].
#[derive(Debug, Default)]
pub struct CipherOptions {
    iv: Option<Vec<u8>>,
    segment_size: Option<usize>,
    counter: Option<CounterSource>,
}

impl CipherOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialization vector. Required for CBC, CFB, PGP and OFB.
    pub fn iv(mut self, iv: impl Into<Vec<u8>>) -> Self {
        self.iv = Some(iv.into());
        self
    }

    /// CFB feedback width in bits. Required for CFB; must be a multiple
    /// of 8 between 8 and block_size*8.
    pub fn segment_size(mut self, bits: usize) -> Self {
        self.segment_size = Some(bits);
        self
    }

    /// Counter source. Required for CTR. Accepts a [`Counter`],
    /// [`CounterParams`] or a prebuilt [`CounterSource`].
    ///
    /// [`Counter`]: crate::Counter
    /// [`CounterParams`]: crate::CounterParams
    pub fn counter(mut self, counter: impl Into<CounterSource>) -> Self {
        self.counter = Some(counter.into());
        self
    }

    /// Counter source from a closure yielding one block-sized byte
    /// string per call.
    pub fn counter_fn<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> Vec<u8> + 'static,
    {
        self.counter = Some(CounterSource::from_fn(f));
        self
    }
}

/// One stateful encryption or decryption session in a mode of operation.
#[derive(Debug)]
pub struct Cipher<C: BlockCipher> {
    cipher: C,
    key: Vec<u8>,
    mode: Mode,
    /// Chaining register: IV, previous ciphertext or keystream register
    /// depending on the mode. Empty for ECB and CTR.
    status: Vec<u8>,
    /// CFB feedback width in bits; block_size*8 for PGP, 0 otherwise.
    segment_size: usize,
    counter: Option<CounterSource>,
    keystream: Vec<u8>,
    keystream_pos: usize,
}

impl<C: BlockCipher> Cipher<C> {
    /// Configures a session. All mode requirements are checked here so
    /// that `encrypt`/`decrypt` stay free of configuration errors:
    ///
    /// - the key must be non-empty;
    /// - CBC, CFB, PGP and OFB require an IV of block size length
    ///   (PGP also accepts block size + 2);
    /// - CFB requires `segment_size`, a multiple of 8 within
    ///   `8..=block_size*8`;
    /// - CTR requires a counter source.
    pub fn new(cipher: C, key: &[u8], mode: Mode, options: CipherOptions) -> Result<Self> {
        if key.is_empty() {
            return Err(CipherModeError::EmptyKey);
        }

        let block_size = cipher.block_size();
        let CipherOptions {
            iv,
            segment_size,
            counter,
        } = options;

        let status = if mode.needs_iv() {
            let iv = iv
                .filter(|iv| !iv.is_empty())
                .ok_or(CipherModeError::MissingIv)?;
            match mode {
                Mode::Pgp => {
                    if iv.len() != block_size && iv.len() != block_size + 2 {
                        return Err(CipherModeError::InvalidPgpIvLength(block_size));
                    }
                }
                _ => {
                    if iv.len() != block_size {
                        return Err(CipherModeError::InvalidIvLength(block_size));
                    }
                }
            }
            iv
        } else {
            Vec::new()
        };

        let segment_size = match mode {
            Mode::Cfb => {
                let bits = segment_size.unwrap_or(0);
                if bits == 0 {
                    return Err(CipherModeError::MissingSegmentSize);
                }
                if bits % 8 != 0 || !(8..=block_size * 8).contains(&bits) {
                    return Err(CipherModeError::InvalidSegmentSize);
                }
                bits
            }
            Mode::Pgp => block_size * 8,
            _ => 0,
        };

        let counter = match mode {
            Mode::Ctr => Some(counter.ok_or(CipherModeError::MissingCounter)?),
            _ => None,
        };

        Ok(Cipher {
            cipher,
            key: key.to_vec(),
            mode,
            status,
            segment_size,
            counter,
            keystream: Vec::new(),
            keystream_pos: 0,
        })
    }

    /// The session's mode of operation.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Block size of the underlying cipher in bytes.
    pub fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    /// Current IV / feedback register, for the modes that have one.
    ///
    /// Mutates as the session advances; `None` for ECB and CTR.
    pub fn iv(&self) -> Option<&[u8]> {
        if self.mode.needs_iv() {
            Some(&self.status)
        } else {
            None
        }
    }

    /// Encrypts `data` with the key and parameters set at construction.
    ///
    /// No padding is performed; the output is as long as the input.
    /// ECB and CBC require the input length to be a multiple of the
    /// block size, CFB a multiple of `segment_size/8` bytes; OFB and
    /// CTR accept any length.
    pub fn encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        if self.mode.uses_keystream() {
            return self.apply_keystream(data);
        }
        if matches!(self.mode, Mode::Cfb | Mode::Pgp) {
            return self.cfb_encrypt(data);
        }
        if !matches!(self.mode, Mode::Ecb | Mode::Cbc) {
            return Err(CipherModeError::UnknownMode);
        }
        self.block_encrypt(data)
    }

    /// Decrypts `data` with the key and parameters set at construction.
    ///
    /// Same length rules as [`encrypt`](Cipher::encrypt). For OFB and
    /// CTR decryption is the identical keystream XOR.
    pub fn decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        if self.mode.uses_keystream() {
            return self.apply_keystream(data);
        }
        if matches!(self.mode, Mode::Cfb | Mode::Pgp) {
            return self.cfb_decrypt(data);
        }
        if !matches!(self.mode, Mode::Ecb | Mode::Cbc) {
            return Err(CipherModeError::UnknownMode);
        }
        self.block_decrypt(data)
    }
}
