//! Deterministic counter generation for CTR mode.
//!
//! A [`Counter`] emits one block-sized byte string per call, laid out as
//! `nonce || numeric field || suffix`. Only the numeric field changes
//! between calls; it is incremented by one in the configured byte order
//! and wraps silently at its width. Revisiting the initial value is
//! reported as an overflow unless wrap-around was explicitly allowed,
//! since a repeating counter block reuses keystream.

use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CipherModeError, Result};

/// Block size assumed when none is given. Used by many algorithms.
const DEFAULT_BLOCK_SIZE: usize = 16;

/// Byte order used to encode and increment the numeric counter field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Endian {
    #[default]
    Big,
    Little,
}

impl FromStr for Endian {
    type Err = CipherModeError;

    /// Accepts `"big"`, `">"`, `"!"` and `"little"`, `"<"`, case
    /// insensitive.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "big" | ">" | "!" => Ok(Endian::Big),
            "little" | "<" => Ok(Endian::Little),
            _ => Err(CipherModeError::InvalidEndian),
        }
    }
}

/// Counter for usage in CTR mode.
///
/// Big endian is assumed for all counter operations by default.
///
/// Without arguments the builder generates a random half-block nonce and
/// the counter starts at 0:
///
/// ```rust
/// use block_modes::Counter;
///
/// let mut c = Counter::builder().build()?;
/// assert!(c.next_value()?.ends_with(b"\x00"));
/// assert!(c.next_value()?.ends_with(b"\x01"));
/// assert!(c.next_value()?.ends_with(b"\x02"));
/// # Ok::<(), block_modes::CipherModeError>(())
/// ```
///
/// Alternatively, a nonce and an initial value can be set:
///
/// ```rust
/// use block_modes::Counter;
///
/// let mut c = Counter::builder()
///     .nonce(&b"\x00\x01\x02"[..])
///     .initial_value(0xff01)
///     .block_size(8)
///     .build()?;
/// assert_eq!(c.next_value()?, b"\x00\x01\x02\x00\x00\x00\xff\x01");
/// assert_eq!(c.next_value()?, b"\x00\x01\x02\x00\x00\x00\xff\x02");
/// # Ok::<(), block_modes::CipherModeError>(())
/// ```
///
/// The third alternative is to give a full start register; the block size
/// is determined by its length:
///
/// ```rust
/// use block_modes::{Counter, Endian};
///
/// let mut c = Counter::from_iv(&b"\x00\x00\x00\x00"[..], Endian::Little);
/// assert_eq!(c.next_value()?, b"\x00\x00\x00\x00");
/// assert_eq!(c.next_value()?, b"\x01\x00\x00\x00");
/// # Ok::<(), block_modes::CipherModeError>(())
/// ```
///
/// The counter is not thread safe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counter {
    nonce: Vec<u8>,
    suffix: Vec<u8>,
    /// Numeric field, encoded in `endian`.
    value: Vec<u8>,
    /// Encoding of the initial value, for overflow detection.
    initial: Vec<u8>,
    endian: Endian,
    wrap_around: bool,
    first: bool,
}

impl Counter {
    /// Starts building a counter from `nonce`/`initial_value`/`suffix`
    /// parts.
    pub fn builder() -> CounterBuilder {
        CounterBuilder::default()
    }

    /// Creates a counter that resumes from a complete starting register.
    ///
    /// The block size is the register length; nonce and suffix are empty,
    /// so the whole register is the numeric field.
    pub fn from_iv(iv: impl Into<Vec<u8>>, endian: Endian) -> Self {
        let iv = iv.into();
        Counter {
            nonce: Vec::new(),
            suffix: Vec::new(),
            initial: iv.clone(),
            value: iv,
            endian,
            wrap_around: false,
            first: true,
        }
    }

    /// Length of the emitted byte strings.
    pub fn block_size(&self) -> usize {
        self.nonce.len() + self.value.len() + self.suffix.len()
    }

    /// Emits the current counter block and increments by 1.
    ///
    /// The first call never fails. Later calls fail with
    /// [`CipherModeError::CounterOverflow`] once the numeric field has
    /// wrapped back to its initial value, unless wrap-around was allowed
    /// at construction.
    pub fn next_value(&mut self) -> Result<Vec<u8>> {
        if !self.first && self.value == self.initial && !self.wrap_around {
            return Err(CipherModeError::CounterOverflow);
        }
        self.first = false;

        let mut out = Vec::with_capacity(self.block_size());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.value);
        out.extend_from_slice(&self.suffix);

        bump(&mut self.value, self.endian);

        Ok(out)
    }
}

/// Increment a raw counter field by one, wrapping at its width.
fn bump(value: &mut [u8], endian: Endian) {
    match endian {
        Endian::Big => {
            for byte in value.iter_mut().rev() {
                *byte = byte.wrapping_add(1);
                if *byte != 0 {
                    break;
                }
            }
        }
        Endian::Little => {
            for byte in value.iter_mut() {
                *byte = byte.wrapping_add(1);
                if *byte != 0 {
                    break;
                }
            }
        }
    }
}

/// Serialize `value` to exactly `width` bytes in `endian` order,
/// zero-padded, truncated modulo 2^(8*width).
fn encode_value(value: u128, width: usize, endian: Endian) -> Vec<u8> {
    let be = value.to_be_bytes();
    let mut out = vec![0u8; width];
    let n = width.min(be.len());
    out[width - n..].copy_from_slice(&be[be.len() - n..]);
    if endian == Endian::Little {
        out.reverse();
    }
    out
}

/// Builder for [`Counter`].
///
/// `iv` resumes from a complete register and may not be combined with
/// `nonce`, `initial_value`, `suffix` or `block_size`.
#[derive(Clone, Debug, Default)]
pub struct CounterBuilder {
    nonce: Option<Vec<u8>>,
    initial_value: u128,
    suffix: Option<Vec<u8>>,
    iv: Option<Vec<u8>>,
    block_size: Option<usize>,
    endian: Endian,
    wrap_around: bool,
}

impl CounterBuilder {
    /// Fixed prefix of every counter block. Defaults to a random
    /// half-block from the operating system.
    pub fn nonce(mut self, nonce: impl Into<Vec<u8>>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Starting value of the numeric field. Defaults to 0.
    pub fn initial_value(mut self, value: u128) -> Self {
        self.initial_value = value;
        self
    }

    /// Fixed trailing bytes of every counter block. Defaults to empty.
    pub fn suffix(mut self, suffix: impl Into<Vec<u8>>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Complete starting register to resume from.
    pub fn iv(mut self, iv: impl Into<Vec<u8>>) -> Self {
        self.iv = Some(iv.into());
        self
    }

    /// Length of the emitted byte strings. Defaults to 16.
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = Some(block_size);
        self
    }

    /// Byte order of the numeric field. Defaults to big endian.
    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Allow the counter to run past its initial value again instead of
    /// failing. Not recommended: a repeated counter block means repeated
    /// keystream.
    pub fn wrap_around(mut self, wrap_around: bool) -> Self {
        self.wrap_around = wrap_around;
        self
    }

    pub fn build(self) -> Result<Counter> {
        if let Some(iv) = self.iv {
            if self.nonce.is_some()
                || self.suffix.is_some()
                || self.block_size.is_some()
                || self.initial_value != 0
            {
                return Err(CipherModeError::CounterIvConflict);
            }
            let mut counter = Counter::from_iv(iv, self.endian);
            counter.wrap_around = self.wrap_around;
            return Ok(counter);
        }

        let block_size = self.block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
        let nonce = match self.nonce {
            Some(nonce) => nonce,
            None => {
                let mut nonce = vec![0u8; block_size / 2];
                OsRng.fill_bytes(&mut nonce);
                nonce
            }
        };
        let suffix = self.suffix.unwrap_or_default();

        let width = block_size
            .checked_sub(nonce.len() + suffix.len())
            .ok_or(CipherModeError::CounterLayout(block_size))?;
        let value = encode_value(self.initial_value, width, self.endian);

        Ok(Counter {
            nonce,
            suffix,
            initial: value.clone(),
            value,
            endian: self.endian,
            wrap_around: self.wrap_around,
            first: true,
        })
    }
}

/// Structured counter description, the descriptor alternative to passing
/// a callable or a [`Counter`]: `prefix || counter_len-byte numeric field
/// || suffix`, so the produced blocks are
/// `prefix.len() + counter_len + suffix.len()` bytes long.
#[derive(Clone, Debug)]
pub struct CounterParams {
    pub prefix: Vec<u8>,
    pub initial_value: u128,
    pub suffix: Vec<u8>,
    /// Width of the numeric field in bytes.
    pub counter_len: usize,
    pub little_endian: bool,
}

impl From<CounterParams> for Counter {
    fn from(params: CounterParams) -> Self {
        let endian = if params.little_endian {
            Endian::Little
        } else {
            Endian::Big
        };
        let value = encode_value(params.initial_value, params.counter_len, endian);
        Counter {
            nonce: params.prefix,
            suffix: params.suffix,
            initial: value.clone(),
            value,
            endian,
            wrap_around: false,
            first: true,
        }
    }
}

/// Resolved source of counter blocks for a CTR session.
///
/// The two construction forms accepted for the `counter` option resolve
/// into this single producer at session construction.
pub enum CounterSource {
    /// A user-supplied producer of one counter block per call.
    Callable(Box<dyn FnMut() -> Vec<u8>>),
    /// A [`Counter`] instance.
    Counter(Counter),
}

impl CounterSource {
    /// Wraps a closure yielding one counter block per call.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut() -> Vec<u8> + 'static,
    {
        CounterSource::Callable(Box::new(f))
    }

    pub(crate) fn next_value(&mut self) -> Result<Vec<u8>> {
        match self {
            CounterSource::Callable(f) => Ok(f()),
            CounterSource::Counter(counter) => counter.next_value(),
        }
    }
}

impl From<Counter> for CounterSource {
    fn from(counter: Counter) -> Self {
        CounterSource::Counter(counter)
    }
}

impl From<CounterParams> for CounterSource {
    fn from(params: CounterParams) -> Self {
        CounterSource::Counter(params.into())
    }
}

impl fmt::Debug for CounterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterSource::Callable(_) => f.write_str("CounterSource::Callable"),
            CounterSource::Counter(counter) => {
                f.debug_tuple("CounterSource::Counter").field(counter).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_length() {
        for block_size in 1..=64 {
            let mut counter = Counter::builder().block_size(block_size).build().unwrap();
            for _ in 0..32 {
                assert_eq!(counter.next_value().unwrap().len(), block_size);
            }
        }
    }

    #[test]
    fn test_nonce_and_suffix_layout() {
        let mut counter = Counter::builder()
            .nonce(&b"N"[..])
            .initial_value(0)
            .suffix(&b"S"[..])
            .block_size(16)
            .build()
            .unwrap();

        let expected = |n: u8| {
            let mut block = b"N".to_vec();
            block.extend_from_slice(&[0u8; 13]);
            block.push(n);
            block.extend_from_slice(b"S");
            block
        };

        for n in 0..6 {
            assert_eq!(counter.next_value().unwrap(), expected(n));
        }
    }

    #[test]
    fn test_random_nonce_default() {
        let mut counter = Counter::builder().build().unwrap();
        assert!(counter.next_value().unwrap().ends_with(b"\x00"));
        assert!(counter.next_value().unwrap().ends_with(b"\x01"));
        assert!(counter.next_value().unwrap().ends_with(b"\x02"));
        assert_eq!(counter.block_size(), 16);
    }

    #[test]
    fn test_nonce_and_initial_value() {
        let mut counter = Counter::builder()
            .nonce(&b"\x00\x01\x02"[..])
            .initial_value(0xff01)
            .block_size(8)
            .build()
            .unwrap();
        assert_eq!(counter.next_value().unwrap(), b"\x00\x01\x02\x00\x00\x00\xff\x01");
        assert_eq!(counter.next_value().unwrap(), b"\x00\x01\x02\x00\x00\x00\xff\x02");
    }

    #[test]
    fn test_little_endian_iv() {
        let mut counter = Counter::from_iv(&b"\x00\x00\x00\x00"[..], Endian::Little);
        assert_eq!(counter.next_value().unwrap(), b"\x00\x00\x00\x00");
        assert_eq!(counter.next_value().unwrap(), b"\x01\x00\x00\x00");
        assert_eq!(counter.next_value().unwrap(), b"\x02\x00\x00\x00");
    }

    #[test]
    fn test_big_endian_carry() {
        let mut counter = Counter::from_iv(&b"\x00\xff"[..], Endian::Big);
        assert_eq!(counter.next_value().unwrap(), b"\x00\xff");
        assert_eq!(counter.next_value().unwrap(), b"\x01\x00");
    }

    #[test]
    fn test_little_endian_carry() {
        let mut counter = Counter::from_iv(&b"\xff\x00"[..], Endian::Little);
        assert_eq!(counter.next_value().unwrap(), b"\xff\x00");
        assert_eq!(counter.next_value().unwrap(), b"\x00\x01");
    }

    #[test]
    fn test_overflow_detected() {
        // One numeric byte: 256 distinct values, the 257th call revisits
        // the initial value.
        let mut counter = Counter::from_iv(&b"\x00"[..], Endian::Big);
        for _ in 0..256 {
            counter.next_value().unwrap();
        }
        assert_eq!(
            counter.next_value(),
            Err(CipherModeError::CounterOverflow)
        );
    }

    #[test]
    fn test_overflow_allowed_with_wrap_around() {
        let mut counter = Counter::builder()
            .iv(&b"\x00"[..])
            .wrap_around(true)
            .build()
            .unwrap();
        for _ in 0..256 {
            counter.next_value().unwrap();
        }
        assert_eq!(counter.next_value().unwrap(), b"\x00");
    }

    #[test]
    fn test_zero_width_numeric_field() {
        // Nonce and suffix fill the whole block: the first call works,
        // the second is already a revisit.
        let mut counter = Counter::builder()
            .nonce(&b"AB"[..])
            .suffix(&b"CD"[..])
            .block_size(4)
            .build()
            .unwrap();
        assert_eq!(counter.next_value().unwrap(), b"ABCD");
        assert_eq!(
            counter.next_value(),
            Err(CipherModeError::CounterOverflow)
        );
    }

    #[test]
    fn test_wide_numeric_field() {
        // Wider than any fixed-width integer.
        let mut counter = Counter::builder()
            .nonce(&b""[..])
            .block_size(24)
            .build()
            .unwrap();
        assert_eq!(counter.next_value().unwrap(), vec![0u8; 24]);
        let mut expected = vec![0u8; 24];
        expected[23] = 1;
        assert_eq!(counter.next_value().unwrap(), expected);
    }

    #[test]
    fn test_iv_conflicts() {
        assert_eq!(
            Counter::builder().iv(&b"\x00"[..]).nonce(&b"N"[..]).build(),
            Err(CipherModeError::CounterIvConflict)
        );
        assert_eq!(
            Counter::builder().iv(&b"\x00"[..]).initial_value(1).build(),
            Err(CipherModeError::CounterIvConflict)
        );
        assert_eq!(
            Counter::builder().iv(&b"\x00"[..]).suffix(&b"S"[..]).build(),
            Err(CipherModeError::CounterIvConflict)
        );
        assert_eq!(
            Counter::builder().iv(&b"\x00"[..]).block_size(16).build(),
            Err(CipherModeError::CounterIvConflict)
        );
    }

    #[test]
    fn test_oversized_nonce_rejected() {
        assert_eq!(
            Counter::builder().nonce(vec![0u8; 20]).block_size(16).build(),
            Err(CipherModeError::CounterLayout(16))
        );
    }

    #[test]
    fn test_counter_params_descriptor() {
        let mut counter: Counter = CounterParams {
            prefix: b"PRE".to_vec(),
            initial_value: 0x0102,
            suffix: b"X".to_vec(),
            counter_len: 4,
            little_endian: false,
        }
        .into();
        assert_eq!(counter.block_size(), 8);
        assert_eq!(counter.next_value().unwrap(), b"PRE\x00\x00\x01\x02X");
        assert_eq!(counter.next_value().unwrap(), b"PRE\x00\x00\x01\x03X");
    }

    #[test]
    fn test_counter_params_little_endian() {
        let mut counter: Counter = CounterParams {
            prefix: Vec::new(),
            initial_value: 0x01,
            suffix: Vec::new(),
            counter_len: 4,
            little_endian: true,
        }
        .into();
        assert_eq!(counter.next_value().unwrap(), b"\x01\x00\x00\x00");
        assert_eq!(counter.next_value().unwrap(), b"\x02\x00\x00\x00");
    }

    #[test]
    fn test_endian_from_str() {
        for spelling in ["big", "BIG", ">", "!"] {
            assert_eq!(spelling.parse::<Endian>().unwrap(), Endian::Big);
        }
        for spelling in ["little", "Little", "<"] {
            assert_eq!(spelling.parse::<Endian>().unwrap(), Endian::Little);
        }
        assert_eq!(
            "middle".parse::<Endian>(),
            Err(CipherModeError::InvalidEndian)
        );
    }

    #[test]
    fn test_encode_value_truncates() {
        // Values wider than the field wrap modulo 2^(8*width).
        assert_eq!(encode_value(0x1ff, 1, Endian::Big), vec![0xff]);
        assert_eq!(encode_value(0x0102, 2, Endian::Little), vec![0x02, 0x01]);
    }
}
