//! Error types for cipher mode operations

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherModeError {
    #[error("'key' cannot have a length of 0")]
    EmptyKey,

    #[error("for CBC, CFB, PGP and OFB mode an IV is required")]
    MissingIv,

    #[error("'IV' length must be block_size ({0})")]
    InvalidIvLength(usize),

    #[error("'IV' length must be block_size ({0}) or block_size + 2")]
    InvalidPgpIvLength(usize),

    #[error("missing required argument for CFB: 'segment_size'")]
    MissingSegmentSize,

    #[error("segment_size must be between 8 and block_size*8 and a multiple of 8")]
    InvalidSegmentSize,

    #[error("missing required argument for CTR: 'counter'")]
    MissingCounter,

    #[error("counter output length must be block_size ({0})")]
    CounterOutputLength(usize),

    #[error("input length must be a multiple of block_size ({0})")]
    InputNotBlockAligned(usize),

    #[error("input length must be a multiple of segment_size/8 ({0} bytes) in CFB mode")]
    InputNotSegmentAligned(usize),

    #[error("Unknown mode of operation")]
    UnknownMode,

    #[error("Counter overflow detected")]
    CounterOverflow,

    #[error("'iv' may not be used with nonce, initial_value, suffix or block_size")]
    CounterIvConflict,

    #[error("nonce and suffix do not fit within block_size ({0})")]
    CounterLayout(usize),

    #[error("invalid endian, possible values are big ('big', '>', '!') or little ('little', '<')")]
    InvalidEndian,

    #[error("'{0}' is not implemented for this block cipher")]
    NotImplemented(&'static str),

    #[error("encryption error: {0}")]
    EncryptionError(String),
}

pub type Result<T> = std::result::Result<T, CipherModeError>;
