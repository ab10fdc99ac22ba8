//! Error types for the DBPL codec and playlist model

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Only produced by the file wrappers (`Playlist::load` / `Playlist::save`)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid playlist format: {0}")]
    InvalidFormat(String),

    #[error("unsupported playlist version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    Truncated {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("malformed {field} at offset {offset:#x}: {reason}")]
    MalformedString {
        offset: usize,
        field: &'static str,
        reason: String,
    },

    #[error("{field} out of range: {value}")]
    IntegerOverflow { field: &'static str, value: i128 },

    #[error("{field} too long: {len} bytes (limit {limit})")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        limit: usize,
    },

    #[error("property {key:?} holds a {expected} value, cannot store {found}")]
    PropertyTypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
