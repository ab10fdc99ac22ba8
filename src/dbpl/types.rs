//! DBPL type definitions and constants

use serde::{Serialize, Serializer};
use std::fmt;

/// File signature at offset 0
pub const MAGIC: &[u8; 4] = b"DBPL";

/// Decoder names must be shorter than this (the player rejects longer ones)
pub const MAX_DECODER_LEN: usize = 20;

/// Property keys and values must be shorter than this.
/// The player skips values at or above the limit, so they are kept as raw bytes.
pub const MAX_PROPERTY_LEN: usize = 20000;

/// Smallest possible track block: empty strings, no properties, no flags
pub const MIN_TRACK_LEN: usize = 36;

/// Properties whose values the player stores as decimal integers
pub const INTEGER_KEYS: &[&str] = &[
    ":STARTSAMPLE",
    ":ENDSAMPLE",
    ":FILE_SIZE",
    ":BPS",
    ":CHANNELS",
    ":SAMPLERATE",
    ":BITRATE",
];

/// Properties whose values the player stores as decimal floats
pub const FLOAT_KEYS: &[&str] = &[
    ":DURATION",
    ":REPLAYGAIN_ALBUMGAIN",
    ":REPLAYGAIN_ALBUMPEAK",
    ":REPLAYGAIN_TRACKGAIN",
    ":REPLAYGAIN_TRACKPEAK",
];

/// Reserved property names with dedicated accessors on `Track`
pub mod keys {
    pub const URI: &str = ":URI";
    pub const START_SAMPLE: &str = ":STARTSAMPLE";
    pub const END_SAMPLE: &str = ":ENDSAMPLE";
}

/// Playlist format version (`major.minor`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatVersion {
    pub major: u8,
    pub minor: u8,
}

impl FormatVersion {
    /// Original layout: no per-track flags on disk
    pub const V1_1: FormatVersion = FormatVersion { major: 1, minor: 1 };

    /// Layout written by current players
    pub const V1_2: FormatVersion = FormatVersion { major: 1, minor: 2 };

    pub const CURRENT: FormatVersion = Self::V1_2;

    /// Every version this codec reads and writes
    pub const SUPPORTED: &'static [FormatVersion] = &[Self::V1_1, Self::V1_2];

    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }

    /// Whether track blocks carry a flags word
    pub fn has_track_flags(&self) -> bool {
        self.minor >= 2
    }
}

impl Default for FormatVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

bitflags::bitflags! {
    /// Per-track flags as stored by the player
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TrackFlags: u32 {
        /// File holds more than one track; metadata may live in an external file
        const IS_SUBTRACK = 1 << 0;
        /// Tag writing is blocked
        const IS_READONLY = 1 << 1;
        const HAS_EMBEDDED_CUESHEET = 1 << 2;

        const TAG_ID3V1 = 1 << 8;
        const TAG_ID3V22 = 1 << 9;
        const TAG_ID3V23 = 1 << 10;
        const TAG_ID3V24 = 1 << 11;
        const TAG_APEV2 = 1 << 12;
        const TAG_VORBISCOMMENTS = 1 << 13;
        const TAG_CUESHEET = 1 << 14;
        const TAG_ICY = 1 << 15;
        const TAG_ITUNES = 1 << 16;

        const TAG_MASK = 0x000f_ff00;

        // Bits we don't name still round-trip
        const _ = !0;
    }
}

// Manual serde implementation for TrackFlags
impl Serialize for TrackFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.bits().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_allow_list() {
        assert!(FormatVersion::new(1, 1).is_supported());
        assert!(FormatVersion::new(1, 2).is_supported());
        assert!(!FormatVersion::new(1, 0).is_supported());
        assert!(!FormatVersion::new(1, 3).is_supported());
        assert!(!FormatVersion::new(2, 2).is_supported());
    }

    #[test]
    fn test_track_flags_field() {
        assert!(!FormatVersion::V1_1.has_track_flags());
        assert!(FormatVersion::V1_2.has_track_flags());
        assert_eq!(FormatVersion::default().to_string(), "1.2");
    }

    #[test]
    fn test_unknown_flag_bits_retained() {
        let flags = TrackFlags::from_bits_retain(0x8000_0101);
        assert!(flags.contains(TrackFlags::IS_SUBTRACK));
        assert!(flags.contains(TrackFlags::TAG_ID3V1));
        assert_eq!(flags.bits(), 0x8000_0101);
        assert_eq!(
            (flags & TrackFlags::TAG_MASK).bits(),
            TrackFlags::TAG_ID3V1.bits()
        );
    }
}
