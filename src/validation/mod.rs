//! Validation utilities
//!
//! Checks that playlists survive a decode/encode cycle unchanged

mod roundtrip;

pub use roundtrip::{verify_all, verify_roundtrip, RoundTripReport, VerifySummary};
