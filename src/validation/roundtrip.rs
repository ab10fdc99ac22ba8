//! Byte-exact round-trip validation

use crate::dbpl;
use crate::rewrite::collect_playlists;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of decoding and re-encoding one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripReport {
    pub path: PathBuf,
    pub tracks: usize,
    pub original_len: usize,
    pub encoded_len: usize,
    /// Offset of the first differing byte, if any
    pub first_mismatch: Option<usize>,
}

/// Outcome of checking a batch of files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifySummary {
    pub checked: usize,
    /// Files that differ after re-encoding or fail to decode at all
    pub failed: Vec<PathBuf>,
}

impl VerifySummary {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Check every playlist named in `inputs`, expanding directories.
///
/// A file that cannot be read or decoded counts as a failure; the remaining
/// files are still checked.
pub fn verify_all(inputs: &[PathBuf]) -> Result<VerifySummary> {
    let files = collect_playlists(inputs)?;
    let mut summary = VerifySummary::default();

    for file in files {
        summary.checked += 1;
        match verify_roundtrip(&file) {
            Ok(report) if report.is_identical() => {}
            Ok(_) => summary.failed.push(file),
            Err(e) => {
                log::error!("❌ {:#}", e);
                summary.failed.push(file);
            }
        }
    }

    Ok(summary)
}


impl RoundTripReport {
    pub fn is_identical(&self) -> bool {
        self.first_mismatch.is_none() && self.original_len == self.encoded_len
    }
}

/// Decode a playlist file, re-encode it and compare the bytes
///
/// # Arguments
/// * `path` - Playlist file to check
///
/// # Returns
/// A report; decode/encode failures are returned as errors
pub fn verify_roundtrip(path: &Path) -> Result<RoundTripReport> {
    log::info!("Validating round-trip of: {:?}", path);

    let original =
        fs::read(path).with_context(|| format!("Failed to read playlist: {:?}", path))?;
    log::debug!("Playlist file size: {} bytes", original.len());

    let playlist = dbpl::decode(&original)
        .with_context(|| format!("Failed to decode playlist: {:?}", path))?;
    log::info!(
        "Decoded DBPL {} with {} tracks",
        playlist.version(),
        playlist.len()
    );

    let encoded = dbpl::encode(&playlist)
        .with_context(|| format!("Failed to re-encode playlist: {:?}", path))?;

    let first_mismatch = first_difference(&original, &encoded);
    let report = RoundTripReport {
        path: path.to_path_buf(),
        tracks: playlist.len(),
        original_len: original.len(),
        encoded_len: encoded.len(),
        first_mismatch,
    };

    if report.is_identical() {
        log::info!("✅ {:?} re-encodes byte-for-byte", path);
    } else {
        log::error!(
            "❌ {:?} differs after re-encoding (first difference at {:?}, {} vs {} bytes)",
            path,
            report.first_mismatch,
            report.original_len,
            report.encoded_len
        );
    }

    Ok(report)
}

/// Offset of the first differing byte; a length difference counts at the shorter end
fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then_some(a.len().min(b.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_difference() {
        assert_eq!(first_difference(b"abc", b"abc"), None);
        assert_eq!(first_difference(b"abc", b"abd"), Some(2));
        assert_eq!(first_difference(b"abc", b"ab"), Some(2));
        assert_eq!(first_difference(b"", b"x"), Some(0));
    }
}
