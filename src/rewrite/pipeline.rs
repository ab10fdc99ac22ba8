//! Path rewrite orchestration

use super::config::RewriteConfig;
use crate::model::Playlist;
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of playlist files picked up from directories
const PLAYLIST_EXTENSION: &str = "dbpl";

/// Outcome of rewriting one playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteReport {
    /// Source file, when the playlist came from disk
    pub path: Option<PathBuf>,
    pub tracks: usize,
    pub rewritten: usize,
    /// Whether the file on disk was replaced
    pub saved: bool,
}

/// Applies a `RewriteConfig` to playlists in memory or on disk
pub struct RewritePipeline {
    config: RewriteConfig,
}

impl RewritePipeline {
    pub fn new(config: RewriteConfig) -> Result<Self> {
        if config.rules.is_empty() {
            bail!("No rewrite rules configured");
        }
        if let Some(rule) = config.rules.iter().find(|r| r.from.is_empty()) {
            bail!("Rewrite rule with empty source prefix (target {:?})", rule.to);
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Rewrite track locations in place
    pub fn rewrite_playlist(&self, playlist: &mut Playlist) -> RewriteReport {
        let mut rewritten = 0;

        for (i, track) in playlist.tracks_mut().iter_mut().enumerate() {
            let before = track.uri().to_string();
            let matched = self
                .config
                .rules
                .iter()
                .any(|rule| track.replace_path_prefix(&rule.from, &rule.to));

            if matched {
                log::debug!("[{}] {} -> {}", i + 1, before, track.uri());
                rewritten += 1;
            }
        }

        RewriteReport {
            path: None,
            tracks: playlist.len(),
            rewritten,
            saved: false,
        }
    }

    /// Load, rewrite and save one playlist file
    pub fn rewrite_file(&self, path: &Path) -> Result<RewriteReport> {
        let mut playlist =
            Playlist::load(path).with_context(|| format!("Failed to read playlist: {:?}", path))?;

        let mut report = self.rewrite_playlist(&mut playlist);
        report.path = Some(path.to_path_buf());

        log::info!(
            "{:?}: {}/{} tracks rewritten",
            path,
            report.rewritten,
            report.tracks
        );

        if report.rewritten == 0 || self.config.dry_run {
            return Ok(report);
        }

        if self.config.backup {
            let backup = backup_path(path);
            fs::copy(path, &backup)
                .with_context(|| format!("Failed to back up {:?} to {:?}", path, backup))?;
            log::debug!("Backup written to {:?}", backup);
        }

        playlist
            .save(path)
            .with_context(|| format!("Failed to write playlist: {:?}", path))?;
        report.saved = true;

        Ok(report)
    }

    /// Rewrite every playlist named in `inputs`, expanding directories.
    ///
    /// Files are independent, so they are processed in parallel.
    pub fn rewrite_all(&self, inputs: &[PathBuf]) -> Result<Vec<RewriteReport>> {
        let files = collect_playlists(inputs)?;
        log::info!("Rewriting {} playlist file(s)", files.len());

        files.par_iter().map(|path| self.rewrite_file(path)).collect()
    }
}

/// Expand directories into the `.dbpl` files they contain (sorted per directory)
pub fn collect_playlists(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input).follow_links(true) {
                let entry =
                    entry.with_context(|| format!("Failed to scan directory: {:?}", input))?;
                let is_playlist = entry.file_type().is_file()
                    && entry
                        .path()
                        .extension()
                        .map(|e| e.eq_ignore_ascii_case(PLAYLIST_EXTENSION))
                        .unwrap_or(false);
                if is_playlist {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            log::debug!("Found {} playlist(s) under {:?}", found.len(), input);
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }

    Ok(files)
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}
