use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dbpl::validation::verify_all;
use dbpl::{Playlist, RewriteConfig, RewritePipeline};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "dbpl")]
#[command(about = "Inspect and rewrite DeaDBeeF playlists (.dbpl)", long_about = None)]
#[command(version)]
struct Args {
    /// Verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tracks of a playlist
    List {
        /// Playlist file
        file: String,
    },

    /// Print a playlist as JSON
    Dump {
        /// Playlist file
        file: String,
    },

    /// Replace a path prefix in every track location
    Rewrite {
        /// Prefix to replace (e.g. /data/music)
        #[arg(long)]
        from: String,

        /// Replacement prefix (e.g. /Volumes/music)
        #[arg(long)]
        to: String,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Keep a .bak copy of each rewritten playlist
        #[arg(long)]
        backup: bool,

        /// Playlist files or directories containing them
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Check that playlists re-encode byte-for-byte
    Verify {
        /// Playlist files or directories containing them
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Command::List { file } => list(&expand(&file)),
        Command::Dump { file } => dump(&expand(&file)),
        Command::Rewrite {
            from,
            to,
            dry_run,
            backup,
            paths,
        } => {
            let config = RewriteConfig::new()
                .with_rule(shellexpand::tilde(&from).into_owned(), shellexpand::tilde(&to).into_owned())
                .dry_run(dry_run)
                .with_backup(backup);
            rewrite(config, &expand_all(&paths))
        }
        Command::Verify { paths } => verify(&expand_all(&paths)),
    }
}

/// Expand ~ in a path argument
fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

fn expand_all(paths: &[String]) -> Vec<PathBuf> {
    paths.iter().map(|p| expand(p)).collect()
}

fn list(path: &Path) -> Result<()> {
    let playlist =
        Playlist::load(path).with_context(|| format!("Failed to load playlist: {:?}", path))?;

    log::info!(
        "{:?}: DBPL {}, {} tracks",
        path,
        playlist.version(),
        playlist.len()
    );

    for (i, track) in playlist.tracks().iter().enumerate() {
        println!(
            "{:4}  {:>8}  {}",
            i + 1,
            format_duration(track.duration),
            track.uri()
        );
    }

    Ok(())
}

fn dump(path: &Path) -> Result<()> {
    let playlist =
        Playlist::load(path).with_context(|| format!("Failed to load playlist: {:?}", path))?;
    let json = serde_json::to_string_pretty(&playlist).context("Failed to serialize playlist")?;
    println!("{}", json);
    Ok(())
}

fn rewrite(config: RewriteConfig, paths: &[PathBuf]) -> Result<()> {
    if config.dry_run {
        log::info!("Dry run - no files will be written");
    }

    let pipeline = RewritePipeline::new(config)?;
    let reports = pipeline.rewrite_all(paths)?;

    let rewritten: usize = reports.iter().map(|r| r.rewritten).sum();
    let saved = reports.iter().filter(|r| r.saved).count();
    log::info!(
        "Rewrote {} track(s) across {} playlist(s); {} file(s) written",
        rewritten,
        reports.len(),
        saved
    );

    Ok(())
}

fn verify(paths: &[PathBuf]) -> Result<()> {
    let summary = verify_all(paths)?;

    if !summary.is_clean() {
        for file in &summary.failed {
            log::warn!("Failed: {:?}", file);
        }
        anyhow::bail!(
            "{} of {} playlist(s) did not round-trip",
            summary.failed.len(),
            summary.checked
        );
    }

    log::info!("✅ All {} playlist(s) round-trip byte-for-byte", summary.checked);
    Ok(())
}

/// Format seconds as m:ss
fn format_duration(seconds: f32) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "-".to_string();
    }
    let total = seconds.round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
