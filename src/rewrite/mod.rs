//! Bulk path substitution over playlist files

pub mod config;
pub mod pipeline;

pub use config::{RewriteConfig, RewriteRule};
pub use pipeline::{collect_playlists, RewritePipeline, RewriteReport};
