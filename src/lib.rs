//! dbpl - DeaDBeeF playlist reader/writer
//!
//! This library decodes DeaDBeeF's binary `.dbpl` playlists into an editable
//! model and encodes them back byte-for-byte, so tools can rewrite track
//! locations without disturbing anything else in the file.

pub mod dbpl;
pub mod error;
pub mod model;
pub mod rewrite;
pub mod validation;

pub use dbpl::{decode, encode, FormatVersion, TrackFlags};
pub use error::{Error, Result};
pub use model::{Playlist, PropertyMap, PropertyValue, ReplayGain, Track};
pub use rewrite::{RewriteConfig, RewritePipeline};
