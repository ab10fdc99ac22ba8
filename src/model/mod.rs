//! In-memory playlist representation
//!
//! These types are independent of the on-disk layout; `crate::dbpl`
//! converts between them and bytes.

mod playlist;
mod property;
mod track;
pub mod uri;

pub use playlist::Playlist;
pub use property::{PropertyMap, PropertyValue};
pub use track::{ReplayGain, Track};
