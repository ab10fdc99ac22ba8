use super::property::{PropertyMap, PropertyValue};
use super::uri::{self, UriStyle};
use crate::dbpl::types::{keys, TrackFlags};
use crate::error::Result;
use serde::Serialize;
use std::path::PathBuf;

/// ReplayGain values as stored in the track block.
///
/// Kept as the raw floats from disk; the player treats gain 0 and peak 0/1
/// as "unset".
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ReplayGain {
    pub album_gain: f32,
    pub album_peak: f32,
    pub track_gain: f32,
    pub track_peak: f32,
}

/// One playlist entry.
///
/// Equality compares block floats by bit pattern, so a decoded track with a
/// NaN duration still equals its re-decoded copy.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Track {
    /// Location stored in the track block (see [`Track::uri`])
    uri: String,

    /// Decoder plugin id (e.g. "ffap", "stdmpg"); under 20 bytes
    pub decoder: String,

    /// Track number within a multi-track file (CUE sheets)
    pub track_num: i16,

    start_sample: i32,
    end_sample: i32,

    /// Duration in seconds
    pub duration: f32,

    /// Legacy file type string (e.g. "MP3")
    pub file_type: String,

    pub replay_gain: ReplayGain,

    pub flags: TrackFlags,

    /// Metadata in on-disk order
    properties: PropertyMap,
}

impl Track {
    /// Create a track pointing at `uri` with no metadata
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        uri: String,
        decoder: String,
        track_num: i16,
        start_sample: i32,
        end_sample: i32,
        duration: f32,
        file_type: String,
        replay_gain: ReplayGain,
        flags: TrackFlags,
        properties: PropertyMap,
    ) -> Self {
        Self {
            uri,
            decoder,
            track_num,
            start_sample,
            end_sample,
            duration,
            file_type,
            replay_gain,
            flags,
            properties,
        }
    }

    /// Effective location of the track.
    ///
    /// Read from the `:URI` property when it holds text, otherwise from the
    /// track block.
    pub fn uri(&self) -> &str {
        match self.properties.get(keys::URI) {
            Some(PropertyValue::Text(uri)) => uri,
            _ => &self.uri,
        }
    }

    /// Point the track somewhere else.
    ///
    /// The new location goes into the track block and into an existing
    /// `:URI` property (one is never added). Setting the current location is
    /// a no-op, so `set_uri(uri())` never changes the encoded bytes.
    pub fn set_uri(&mut self, uri: impl Into<String>) {
        let uri = uri.into();
        if uri == self.uri() {
            return;
        }
        if self.has_text_property(keys::URI) {
            self.properties.replace(keys::URI, PropertyValue::Text(uri.clone()));
        }
        self.uri = uri;
    }

    /// Location stored in the track block, ignoring any `:URI` override
    pub fn block_uri(&self) -> &str {
        &self.uri
    }

    /// Filesystem path of the track, with `file://` escaping removed
    pub fn path(&self) -> PathBuf {
        PathBuf::from(uri::to_path(self.uri()).into_owned())
    }

    /// Set the filesystem path, spelled the way the current URI is spelled
    pub fn set_path(&mut self, path: &str) {
        let style = UriStyle::of(self.uri());
        self.set_uri(uri::from_path(path, style));
    }

    /// Swap a leading directory of the track's path. Returns whether it matched.
    pub fn replace_path_prefix(&mut self, from: &str, to: &str) -> bool {
        let current = uri::to_path(self.uri()).into_owned();
        match uri::replace_prefix(&current, from, to) {
            Some(path) => {
                self.set_path(&path);
                true
            }
            None => false,
        }
    }

    /// First sample of the track within its file (`:STARTSAMPLE` wins)
    pub fn start_sample(&self) -> i64 {
        self.sample_property(keys::START_SAMPLE)
            .unwrap_or(self.start_sample.into())
    }

    /// Same rule as [`Track::set_uri`]: block field plus any `:STARTSAMPLE`.
    pub fn set_start_sample(&mut self, value: i32) {
        if self.start_sample() == i64::from(value) {
            return;
        }
        if self.properties.contains_key(keys::START_SAMPLE) {
            self.properties
                .replace(keys::START_SAMPLE, PropertyValue::Integer(value.into()));
        }
        self.start_sample = value;
    }

    /// Last sample of the track within its file (`:ENDSAMPLE` wins)
    pub fn end_sample(&self) -> i64 {
        self.sample_property(keys::END_SAMPLE)
            .unwrap_or(self.end_sample.into())
    }

    pub fn set_end_sample(&mut self, value: i32) {
        if self.end_sample() == i64::from(value) {
            return;
        }
        if self.properties.contains_key(keys::END_SAMPLE) {
            self.properties
                .replace(keys::END_SAMPLE, PropertyValue::Integer(value.into()));
        }
        self.end_sample = value;
    }

    /// Raw sample range from the track block
    pub fn block_samples(&self) -> (i32, i32) {
        (self.start_sample, self.end_sample)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Add or update a property.
    ///
    /// Existing properties keep their type; a value of another type fails
    /// with `PropertyTypeMismatch`.
    pub fn set_property(&mut self, name: &str, value: impl Into<PropertyValue>) -> Result<()> {
        self.properties.set(name, value.into())
    }

    pub fn remove_property(&mut self, name: &str) -> Option<PropertyValue> {
        self.properties.remove(name)
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Properties the player persists when it saves the playlist.
    ///
    /// Keys starting with `_` or `!` are runtime-only markers.
    pub fn writable_properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties
            .iter()
            .filter(|(key, _)| !key.starts_with('_') && !key.starts_with('!'))
    }

    /// Title tag, if any
    pub fn title(&self) -> Option<&str> {
        self.properties.get("title").and_then(|v| v.as_text())
    }

    fn has_text_property(&self, name: &str) -> bool {
        matches!(self.properties.get(name), Some(PropertyValue::Text(_)))
    }

    fn sample_property(&self, name: &str) -> Option<i64> {
        self.properties.get(name).and_then(|v| v.as_integer())
    }
}

impl PartialEq for ReplayGain {
    fn eq(&self, other: &Self) -> bool {
        self.album_gain.to_bits() == other.album_gain.to_bits()
            && self.album_peak.to_bits() == other.album_peak.to_bits()
            && self.track_gain.to_bits() == other.track_gain.to_bits()
            && self.track_peak.to_bits() == other.track_peak.to_bits()
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
            && self.decoder == other.decoder
            && self.track_num == other.track_num
            && self.start_sample == other.start_sample
            && self.end_sample == other.end_sample
            && self.duration.to_bits() == other.duration.to_bits()
            && self.file_type == other.file_type
            && self.replay_gain == other.replay_gain
            && self.flags == other.flags
            && self.properties == other.properties
    }
}
