use super::property::{PropertyMap, PropertyValue};
use super::track::Track;
use crate::dbpl::{self, FormatVersion};
use crate::error::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Represents one `.dbpl` file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Playlist {
    version: FormatVersion,

    /// Tracks in file order
    tracks: Vec<Track>,

    /// Playlist-level metadata block. `None` when the file ends after the
    /// last track, which older players produce.
    properties: Option<PropertyMap>,

    /// Bytes after the metadata block, re-emitted unchanged
    #[serde(skip)]
    trailer: Vec<u8>,
}

impl Playlist {
    /// Create an empty playlist
    pub fn new(version: FormatVersion) -> Self {
        Self {
            version,
            tracks: Vec::new(),
            properties: Some(PropertyMap::new()),
            trailer: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        version: FormatVersion,
        tracks: Vec<Track>,
        properties: Option<PropertyMap>,
        trailer: Vec<u8>,
    ) -> Self {
        Self {
            version,
            tracks,
            properties,
            trailer,
        }
    }

    /// Read and decode a playlist file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading playlist: {:?}", path);
        let data = fs::read(path)?;
        dbpl::decode(&data)
    }

    /// Encode and write the playlist.
    ///
    /// The bytes go to a sibling temp file that is renamed over `path`. On
    /// any failure the temp file is removed and an existing `path` is left
    /// untouched.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = dbpl::encode(self)?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = Path::new(&tmp_name);

        if let Err(e) = fs::write(tmp_path, &data).and_then(|()| fs::rename(tmp_path, path)) {
            let _ = fs::remove_file(tmp_path);
            return Err(e.into());
        }

        log::debug!("Saved playlist: {:?} ({} bytes)", path, data.len());
        Ok(())
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    /// Change the layout used by the next encode
    pub fn set_version(&mut self, version: FormatVersion) -> Result<()> {
        if !version.is_supported() {
            return Err(Error::UnsupportedVersion {
                major: version.major,
                minor: version.minor,
            });
        }
        self.version = version;
        Ok(())
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    /// Add a track at the end
    pub fn push_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Insert a track before `index`; panics if `index > len()` like `Vec::insert`
    pub fn insert_track(&mut self, index: usize, track: Track) {
        self.tracks.insert(index, track);
    }

    pub fn remove_track(&mut self, index: usize) -> Option<Track> {
        if index < self.tracks.len() {
            Some(self.tracks.remove(index))
        } else {
            None
        }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Playlist-level metadata, if the file has a metadata block
    pub fn properties(&self) -> Option<&PropertyMap> {
        self.properties.as_ref()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.as_ref().and_then(|p| p.get(name))
    }

    /// Set a playlist-level property, adding the metadata block if missing
    pub fn set_property(&mut self, name: &str, value: impl Into<PropertyValue>) -> Result<()> {
        self.properties
            .get_or_insert_with(PropertyMap::new)
            .set(name, value.into())
    }

    /// Opaque bytes found after the metadata block
    pub fn trailer(&self) -> &[u8] {
        &self.trailer
    }

    /// Swap a leading directory on every track. Returns how many tracks changed.
    pub fn rewrite_prefix(&mut self, from: &str, to: &str) -> usize {
        self.tracks
            .iter_mut()
            .map(|track| track.replace_path_prefix(from, to))
            .filter(|&changed| changed)
            .count()
    }
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new(FormatVersion::CURRENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_creation() {
        let playlist = Playlist::default();
        assert_eq!(playlist.len(), 0);
        assert!(playlist.is_empty());
        assert_eq!(playlist.version(), FormatVersion::V1_2);
        assert!(playlist.properties().is_some());
    }

    #[test]
    fn test_track_list_editing() {
        let mut playlist = Playlist::default();
        playlist.push_track(Track::new("/a.mp3"));
        playlist.push_track(Track::new("/c.mp3"));
        playlist.insert_track(1, Track::new("/b.mp3"));

        let uris: Vec<&str> = playlist.tracks().iter().map(|t| t.uri()).collect();
        assert_eq!(uris, vec!["/a.mp3", "/b.mp3", "/c.mp3"]);

        let removed = playlist.remove_track(0).unwrap();
        assert_eq!(removed.uri(), "/a.mp3");
        assert!(playlist.remove_track(5).is_none());
        assert_eq!(playlist.len(), 2);
    }

    #[test]
    fn test_set_version_checks_allow_list() {
        let mut playlist = Playlist::default();
        playlist.set_version(FormatVersion::V1_1).unwrap();
        assert_eq!(playlist.version(), FormatVersion::V1_1);

        assert!(matches!(
            playlist.set_version(FormatVersion::new(1, 9)),
            Err(Error::UnsupportedVersion { major: 1, minor: 9 })
        ));
        assert_eq!(playlist.version(), FormatVersion::V1_1);
    }

    #[test]
    fn test_rewrite_prefix_counts_changes() {
        let mut playlist = Playlist::default();
        playlist.push_track(Track::new("/data/music/a.mp3"));
        playlist.push_track(Track::new("/other/b.mp3"));
        playlist.push_track(Track::new("/data/music/c.mp3"));

        assert_eq!(playlist.rewrite_prefix("/data/music", "/Volumes/music"), 2);
        assert_eq!(playlist.track(0).unwrap().uri(), "/Volumes/music/a.mp3");
        assert_eq!(playlist.track(1).unwrap().uri(), "/other/b.mp3");
    }

    #[test]
    fn test_failed_save_leaves_no_temp_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        // A non-empty directory at the target makes the final rename fail
        let target = temp_dir.path().join("Default.dbpl");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        let mut playlist = Playlist::default();
        playlist.push_track(Track::new("/a.mp3"));

        assert!(matches!(playlist.save(&target), Err(Error::Io(_))));
        assert!(!temp_dir.path().join("Default.dbpl.tmp").exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn test_save_into_missing_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let target = temp_dir.path().join("missing").join("Default.dbpl");

        assert!(matches!(Playlist::default().save(&target), Err(Error::Io(_))));
        assert!(!temp_dir.path().join("missing").exists());
    }

    #[test]
    fn test_playlist_property_creates_block() {
        let mut playlist = Playlist::from_parts(FormatVersion::V1_2, Vec::new(), None, Vec::new());
        assert!(playlist.property("name").is_none());
        playlist.set_property("name", "Road trip").unwrap();
        assert_eq!(
            playlist.property("name").and_then(|v| v.as_text()),
            Some("Road trip")
        );
    }
}
