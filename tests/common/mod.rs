//! Hand-assembled DBPL fixtures, built without the crate's encoder
#![allow(dead_code)]

/// One track block as it appears on disk
pub struct RawTrack {
    pub uri: &'static str,
    pub decoder: &'static str,
    pub track_num: i16,
    pub start_sample: i32,
    pub end_sample: i32,
    pub duration: f32,
    pub file_type: &'static str,
    pub replay_gain: [f32; 4],
    pub flags: u32,
    pub properties: Vec<(&'static str, Vec<u8>)>,
}

impl RawTrack {
    pub fn new(uri: &'static str) -> Self {
        Self {
            uri,
            decoder: "stdmpg",
            track_num: 0,
            start_sample: 0,
            end_sample: 0,
            duration: 0.0,
            file_type: "MP3",
            replay_gain: [0.0; 4],
            flags: 0,
            properties: Vec::new(),
        }
    }

    pub fn prop(mut self, key: &'static str, value: &str) -> Self {
        self.properties.push((key, value.as_bytes().to_vec()));
        self
    }

    pub fn raw_prop(mut self, key: &'static str, value: Vec<u8>) -> Self {
        self.properties.push((key, value));
        self
    }
}

/// Complete playlist file
pub struct RawPlaylist {
    pub minor: u8,
    pub tracks: Vec<RawTrack>,
    pub meta: Option<Vec<(&'static str, Vec<u8>)>>,
    pub trailer: Vec<u8>,
}

impl RawPlaylist {
    pub fn new(minor: u8) -> Self {
        Self {
            minor,
            tracks: Vec::new(),
            meta: None,
            trailer: Vec::new(),
        }
    }

    pub fn track(mut self, track: RawTrack) -> Self {
        self.tracks.push(track);
        self
    }

    pub fn meta(mut self, key: &'static str, value: &str) -> Self {
        self.meta
            .get_or_insert_with(Vec::new)
            .push((key, value.as_bytes().to_vec()));
        self
    }

    pub fn trailer(mut self, bytes: &[u8]) -> Self {
        self.trailer = bytes.to_vec();
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut out = b"DBPL".to_vec();
        out.push(1);
        out.push(self.minor);
        out.extend_from_slice(&(self.tracks.len() as u32).to_le_bytes());

        for index in 0..self.tracks.len() {
            out.extend(self.track_bytes(index));
        }

        if let Some(meta) = &self.meta {
            push_properties(&mut out, meta);
        }
        out.extend_from_slice(&self.trailer);
        out
    }

    /// On-disk bytes of one track block
    pub fn track_bytes(&self, index: usize) -> Vec<u8> {
        let track = &self.tracks[index];
        let mut out = Vec::new();
        out.extend_from_slice(&(track.uri.len() as u16).to_le_bytes());
        out.extend_from_slice(track.uri.as_bytes());
        out.push(track.decoder.len() as u8);
        out.extend_from_slice(track.decoder.as_bytes());
        out.extend_from_slice(&track.track_num.to_le_bytes());
        out.extend_from_slice(&track.start_sample.to_le_bytes());
        out.extend_from_slice(&track.end_sample.to_le_bytes());
        out.extend_from_slice(&track.duration.to_le_bytes());
        out.push(track.file_type.len() as u8);
        out.extend_from_slice(track.file_type.as_bytes());
        for gain in track.replay_gain {
            out.extend_from_slice(&gain.to_le_bytes());
        }
        if self.minor >= 2 {
            out.extend_from_slice(&track.flags.to_le_bytes());
        }
        push_properties(&mut out, &track.properties);
        out
    }

    /// Offset just past the last track block
    pub fn tracks_end(&self) -> usize {
        let mut meta_len = 0;
        if let Some(meta) = &self.meta {
            let mut block = Vec::new();
            push_properties(&mut block, meta);
            meta_len = block.len();
        }
        self.bytes().len() - meta_len - self.trailer.len()
    }
}

fn push_properties(out: &mut Vec<u8>, properties: &[(&'static str, Vec<u8>)]) {
    out.extend_from_slice(&(properties.len() as i16).to_le_bytes());
    for (key, value) in properties {
        out.extend_from_slice(&(key.len() as u16).to_le_bytes());
        out.extend_from_slice(key.as_bytes());
        out.extend_from_slice(&(value.len() as u16).to_le_bytes());
        out.extend_from_slice(value);
    }
}

/// The three-track playlist used across the integration tests
pub fn three_track_playlist() -> RawPlaylist {
    RawPlaylist::new(2)
        .track(
            RawTrack::new("/home/me/radio.mp3")
                .prop("title", "Radio")
                .prop(":FILE_SIZE", "1024"),
        )
        .track(
            RawTrack::new("/data/music/song.mp3")
                .prop("artist", "Someone")
                .prop("title", "Song")
                .prop("X-CustomTag", "foo"),
        )
        .track(RawTrack {
            track_num: 2,
            start_sample: 44100,
            end_sample: 88200,
            duration: 1.0,
            flags: 1,
            ..RawTrack::new("/home/me/album.flac")
                .prop("title", "Second")
                .prop(":DURATION", "1.5")
        })
        .meta("playlist_name", "Mix")
}

/// Three tracks as the player saves them: every track repeats its location
/// in a `:URI` property
pub fn player_written_playlist() -> RawPlaylist {
    RawPlaylist::new(2)
        .track(
            RawTrack::new("/home/me/radio.mp3")
                .prop(":URI", "/home/me/radio.mp3")
                .prop("title", "Radio"),
        )
        .track(
            RawTrack::new("/data/music/song.mp3")
                .prop(":URI", "/data/music/song.mp3")
                .prop("title", "Song")
                .prop("X-CustomTag", "foo"),
        )
        .track(
            RawTrack::new("/home/me/album.flac")
                .prop(":URI", "/home/me/album.flac")
                .prop(":STARTSAMPLE", "44100")
                .prop("title", "Second"),
        )
        .meta("playlist_name", "Mix")
}
