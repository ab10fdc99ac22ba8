//! DBPL encoding

use super::cursor::{narrow, Writer};
use super::types::{FormatVersion, MAGIC, MAX_DECODER_LEN, MAX_PROPERTY_LEN, MIN_TRACK_LEN};
use crate::error::{Error, Result};
use crate::model::{Playlist, PropertyMap, PropertyValue, Track};

/// Encode a playlist in the layout of its declared version
pub fn encode(playlist: &Playlist) -> Result<Vec<u8>> {
    let version = playlist.version();
    if !version.is_supported() {
        return Err(Error::UnsupportedVersion {
            major: version.major,
            minor: version.minor,
        });
    }

    let mut writer = Writer::with_capacity(10 + playlist.len() * MIN_TRACK_LEN * 4);

    writer.write_magic(MAGIC);
    writer.write_u8(version.major);
    writer.write_u8(version.minor);
    writer.write_u32(narrow(playlist.len(), "track count")?);

    for track in playlist.tracks() {
        write_track(&mut writer, track, version)?;
    }

    if let Some(properties) = playlist.properties() {
        write_properties(&mut writer, properties)?;
    }

    writer.write_bytes(playlist.trailer());

    log::debug!(
        "Encoded DBPL {}: {} tracks, {} bytes",
        version,
        playlist.len(),
        writer.position()
    );
    Ok(writer.into_bytes())
}

fn write_track(writer: &mut Writer, track: &Track, version: FormatVersion) -> Result<()> {
    writer.write_prefixed_u16(track.block_uri().as_bytes(), "uri")?;

    if track.decoder.len() >= MAX_DECODER_LEN {
        return Err(Error::FieldTooLong {
            field: "decoder",
            len: track.decoder.len(),
            limit: MAX_DECODER_LEN - 1,
        });
    }
    writer.write_prefixed_u8(track.decoder.as_bytes(), "decoder")?;

    let (start_sample, end_sample) = track.block_samples();
    writer.write_i16(track.track_num);
    writer.write_i32(start_sample);
    writer.write_i32(end_sample);
    writer.write_f32(track.duration);

    writer.write_prefixed_u8(track.file_type.as_bytes(), "file type")?;
    writer.write_f32(track.replay_gain.album_gain);
    writer.write_f32(track.replay_gain.album_peak);
    writer.write_f32(track.replay_gain.track_gain);
    writer.write_f32(track.replay_gain.track_peak);

    if version.has_track_flags() {
        writer.write_u32(track.flags.bits());
    }

    write_properties(writer, track.properties())
}

fn write_properties(writer: &mut Writer, properties: &PropertyMap) -> Result<()> {
    writer.write_i16(narrow(properties.len(), "property count")?);

    for (key, value) in properties.iter() {
        if key.len() >= MAX_PROPERTY_LEN {
            return Err(Error::FieldTooLong {
                field: "property key",
                len: key.len(),
                limit: MAX_PROPERTY_LEN - 1,
            });
        }
        writer.write_prefixed_u16(key.as_bytes(), "property key")?;

        let wire = value.to_wire();
        // The player drops text at or above the limit; only raw bytes may go there
        let is_text = !matches!(value, PropertyValue::Bytes(_));
        if is_text && wire.len() >= MAX_PROPERTY_LEN {
            return Err(Error::FieldTooLong {
                field: "property value",
                len: wire.len(),
                limit: MAX_PROPERTY_LEN - 1,
            });
        }
        writer.write_prefixed_u16(&wire, "property value")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbpl::decode;

    #[test]
    fn test_empty_playlist_layout() {
        let playlist = Playlist::default();
        let bytes = encode(&playlist).unwrap();
        assert_eq!(bytes, b"DBPL\x01\x02\x00\x00\x00\x00\x00\x00");
    }

    #[test]
    fn test_track_block_layout_v1_2() {
        let mut playlist = Playlist::default();
        let mut track = Track::new("/a.mp3");
        track.decoder = "stdmpg".to_string();
        track.file_type = "MP3".to_string();
        track.set_property("title", "T").unwrap();
        playlist.push_track(track);

        let bytes = encode(&playlist).unwrap();

        let mut expected = b"DBPL\x01\x02\x01\x00\x00\x00".to_vec();
        expected.extend_from_slice(&[6, 0]);
        expected.extend_from_slice(b"/a.mp3");
        expected.push(6);
        expected.extend_from_slice(b"stdmpg");
        expected.extend_from_slice(&0i16.to_le_bytes()); // track number
        expected.extend_from_slice(&[0; 8]); // start/end sample
        expected.extend_from_slice(&0f32.to_le_bytes()); // duration
        expected.push(3);
        expected.extend_from_slice(b"MP3");
        expected.extend_from_slice(&[0; 16]); // replaygain
        expected.extend_from_slice(&0u32.to_le_bytes()); // flags
        expected.extend_from_slice(&1i16.to_le_bytes());
        expected.extend_from_slice(&[5, 0]);
        expected.extend_from_slice(b"title");
        expected.extend_from_slice(&[1, 0]);
        expected.extend_from_slice(b"T");
        expected.extend_from_slice(&0i16.to_le_bytes()); // playlist block

        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_v1_1_omits_flags() {
        let mut playlist = Playlist::new(FormatVersion::V1_1);
        playlist.push_track(Track::new(""));
        let v11 = encode(&playlist).unwrap();

        playlist.set_version(FormatVersion::V1_2).unwrap();
        let v12 = encode(&playlist).unwrap();

        assert_eq!(v12.len(), v11.len() + 4);
        assert_eq!(v11[5], 1);
        assert_eq!(v12[5], 2);
    }

    #[test]
    fn test_decoder_too_long() {
        let mut playlist = Playlist::default();
        let mut track = Track::new("/a.mp3");
        track.decoder = "a-very-long-decoder-name".to_string();
        playlist.push_track(track);

        assert!(matches!(
            encode(&playlist),
            Err(Error::FieldTooLong { field: "decoder", limit: 19, .. })
        ));
    }

    #[test]
    fn test_oversized_text_value_rejected() {
        let mut playlist = Playlist::default();
        let mut track = Track::new("/a.mp3");
        track.set_property("lyrics", "la".repeat(MAX_PROPERTY_LEN)).unwrap();
        playlist.push_track(track);

        assert!(matches!(
            encode(&playlist),
            Err(Error::FieldTooLong { field: "property value", .. })
        ));
    }

    #[test]
    fn test_raw_bytes_may_exceed_text_limit() {
        let mut playlist = Playlist::default();
        let mut track = Track::new("/a.mp3");
        track
            .set_property("cover", vec![0u8; MAX_PROPERTY_LEN + 10])
            .unwrap();
        playlist.push_track(track);

        let bytes = encode(&playlist).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, playlist);
    }

    #[test]
    fn test_too_many_properties() {
        let mut properties = PropertyMap::new();
        for i in 0..(i16::MAX as usize + 1) {
            properties.push_unchecked(format!("k{}", i), PropertyValue::from("v"));
        }
        let mut playlist = Playlist::default();
        playlist.push_track(Track::from_parts(
            "/a.mp3".to_string(),
            String::new(),
            0,
            0,
            0,
            0.0,
            String::new(),
            Default::default(),
            Default::default(),
            properties,
        ));

        assert!(matches!(
            encode(&playlist),
            Err(Error::IntegerOverflow { field: "property count", .. })
        ));
    }
}
