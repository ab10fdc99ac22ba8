//! DBPL decoding

use super::cursor::Cursor;
use super::types::{
    FormatVersion, TrackFlags, FLOAT_KEYS, INTEGER_KEYS, MAGIC, MAX_DECODER_LEN,
    MAX_PROPERTY_LEN, MIN_TRACK_LEN,
};
use crate::error::{Error, Result};
use crate::model::{Playlist, PropertyMap, PropertyValue, ReplayGain, Track};

/// Decode a complete playlist file.
///
/// Either the whole input is understood or an error is returned; no partial
/// playlist is ever produced.
pub fn decode(data: &[u8]) -> Result<Playlist> {
    let mut cursor = Cursor::new(data);

    read_magic(&mut cursor)?;
    let version = read_version(&mut cursor)?;
    let track_count = cursor.read_u32()? as usize;

    log::debug!(
        "DBPL {} header: {} tracks, {} bytes",
        version,
        track_count,
        data.len()
    );

    // Don't trust the declared count for the allocation
    let mut tracks = Vec::with_capacity(track_count.min(cursor.remaining() / MIN_TRACK_LEN));
    for _ in 0..track_count {
        tracks.push(read_track(&mut cursor, version)?);
    }

    let properties = if cursor.is_empty() {
        log::debug!("No playlist metadata block");
        None
    } else {
        Some(read_properties(&mut cursor)?)
    };

    let trailer = cursor.read_rest().to_vec();
    if !trailer.is_empty() {
        log::debug!("Keeping {} trailing bytes", trailer.len());
    }

    Ok(Playlist::from_parts(version, tracks, properties, trailer))
}

fn read_magic(cursor: &mut Cursor<'_>) -> Result<()> {
    if cursor.remaining() < MAGIC.len() {
        return Err(Error::InvalidFormat(format!(
            "missing DBPL signature ({} bytes of input)",
            cursor.remaining()
        )));
    }
    let magic = cursor.read_magic()?;
    if &magic != MAGIC {
        return Err(Error::InvalidFormat(format!(
            "bad signature: expected {:?}, found {:?}",
            MAGIC, magic
        )));
    }
    Ok(())
}

fn read_version(cursor: &mut Cursor<'_>) -> Result<FormatVersion> {
    let major = cursor.read_u8()?;
    let minor = cursor.read_u8()?;
    let version = FormatVersion::new(major, minor);
    if !version.is_supported() {
        return Err(Error::UnsupportedVersion { major, minor });
    }
    Ok(version)
}

fn read_track(cursor: &mut Cursor<'_>, version: FormatVersion) -> Result<Track> {
    let uri = cursor.read_string_u16("uri")?;

    let decoder_offset = cursor.position();
    let decoder_len = cursor.read_u8()? as usize;
    if decoder_len >= MAX_DECODER_LEN {
        return Err(Error::MalformedString {
            offset: decoder_offset,
            field: "decoder",
            reason: format!("length {} exceeds limit of {}", decoder_len, MAX_DECODER_LEN - 1),
        });
    }
    let decoder = cursor.read_str(decoder_len, "decoder")?;

    let track_num = cursor.read_i16()?;
    let start_sample = cursor.read_i32()?;
    let end_sample = cursor.read_i32()?;
    let duration = cursor.read_f32()?;

    let file_type = cursor.read_string_u8("file type")?;
    let replay_gain = ReplayGain {
        album_gain: cursor.read_f32()?,
        album_peak: cursor.read_f32()?,
        track_gain: cursor.read_f32()?,
        track_peak: cursor.read_f32()?,
    };

    let flags = if version.has_track_flags() {
        TrackFlags::from_bits_retain(cursor.read_u32()?)
    } else if start_sample > 0 || end_sample > 0 || track_num > 0 {
        // 1.1 files have no flags word; the player infers this one
        TrackFlags::IS_SUBTRACK
    } else {
        TrackFlags::empty()
    };

    let properties = read_properties(cursor)?;

    Ok(Track::from_parts(
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
    ))
}

/// Read a count-prefixed block of key/value entries
fn read_properties(cursor: &mut Cursor<'_>) -> Result<PropertyMap> {
    let count = cursor.read_i16()?;
    let count = usize::try_from(count).map_err(|_| Error::IntegerOverflow {
        field: "property count",
        value: count.into(),
    })?;

    let mut properties = PropertyMap::with_capacity(count);
    for _ in 0..count {
        let key_offset = cursor.position();
        let key_len = cursor.read_u16()? as usize;
        if key_len >= MAX_PROPERTY_LEN {
            return Err(Error::MalformedString {
                offset: key_offset,
                field: "property key",
                reason: format!("length {} exceeds limit of {}", key_len, MAX_PROPERTY_LEN - 1),
            });
        }
        let key = cursor.read_str(key_len, "property key")?;

        let value_len = cursor.read_u16()? as usize;
        let raw = cursor.read_bytes(value_len)?;

        if properties.contains_key(&key) {
            return Err(Error::InvalidFormat(format!(
                "duplicate property {:?} at offset {:#x}",
                key, key_offset
            )));
        }

        let value = classify_value(&key, raw);
        if let PropertyValue::Bytes(ref b) = value {
            log::debug!("Property {:?} kept as {} raw bytes", key, b.len());
        }
        properties.push_unchecked(key, value);
    }

    Ok(properties)
}

/// Pick the type tag for a property value.
///
/// Numeric keys only become typed when the text is exactly what the number
/// renders back to, so encoding reproduces the original bytes.
fn classify_value(key: &str, raw: &[u8]) -> PropertyValue {
    if raw.len() >= MAX_PROPERTY_LEN {
        return PropertyValue::Bytes(raw.to_vec());
    }
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text,
        Err(_) => return PropertyValue::Bytes(raw.to_vec()),
    };

    if INTEGER_KEYS.contains(&key) {
        if let Ok(v) = text.parse::<i64>() {
            if v.to_string() == text {
                return PropertyValue::Integer(v);
            }
        }
    } else if FLOAT_KEYS.contains(&key) {
        if let Ok(v) = text.parse::<f64>() {
            if v.is_finite() && v.to_string() == text {
                return PropertyValue::Float(v);
            }
        }
    }

    PropertyValue::Text(text.to_string())
}
