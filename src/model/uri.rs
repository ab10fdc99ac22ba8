//! Conversion between stored track URIs and filesystem paths
//!
//! The player stores local files either as plain paths (`/music/a.mp3`) or as
//! `file://` URIs with percent-encoded segments. Rewrites keep whichever style
//! the track already uses.

use std::borrow::Cow;

const FILE_SCHEME: &str = "file://";

/// How a URI spells its location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriStyle {
    /// Stored verbatim (local paths, network streams)
    Plain,
    /// `file://` followed by a percent-encoded path
    FileUri,
}

impl UriStyle {
    pub fn of(uri: &str) -> Self {
        if uri.starts_with(FILE_SCHEME) {
            UriStyle::FileUri
        } else {
            UriStyle::Plain
        }
    }
}

/// Path a URI refers to.
///
/// `file://` URIs are percent-decoded; anything else (including undecodable
/// escapes) is returned as stored.
pub fn to_path(uri: &str) -> Cow<'_, str> {
    match uri.strip_prefix(FILE_SCHEME) {
        Some(path) => urlencoding::decode(path).unwrap_or(Cow::Borrowed(path)),
        None => Cow::Borrowed(uri),
    }
}

/// Spell `path` in the given style.
pub fn from_path(path: &str, style: UriStyle) -> String {
    match style {
        UriStyle::Plain => path.to_string(),
        UriStyle::FileUri => {
            let encoded: Vec<Cow<'_, str>> = path.split('/').map(urlencoding::encode).collect();
            format!("{}{}", FILE_SCHEME, encoded.join("/"))
        }
    }
}

/// Replace a leading path prefix, matching whole path segments only.
///
/// Returns `None` when `path` is not under `from`.
pub fn replace_prefix(path: &str, from: &str, to: &str) -> Option<String> {
    let rest = path.strip_prefix(from)?;
    let on_boundary = rest.is_empty() || rest.starts_with('/') || from.ends_with('/');
    if !on_boundary {
        return None;
    }
    Some(format!("{}{}", to, rest))
}
