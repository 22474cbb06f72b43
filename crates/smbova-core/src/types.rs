// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Smbova SambaPlugin.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Value, json};
use std::time::SystemTime;
use uuid::Uuid;

/// Name of the native service every call is addressed to.
pub const SERVICE_NAME: &str = "SambaPlugin";

/// Unique identifier for one forwarded call, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result value handed to a success or failure continuation.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Native side completed without a value.
    Empty,
    /// Any JSON-representable result (strings, booleans, entries, null).
    Json(Value),
    /// Raw bytes, delivered to the script side as an ArrayBuffer.
    Bytes(Vec<u8>),
}

impl Payload {
    /// Encode for the exec wire. Bytes travel base64-encoded.
    pub fn to_wire(&self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Json(value) => value.clone(),
            Self::Bytes(bytes) => json!({
                "type": "ArrayBuffer",
                "data": STANDARD.encode(bytes),
            }),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(Value::as_str)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Json(Value::String(value))
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Json(Value::String(value.to_owned()))
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Self {
        Self::Json(Value::Bool(value))
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

/// Kind of a share entry, serialised as its SMB type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
    Workgroup,
    Server,
    Share,
}

impl EntryKind {
    /// Numeric code exposed to the script side.
    pub fn code(&self) -> u8 {
        match self {
            Self::File => 0,
            Self::Directory => 1,
            Self::Workgroup => 2,
            Self::Server => 4,
            Self::Share => 8,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::File),
            1 => Some(Self::Directory),
            2 => Some(Self::Workgroup),
            4 => Some(Self::Server),
            8 => Some(Self::Share),
            _ => None,
        }
    }

    /// Whether the entry shows up in a directory listing.
    pub fn is_listed(&self) -> bool {
        matches!(self, Self::File | Self::Directory | Self::Share)
    }
}

impl Serialize for EntryKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for EntryKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Self::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown entry type {code}")))
    }
}

/// One row of a directory listing, or the result of a create/upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Display name without the trailing `/` of directories.
    pub name: String,
    /// Lower-cased extension; absent for freshly created directories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Full `smb://` URL.
    pub path: String,
    pub size: u64,
    /// Milliseconds since the Unix epoch.
    pub last_modified: i64,
}

/// Media groups drive gallery filtering and the download destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaGroup {
    Image,
    Audio,
    Video,
    Other,
}

const IMAGE_EXTS: &[&str] = &[
    "bmp", "cur", "eps", "gif", "ico", "jpe", "jpg", "jpeg", "jpz", "png", "svg", "tif", "tiff",
];
const AUDIO_EXTS: &[&str] = &[
    "aac", "aiff", "ape", "caf", "flac", "m3u", "m4a", "mp3", "ogg", "wav", "wma",
];
const VIDEO_EXTS: &[&str] = &[
    "3gp", "asf", "avi", "flv", "m3u8", "m4u", "m4v", "mkv", "mov", "mp4", "mpa", "mpe", "mpeg",
    "mpg", "ogm", "rm", "rmvb", "vob", "webm", "wmv",
];

impl MediaGroup {
    /// Classify by file extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        if IMAGE_EXTS.contains(&ext.as_str()) {
            Self::Image
        } else if AUDIO_EXTS.contains(&ext.as_str()) {
            Self::Audio
        } else if VIDEO_EXTS.contains(&ext.as_str()) {
            Self::Video
        } else {
            Self::Other
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self::from_extension(&extension_of(name))
    }
}

/// Transfer progress for uploads and downloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Share URL being transferred.
    pub path: String,
    /// Completed fraction in `0.0..=1.0`.
    pub fraction: f32,
}

/// Lower-cased text after the last `.` of `name`, or empty.
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(index) => name[index + 1..].to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Strip one trailing `/` (directory marker) from a share name.
pub fn display_name(name: &str) -> &str {
    name.strip_suffix('/').unwrap_or(name)
}

/// Milliseconds since the epoch for a filesystem timestamp.
pub fn epoch_millis(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp_millis()
}

/// Milliseconds since the epoch, now.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_kind_codes_round_trip() {
        for kind in [
            EntryKind::File,
            EntryKind::Directory,
            EntryKind::Workgroup,
            EntryKind::Server,
            EntryKind::Share,
        ] {
            assert_eq!(EntryKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(EntryKind::from_code(3), None);
    }

    #[test]
    fn entry_serialises_with_script_field_names() {
        let entry = Entry {
            name: "notes.txt".into(),
            ext: Some("txt".into()),
            kind: EntryKind::File,
            path: "smb://nas/docs/notes.txt".into(),
            size: 12,
            last_modified: 1_700_000_000_000,
        };
        let value = serde_json::to_value(&entry).expect("serialise");
        assert_eq!(value["type"], 0);
        assert_eq!(value["lastModified"], 1_700_000_000_000i64);
        assert_eq!(value["ext"], "txt");
    }

    #[test]
    fn directory_entry_omits_ext() {
        let entry = Entry {
            name: "photos".into(),
            ext: None,
            kind: EntryKind::Directory,
            path: "smb://nas/docs/photos/".into(),
            size: 0,
            last_modified: 0,
        };
        let value = serde_json::to_value(&entry).expect("serialise");
        assert!(value.get("ext").is_none());
        assert_eq!(value["type"], 1);
    }

    #[test]
    fn media_group_is_case_insensitive() {
        assert_eq!(MediaGroup::from_name("IMG_0001.JPG"), MediaGroup::Image);
        assert_eq!(MediaGroup::from_name("song.flac"), MediaGroup::Audio);
        assert_eq!(MediaGroup::from_name("movie.Mkv"), MediaGroup::Video);
        assert_eq!(MediaGroup::from_name("README"), MediaGroup::Other);
    }

    #[test]
    fn extension_uses_last_dot() {
        assert_eq!(extension_of("archive.tar.GZ"), "gz");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(display_name("photos/"), "photos");
        assert_eq!(display_name("a.txt"), "a.txt");
    }

    #[test]
    fn bytes_payload_travels_as_array_buffer() {
        let payload = Payload::Bytes(vec![0, 1, 2, 255]);
        let wire = payload.to_wire();
        assert_eq!(wire["type"], "ArrayBuffer");
        assert_eq!(wire["data"], "AAEC/w==");
    }

    #[test]
    fn empty_payload_is_null_on_the_wire() {
        assert_eq!(Payload::Empty.to_wire(), Value::Null);
    }
}
