//! Attachment records as served by the backend.
//!
//! Records are read-only to this crate. Everything the backend sends beyond
//! the four fields the cursor needs is kept in `metadata` and only used for
//! display.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Opaque, stable identifier of an attachment.
///
/// The backend uses integers, but string ids are accepted as well so that
/// nothing breaks if it ever switches to UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttachmentId {
    Int(i64),
    Text(String),
}

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for AttachmentId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for AttachmentId {
    fn from(s: &str) -> Self {
        // Numeric strings are the common case on the command line.
        s.parse::<i64>()
            .map(Self::Int)
            .unwrap_or_else(|_| Self::Text(s.to_string()))
    }
}

/// A single attachment (or image) record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    /// Unique id, stable across requests.
    pub attachment_id: AttachmentId,

    /// MIME content type. Missing or `null` becomes an empty string.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_type: String,

    /// Size in bytes. Missing or `null` becomes 0.
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,

    /// Display filename, if the backend knows one.
    #[serde(default)]
    pub filename: Option<String>,

    /// Every other field (email subject, from, date, folder, ...).
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl AttachmentRecord {
    /// Build a record from a raw JSON payload.
    ///
    /// Returns `None` when the payload is not an object, has no usable
    /// `attachment_id`, or has fields of the wrong type. Callers treat that
    /// exactly like a not-found response.
    pub fn from_payload(payload: Value) -> Option<Self> {
        let has_id = payload
            .get("attachment_id")
            .is_some_and(|id| id.is_i64() || id.is_u64() || id.is_string());
        if !has_id {
            return None;
        }
        serde_json::from_value(payload).ok()
    }

    /// Filename for display, falling back to a generated one.
    pub fn display_name(&self) -> String {
        match self.filename.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("attachment-{}", self.attachment_id),
        }
    }

    /// A metadata field as a string, if present and textual.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Subject of the email this attachment came from.
    pub fn email_subject(&self) -> Option<&str> {
        self.meta_str("email_subject")
            .or_else(|| self.meta_str("subject"))
    }

    /// Sender of the email this attachment came from.
    pub fn email_from(&self) -> Option<&str> {
        self.meta_str("email_from").or_else(|| self.meta_str("from"))
    }

    /// Date of the email, as sent by the backend.
    pub fn email_date(&self) -> Option<&str> {
        self.meta_str("email_date").or_else(|| self.meta_str("date"))
    }

    /// Mail folder the email lives in.
    pub fn email_folder(&self) -> Option<&str> {
        self.meta_str("email_folder")
            .or_else(|| self.meta_str("folder"))
    }

    /// Whether this record is an image (used by the grid and the viewer).
    pub fn is_image(&self) -> bool {
        self.content_type.to_ascii_lowercase().starts_with("image/")
    }
}

/// Deserialize `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
