//! Client-side skip filters applied to every fetched record.

use serde::{Deserialize, Serialize};

use crate::model::attachment::AttachmentRecord;

/// Content types that count as "octet-like": documents and opaque binaries
/// that the viewer cannot render inline.
const OCTET_LIKE_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/octet-stream",
];

/// Prefixes covering the newer MS-Word formats
/// (`application/vnd.openxmlformats-officedocument.wordprocessingml.*`,
/// `application/vnd.ms-word.*`).
const OCTET_LIKE_PREFIXES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.wordprocessingml",
    "application/vnd.ms-word",
];

/// Active filters of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    /// Minimum size in bytes. 0 disables the filter.
    pub min_size: u64,
    /// Whether PDF / MS-Word / octet-stream records may be shown.
    pub allow_octet_like: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            min_size: 0,
            allow_octet_like: true,
        }
    }
}

/// Why a record was accepted or skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    TooSmall,
    OctetLike,
}

impl Filters {
    /// Evaluate both filters against a record. Size is checked first.
    pub fn evaluate(&self, record: &AttachmentRecord) -> Verdict {
        if self.min_size > 0 && record.size < self.min_size {
            Verdict::TooSmall
        } else if !self.allow_octet_like && is_octet_like(&record.content_type) {
            Verdict::OctetLike
        } else {
            Verdict::Accept
        }
    }

    pub fn accepts(&self, record: &AttachmentRecord) -> bool {
        self.evaluate(record) == Verdict::Accept
    }

    /// `true` when no record can ever be skipped.
    pub fn is_disabled(&self) -> bool {
        self.min_size == 0 && self.allow_octet_like
    }
}

/// Whether `content_type` is PDF, any MS-Word variant, or
/// `application/octet-stream`. Parameters (`; charset=...`) and case are
/// ignored.
pub fn is_octet_like(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    if essence.is_empty() {
        return false;
    }
    OCTET_LIKE_TYPES.contains(&essence.as_str())
        || OCTET_LIKE_PREFIXES.iter().any(|p| essence.starts_with(p))
}
