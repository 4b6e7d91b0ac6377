//! Orderings the backend can walk attachments in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Retrieval mode for the attachment cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ordering {
    /// One arbitrary record per request. No positional meaning.
    #[default]
    Random,
    /// Record at an offset into the id-sorted sequence.
    IdAscending,
    /// Record at an offset into the sequence sorted by size, smallest first.
    SizeAscending,
    /// Record at an offset into the sequence sorted by size, largest first.
    SizeDescending,
}

impl Ordering {
    /// All orderings, in the order the viewer cycles through them.
    pub const ALL: [Ordering; 4] = [
        Ordering::Random,
        Ordering::IdAscending,
        Ordering::SizeAscending,
        Ordering::SizeDescending,
    ];

    pub fn is_random(self) -> bool {
        matches!(self, Self::Random)
    }

    /// `order=` value for the by-size endpoint.
    pub fn size_order(self) -> Option<&'static str> {
        match self {
            Self::SizeAscending => Some("asc"),
            Self::SizeDescending => Some("desc"),
            Self::Random | Self::IdAscending => None,
        }
    }

    /// Canonical name, also accepted by `FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::IdAscending => "id-ascending",
            Self::SizeAscending => "size-ascending",
            Self::SizeDescending => "size-descending",
        }
    }

    /// The ordering after this one when cycling.
    pub fn cycle(self) -> Self {
        let idx = Self::ALL.iter().position(|o| *o == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ordering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "rand" => Ok(Self::Random),
            "id" | "id-ascending" | "id-asc" => Ok(Self::IdAscending),
            "size-ascending" | "size-asc" | "size" => Ok(Self::SizeAscending),
            "size-descending" | "size-desc" => Ok(Self::SizeDescending),
            other => Err(format!(
                "unknown ordering '{other}' (expected random, id, size-asc, size-desc)"
            )),
        }
    }
}
