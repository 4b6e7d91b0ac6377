//! Types for the paged image listing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::attachment::AttachmentRecord;

/// Sort key understood by the image listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageOrder {
    #[default]
    Date,
    Size,
    Id,
}

impl ImageOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Size => "size",
            Self::Id => "id",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Self::Date => Self::Size,
            Self::Size => Self::Id,
            Self::Id => Self::Date,
        }
    }
}

impl fmt::Display for ImageOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "size" => Ok(Self::Size),
            "id" => Ok(Self::Id),
            other => Err(format!("unknown image order '{other}' (expected date, size, id)")),
        }
    }
}

/// Sort direction for the image listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(format!("unknown direction '{other}' (expected asc, desc)")),
        }
    }
}

/// Query parameters for one page of the image listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageQuery {
    /// Items per page.
    pub page_size: u32,
    pub order: ImageOrder,
    pub direction: SortDirection,
    /// Ask the backend to include non-image attachments as well.
    pub all_types: bool,
}

impl Default for ImageQuery {
    fn default() -> Self {
        Self {
            page_size: 50,
            order: ImageOrder::default(),
            direction: SortDirection::default(),
            all_types: false,
        }
    }
}

/// One page of the image listing, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePage {
    /// 1-based page number actually served.
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub images: Vec<AttachmentRecord>,
}

fn first_page() -> u32 {
    1
}
