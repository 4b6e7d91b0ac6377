//! Attachment content access with LRU caching.

pub mod content;
