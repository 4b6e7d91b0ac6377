//! Saving downloaded attachments to disk.

pub mod attachment;
