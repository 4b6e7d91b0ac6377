//! Core data model types for attachments, orderings, and image pages.

pub mod attachment;
pub mod image;
pub mod ordering;
