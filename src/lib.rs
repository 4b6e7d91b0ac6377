//! `attachShell`: a terminal browser for mail-archive attachments.
//!
//! The core of the crate is [`cursor::AttachmentCursor`], a bounded walk
//! over the backend's attachment collection that skips records rejected by
//! client-side filters and wraps at either end. [`grid::ImageGrid`] pages
//! through the image listing. Both talk to the backend through the traits
//! in [`client`], implemented over HTTP by [`client::HttpClient`].

pub mod client;
pub mod config;
pub mod cursor;
pub mod error;
pub mod export;
pub mod grid;
pub mod i18n;
pub mod model;
pub mod store;
pub mod tui;
