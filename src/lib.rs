//! xtlinks - a terminal file list for shared bundles.
//!
//! xtlinks shows the files of a bundle identified by an `xtlink` token and
//! copies generated download links to the clipboard, one file at a time or the
//! whole list at once.
//!
//! # Features
//!
//! - Native clipboard with an OSC 52 terminal fallback
//! - Bulk copy as `name: url` pairs
//! - Short-lived "copied" feedback with cancellable timers
//! - Keyboard and mouse selection
//! - Gruvbox color themes
//!
//! # Example
//!
//! ```ignore
//! use xtlinks::files::FileEntry;
//! use xtlinks::links::{format_links_text, LinkGenerator, QueryLinkGenerator};
//!
//! let files = vec![FileEntry::new("docs/a.pdf", "a.pdf")];
//! let links = QueryLinkGenerator.download_links("https://api.example.com", "tok", &files, "");
//! println!("{}", format_links_text(&links));
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod app;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod file_list;
pub mod files;
pub mod links;
pub mod timer;
pub mod ui;

pub use error::{Result, XtError};
