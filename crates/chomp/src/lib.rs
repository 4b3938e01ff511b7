// ABOUTME: Main library entry point for chomp, an HTML cleaner producing LLM-ready Markdown.
// ABOUTME: Re-exports the public API: Chomp, ChompBuilder, CleanOptions, Options, ChompError and the pipeline functions.

//! Chomp - strip web pages down to their content and render it as Markdown.
//!
//! The pipeline drops navigation and page chrome, suppresses repeated headings,
//! paragraphs and images, reassembles what survives into clean markup and
//! converts that to Markdown with predictable spacing.
//!
//! # Example
//!
//! ```no_run
//! use chomp::{Chomp, ChompError};
//!
//! fn main() -> Result<(), ChompError> {
//!     let chomp = Chomp::builder()
//!         .url("https://example.com/article")
//!         .retain_images(true)
//!         .build();
//!     println!("{}", chomp.convert_to_markdown()?);
//!     Ok(())
//! }
//! ```

pub mod cleaner;
pub mod client;
pub mod dom;
pub mod error;
pub mod formats;
pub mod loader;
pub mod options;
pub mod resource;

pub use crate::cleaner::{clean_document, parse_html, url_to_markdown};
pub use crate::client::Chomp;
pub use crate::error::{ChompError, ErrorCode};
pub use crate::formats::html_to_markdown;
pub use crate::loader::{Document, Loader, Source};
pub use crate::options::{ChompBuilder, CleanOptions, Options};
