//! Emoji Converter - HTML-aware emoji substitution
//!
//! This library replaces emoji tokens in HTML documents: Unicode emoji,
//! shortnames such as `:wink:` and, optionally, ASCII glyphs such as `;)`.
//! Matched tokens are rendered as numeric character references, raw Unicode,
//! `<img>` tags linking PNG or SVG assets, or inlined SVG documents.
//! Code samples, pre-formatted blocks and explicitly opted-out elements are
//! left untouched.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `data`: reference records and codepoint sequences
//! - `alias_table`: token to emoji mapping
//! - `pattern`: compiled token alternations
//! - `config`: output formats, overrides and site configuration
//! - `document`: HTML5 parsing and serialization using html5ever
//! - `exclusion`: element, attribute and class blacklists
//! - `renderer`: per-format output strategies
//! - `substitutor`: tree walk splicing substitutions into text nodes
//! - `assets`: filesystem and HTTP retrieval of SVG assets
//! - `converter`: configuration lifecycle and entry points
//! - `ffi`: C-compatible interface
//!
//! # Examples
//!
//! ```rust
//! use emoji_converter::{ConfigOverrides, Converter, EmojiRecord};
//!
//! let records = vec![EmojiRecord::new("1f604", ":smile:", &[], &[":)"]).unwrap()];
//! let site = ConfigOverrides::new().format("unicode").ascii(true);
//! let converter = Converter::new(&records, &site).unwrap();
//!
//! assert_eq!(
//!     converter.convert("<p>:) <code>:)</code></p>").unwrap(),
//!     "<p>\u{1f604} <code>:)</code></p>"
//! );
//! ```
//!
//! # Safety
//!
//! All FFI functions are marked `unsafe` and document their pointer
//! contracts. Memory allocated by Rust must be freed by Rust via the
//! provided cleanup functions.

// Module declarations
pub mod alias_table;
pub mod assets;
pub mod config;
pub mod converter;
pub mod data;
pub mod document;
pub mod error;
pub mod exclusion;
pub mod ffi;
pub mod pattern;
pub mod renderer;
pub mod substitutor;

// Re-export main types for convenience
pub use assets::{AssetFetcher, DefaultAssetFetcher, FsAssetFetcher, HttpAssetFetcher};
pub use config::{ConfigOverrides, EmojiConfig, Format, SiteConfig};
pub use converter::Converter;
pub use data::EmojiRecord;
pub use document::{HtmlDocument, parse_html};
pub use error::EmojiError;
pub use ffi::{EmojiOptions, EmojiResult};
