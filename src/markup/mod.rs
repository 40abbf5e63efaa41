//! Rich text markup handling.
//!
//! This module handles:
//! - Parsing the supported markup subset into structured content
//!   (allow-list: bold/italic/underline, lists, links, images)
//! - Serializing structured content back into well-formed markup
//! - Text projections used for the character counter and placeholder

mod parser;
mod serializer;
mod text;
mod types;
mod url;

pub use parser::parse;
pub use serializer::serialize;
pub use text::{character_count, decode_entities, rendered_text, strip_tags};
pub use types::{Block, BlockKind, Cell, InlineStyle, Marks, RichText};
pub use url::{UrlTarget, is_safe_url};

/// Confine arbitrary markup to the supported subset.
///
/// Equivalent to parsing and serializing again: unknown elements are
/// unwrapped, scripts and unsafe URLs removed.
pub fn sanitize(markup: &str) -> String {
    serialize(&parse(markup))
}
