//! Markdown to WhatsApp and Telegram chat formatting.
//!
//! Two engines produce the same output shape: [`render_markdown`] walks a
//! parsed token tree, [`convert_regex`] rewrites the raw text with masked
//! regex passes. [`convert`] picks one from [`ConvertOptions::engine`].
//!
//! ```
//! use modular_agent_chatfmt::{ConvertOptions, Platform, convert};
//!
//! let opts = ConvertOptions::new(Platform::Whatsapp);
//! assert_eq!(convert("**bold1** and **bold2**", &opts), "*bold1* and *bold2*\n\n");
//! ```
#![recursion_limit = "256"]

#[cfg(feature = "agent")]
mod agents;

pub mod config;
pub mod error;
pub mod heading;
pub mod markers;
pub mod pipeline;
pub mod render;
pub mod table;
pub mod token;

use tracing::debug;

pub use config::{ConvertOptions, Engine, HeadingStyle, Platform, TableStyle};
pub use error::{Error, Result};
pub use heading::format_heading;
pub use markers::PlatformMarkers;
pub use pipeline::convert_regex;
pub use render::{Renderer, render_markdown};
pub use table::{ParsedTable, format_table, parse_markdown_table, transform_table};
pub use token::{Token, TokenKind, tokenize};

/// Convert `input` with the engine named in `options`.
///
/// Never fails; whitespace-only input yields an empty string.
pub fn convert(input: &str, options: &ConvertOptions) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    debug!(engine = %options.engine, platform = %options.platform, "converting markdown");
    match options.engine {
        Engine::Tree => render_markdown(input, options),
        Engine::Regex => convert_regex(input, options),
    }
}
