//! Heading decoration.
//!
//! Chat platforms have no heading syntax, so a heading is rendered as
//! emphasised text, optionally framed by rule characters whose length
//! shrinks with depth (`7 - depth` repetitions).

use crate::config::HeadingStyle;
use crate::markers::PlatformMarkers;

const DOUBLE_RULE: char = '═';
const SINGLE_RULE: char = '─';

/// Decorate heading `text` at `depth` and append the blank line that
/// separates it from the following block.
pub fn format_heading(
    text: &str,
    depth: u8,
    style: HeadingStyle,
    markers: &PlatformMarkers,
) -> String {
    let mut out = decorate_heading(text, depth, style, markers);
    out.push_str("\n\n");
    out
}

/// Same as [`format_heading`] without the trailing newlines.
///
/// Depth is clamped to 1..=6.
pub fn decorate_heading(
    text: &str,
    depth: u8,
    style: HeadingStyle,
    markers: &PlatformMarkers,
) -> String {
    let depth = depth.clamp(1, 6);
    match style {
        HeadingStyle::None => text.to_string(),
        HeadingStyle::Bold => markers.bold(text),
        HeadingStyle::BoldUpper => markers.bold(&upper_outside_code(text)),
        HeadingStyle::Decorated => match depth {
            1 => framed(&markers.bold(text), DOUBLE_RULE, depth),
            2 => framed(&markers.bold(text), SINGLE_RULE, depth),
            _ => format!("▸ {}", markers.bold(text)),
        },
        HeadingStyle::Hierarchical => match depth {
            1 => framed(&markers.bold(&upper_outside_code(text)), DOUBLE_RULE, depth),
            2 => framed(&markers.bold(text), SINGLE_RULE, depth),
            3 => format!("▸ {}", markers.bold(text)),
            _ => format!("{}• {}", "  ".repeat(usize::from(depth - 3)), text),
        },
    }
}

/// Upper-case `text` except inside paired backtick code spans. An unpaired
/// trailing backtick does not open a span.
fn upper_outside_code(text: &str) -> String {
    let parts: Vec<&str> = text.split('`').collect();
    let unpaired = parts.len() % 2 == 0;
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let in_code = i % 2 == 1 && !(unpaired && i == parts.len() - 1);
            if in_code {
                part.to_string()
            } else {
                part.to_uppercase()
            }
        })
        .collect::<Vec<_>>()
        .join("`")
}

fn framed(inner: &str, rule: char, depth: u8) -> String {
    let border: String = std::iter::repeat_n(rule, usize::from(7 - depth)).collect();
    format!("{border} {inner} {border}")
}
