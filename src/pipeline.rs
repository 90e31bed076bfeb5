//! Regex pipeline: the same conversion as the token-tree renderer, done by
//! rewriting the raw Markdown text.
//!
//! Regions later passes must not touch (code, tables, finished headings,
//! converted emphasis) are swapped for placeholders and restored at the end.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::config::{ConvertOptions, HeadingStyle, Platform, TableStyle};
use crate::heading::decorate_heading;
use crate::markers::PlatformMarkers;
use crate::table::transform_table;

struct Patterns {
    crlf: Regex,
    fenced_code: Regex,
    inline_code: Regex,
    table: Regex,
    md_image: Regex,
    md_link: Regex,
    md_hr: Regex,
    md_heading: Regex,
    md_outer_bold: Regex,
    md_task_item: Regex,
    md_bullet: Regex,
    md_bold_italic: Regex,
    md_bold: Regex,
    md_double_underscore: Regex,
    md_italic_star: Regex,
    md_italic_underscore: Regex,
    md_strikethrough: Regex,
    excess_newlines: Regex,
}

static RE: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    crlf: Regex::new(r"\r\n").unwrap(),
    fenced_code: Regex::new(r"(?s)```.*?```").unwrap(),
    inline_code: Regex::new(r"`[^`\n]+`").unwrap(),
    table: Regex::new(r"(?m)^[ \t]*\|.*\|[ \t]*$(?:\n[ \t]*\|.*\|[ \t]*$)*").unwrap(),
    md_image: Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").unwrap(),
    md_link: Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap(),
    md_hr: Regex::new(r"(?m)^[ \t]*(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap(),
    md_heading: Regex::new(r"(?m)^(#{1,6})[ \t]+(.+)$").unwrap(),
    md_outer_bold: Regex::new(r"^\*\*([^*]+)\*\*$").unwrap(),
    md_task_item: Regex::new(r"(?m)^([ \t]*)[-*+][ \t]+\[([ xX])\][ \t]+").unwrap(),
    md_bullet: Regex::new(r"(?m)^([ \t]*)[-*+][ \t]+").unwrap(),
    md_bold_italic: Regex::new(r"\*\*\*([^*\n]+?)\*\*\*").unwrap(),
    md_bold: Regex::new(r"\*\*(.+?)\*\*").unwrap(),
    md_double_underscore: Regex::new(r"__([^_\n]+?)__").unwrap(),
    md_italic_star: Regex::new(r"\*([^*\n]+?)\*").unwrap(),
    md_italic_underscore: Regex::new(r"_([^_\n]+?)_").unwrap(),
    md_strikethrough: Regex::new(r"~~([^~\n]+?)~~").unwrap(),
    excess_newlines: Regex::new(r"\n{3,}").unwrap(),
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaskKind {
    Table,
    CodeBlock,
    InlineCode,
    Rule,
    Heading,
    Emphasis,
}

impl MaskKind {
    fn tag(self) -> &'static str {
        match self {
            MaskKind::Table => "TB",
            MaskKind::CodeBlock => "CB",
            MaskKind::InlineCode => "IC",
            MaskKind::Rule => "HR",
            MaskKind::Heading => "HD",
            MaskKind::Emphasis => "EM",
        }
    }
}

/// Side table of masked spans.
///
/// Placeholders are NUL-delimited; NUL is stripped from the input before
/// anything is masked, so input text can never spell a placeholder.
#[derive(Debug, Default)]
struct Masks {
    spans: Vec<(MaskKind, String)>,
}

impl Masks {
    fn mask(&mut self, kind: MaskKind, original: impl Into<String>) -> String {
        let idx = self.spans.len();
        self.spans.push((kind, original.into()));
        placeholder(kind, idx)
    }

    /// Restore spans newest first. A span can only contain placeholders
    /// created before it, so each restore exposes older ones still pending.
    fn restore(&self, mut text: String) -> String {
        for (idx, (kind, original)) in self.spans.iter().enumerate().rev() {
            text = text.replacen(&placeholder(*kind, idx), original, 1);
        }
        text
    }

    fn len(&self) -> usize {
        self.spans.len()
    }
}

fn placeholder(kind: MaskKind, idx: usize) -> String {
    format!("\x00{}{}\x00", kind.tag(), idx)
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Like `replace_all`, but leaves matches that touch a word character on
/// either side, so `snake_case_names` are not read as emphasis.
///
/// A rejected match only consumes its first character, so a real span
/// starting inside it is still found.
fn replace_flanked(re: &Regex, text: &str, mut rep: impl FnMut(&Captures) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut at = 0;
    while let Some(caps) = re.captures_at(text, at) {
        let Some(m) = caps.get(0) else { break };
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        if before.is_some_and(is_word) || after.is_some_and(is_word) {
            at = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
            continue;
        }
        out.push_str(&text[last..m.start()]);
        out.push_str(&rep(&caps));
        last = m.end();
        at = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Convert Markdown to chat formatting without building a token tree.
pub fn convert_regex(input: &str, options: &ConvertOptions) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let platform = options.platform;
    let markers = PlatformMarkers::for_platform(platform);
    let mut masks = Masks::default();

    // Step 0: Normalize line endings, strip NUL so placeholders cannot collide
    let mut text = RE.crlf.replace_all(input, "\n").into_owned();
    text.retain(|c| c != '\x00');

    // Step 1: Tables (outside fenced code), laid out and protected
    text = transform_tables(&text, options.table_style, markers, &mut masks);

    // Step 2: Protect fenced code blocks
    text = RE
        .fenced_code
        .replace_all(&text, |caps: &Captures| masks.mask(MaskKind::CodeBlock, &caps[0]))
        .into_owned();

    // Step 3: Protect inline code
    text = RE
        .inline_code
        .replace_all(&text, |caps: &Captures| masks.mask(MaskKind::InlineCode, &caps[0]))
        .into_owned();

    // Images and links keep only their visible text
    text = RE.md_image.replace_all(&text, "$1").into_owned();
    text = RE.md_link.replace_all(&text, "$1").into_owned();

    // Horizontal rules before bullets, so `* * *` is not read as a list item
    text = RE
        .md_hr
        .replace_all(&text, |_: &Captures| masks.mask(MaskKind::Rule, "---"))
        .into_owned();

    // Step 4: Headings, with their own inline formatting applied first
    text = transform_headings(&text, options.heading_style, platform, markers, &mut masks);

    // Bullets and task items
    text = RE
        .md_task_item
        .replace_all(&text, |caps: &Captures| {
            let mark = if caps[2].eq_ignore_ascii_case("x") { "[x] " } else { "[ ] " };
            format!("{}{}", &caps[1], mark)
        })
        .into_owned();
    text = RE.md_bullet.replace_all(&text, "${1}• ").into_owned();

    // Step 5: Emphasis
    text = substitute_inline(&text, platform, &mut masks);

    text = RE.excess_newlines.replace_all(&text, "\n\n").into_owned();

    // Steps 6 and 7: Restore everything, newest first
    trace!(spans = masks.len(), "restoring masked spans");
    let text = masks.restore(text);
    debug!(%platform, input_len = input.len(), output_len = text.len(), "regex pipeline done");
    text
}

fn transform_tables(
    text: &str,
    style: TableStyle,
    markers: &PlatformMarkers,
    masks: &mut Masks,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for fence in RE.fenced_code.find_iter(text) {
        out.push_str(&tables_in(&text[last..fence.start()], style, markers, masks));
        out.push_str(fence.as_str());
        last = fence.end();
    }
    out.push_str(&tables_in(&text[last..], style, markers, masks));
    out
}

fn tables_in(
    segment: &str,
    style: TableStyle,
    markers: &PlatformMarkers,
    masks: &mut Masks,
) -> String {
    RE.table
        .replace_all(segment, |caps: &Captures| {
            let raw = &caps[0];
            let formatted = transform_table(raw, style, markers);
            if formatted == raw {
                raw.to_string()
            } else {
                debug!(%style, lines = raw.lines().count(), "table detected");
                masks.mask(MaskKind::Table, formatted)
            }
        })
        .into_owned()
}

fn transform_headings(
    text: &str,
    style: HeadingStyle,
    platform: Platform,
    markers: &PlatformMarkers,
    masks: &mut Masks,
) -> String {
    RE.md_heading
        .replace_all(text, |caps: &Captures| {
            let depth = caps[1].len() as u8;
            let content = caps[2].trim();
            // A fully bold heading would otherwise be bolded twice.
            let content = RE
                .md_outer_bold
                .captures(content)
                .and_then(|inner| inner.get(1))
                .map_or(content, |inner| inner.as_str());

            let mut local = Masks::default();
            let converted = substitute_inline(content, platform, &mut local);
            let converted = local.restore(converted);

            let decorated = decorate_heading(&converted, depth, style, markers);
            format!("{}\n\n", masks.mask(MaskKind::Heading, decorated))
        })
        .into_owned()
}

fn substitute_inline(text: &str, platform: Platform, masks: &mut Masks) -> String {
    match platform {
        Platform::Whatsapp => whatsapp_inline(text, masks),
        Platform::Telegram => telegram_inline(text, masks),
    }
}

/// `**x**` → `*x*`, `*x*` → `_x_`, `~~x~~` → `~x~`.
fn whatsapp_inline(text: &str, masks: &mut Masks) -> String {
    // ***x*** → *_x_*, protected from the italic pass
    let mut text = RE
        .md_bold_italic
        .replace_all(text, |caps: &Captures| {
            let inner = RE.md_strikethrough.replace_all(&caps[1], "~${1}~");
            masks.mask(MaskKind::Emphasis, format!("*_{inner}_*"))
        })
        .into_owned();

    // **x** → *x*, converting inner italic and strikethrough first, then protected
    text = RE
        .md_bold
        .replace_all(&text, |caps: &Captures| {
            let inner = RE.md_italic_star.replace_all(&caps[1], "_${1}_");
            let inner = RE.md_strikethrough.replace_all(&inner, "~${1}~");
            masks.mask(MaskKind::Emphasis, format!("*{inner}*"))
        })
        .into_owned();

    text = RE.md_italic_star.replace_all(&text, "_${1}_").into_owned();
    RE.md_strikethrough.replace_all(&text, "~${1}~").into_owned()
}

/// Bold and strikethrough already match Telegram; single `*x*` and `_x_`
/// both become `__x__`.
fn telegram_inline(text: &str, masks: &mut Masks) -> String {
    let mut text = RE
        .md_bold_italic
        .replace_all(text, |caps: &Captures| {
            masks.mask(MaskKind::Emphasis, format!("**__{}__**", &caps[1]))
        })
        .into_owned();

    text = RE
        .md_bold
        .replace_all(&text, |caps: &Captures| {
            let inner = telegram_italics(&caps[1]);
            masks.mask(MaskKind::Emphasis, format!("**{inner}**"))
        })
        .into_owned();

    // Already in Telegram form; keep the single-underscore pass off it
    text = RE
        .md_double_underscore
        .replace_all(&text, |caps: &Captures| masks.mask(MaskKind::Emphasis, &caps[0]))
        .into_owned();

    text = RE
        .md_italic_star
        .replace_all(&text, |caps: &Captures| {
            masks.mask(MaskKind::Emphasis, format!("__{}__", &caps[1]))
        })
        .into_owned();

    replace_flanked(&RE.md_italic_underscore, &text, |caps| {
        masks.mask(MaskKind::Emphasis, format!("__{}__", &caps[1]))
    })
}

fn telegram_italics(text: &str) -> String {
    let text = RE.md_italic_star.replace_all(text, "__${1}__");
    replace_flanked(&RE.md_italic_underscore, &text, |caps| format!("__{}__", &caps[1]))
}
