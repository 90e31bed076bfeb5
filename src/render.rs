//! Token-tree renderer.
//!
//! Walks the tree produced by [`tokenize`] depth-first and emits platform
//! markup. Block tokens get their own layout rules; everything else goes
//! through [`Renderer::process_tokens`], which decorates emphasis by kind.

use std::slice;

use tracing::debug;

use crate::config::{ConvertOptions, HeadingStyle, TableStyle};
use crate::heading::format_heading;
use crate::markers::PlatformMarkers;
use crate::table::{ParsedTable, format_table};
use crate::token::{Token, TokenKind, tokenize};

const BULLET: &str = "• ";
const TASK_DONE: &str = "[x] ";
const TASK_OPEN: &str = "[ ] ";

pub struct Renderer<'a> {
    markers: &'a PlatformMarkers,
    heading_style: HeadingStyle,
    table_style: TableStyle,
}

impl Renderer<'static> {
    pub fn new(options: &ConvertOptions) -> Self {
        Renderer::with_markers(
            PlatformMarkers::for_platform(options.platform),
            options.heading_style,
            options.table_style,
        )
    }
}

impl<'a> Renderer<'a> {
    /// Render with a custom marker set.
    pub fn with_markers(
        markers: &'a PlatformMarkers,
        heading_style: HeadingStyle,
        table_style: TableStyle,
    ) -> Self {
        Self {
            markers,
            heading_style,
            table_style,
        }
    }

    /// Render a sequence of block tokens in document order.
    pub fn render(&self, tokens: &[Token]) -> String {
        tokens.iter().map(|token| self.render_token(token)).collect()
    }

    fn render_token(&self, token: &Token) -> String {
        match &token.kind {
            TokenKind::Heading { depth } => self.heading(token, *depth),
            TokenKind::Paragraph => format!("{}\n\n", self.content(token)),
            TokenKind::Blockquote => self.blockquote(token),
            TokenKind::List { .. } => self.list(token),
            TokenKind::ListItem { task } => self.listitem(token, *task),
            TokenKind::Table => self.table(token),
            TokenKind::Hr => "---\n\n".to_string(),
            TokenKind::Code { .. } => format!("{}\n\n", self.markers.codeblock.wrap(&token.text)),
            TokenKind::Text
            | TokenKind::Strong
            | TokenKind::Em
            | TokenKind::Del
            | TokenKind::Codespan
            | TokenKind::Link { .. }
            | TokenKind::Image { .. }
            | TokenKind::TableRow { .. }
            | TokenKind::TableCell => self.process_tokens(slice::from_ref(token)),
        }
    }

    /// Render inline content: emphasis is decorated by kind, links and
    /// images keep only their visible text, anything else contributes its
    /// content undecorated.
    pub fn process_tokens(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        for token in tokens {
            let m = self.markers;
            match &token.kind {
                TokenKind::Strong => out.push_str(&m.bold.wrap(&self.content(token))),
                TokenKind::Em => out.push_str(&m.italic.wrap(&self.content(token))),
                TokenKind::Del => out.push_str(&m.strikethrough.wrap(&self.content(token))),
                TokenKind::Codespan => out.push_str(&m.code.wrap(&token.text)),
                TokenKind::Code { .. } => out.push_str(&m.codeblock.wrap(&token.text)),
                TokenKind::Image { .. } => out.push_str(&token.text),
                TokenKind::Hr => {}
                TokenKind::Text
                | TokenKind::Link { .. }
                | TokenKind::Heading { .. }
                | TokenKind::Paragraph
                | TokenKind::Blockquote
                | TokenKind::List { .. }
                | TokenKind::ListItem { .. }
                | TokenKind::Table
                | TokenKind::TableRow { .. }
                | TokenKind::TableCell => out.push_str(&self.content(token)),
            }
        }
        out
    }

    /// Children take precedence over the flat text, which is only the
    /// unformatted fallback.
    fn content(&self, token: &Token) -> String {
        if token.has_children() {
            self.process_tokens(&token.tokens)
        } else {
            token.text.clone()
        }
    }

    fn heading(&self, token: &Token, depth: u8) -> String {
        // A fully bold heading would otherwise be bolded twice.
        let text = match token.tokens.as_slice() {
            [only] if only.kind == TokenKind::Strong => self.content(only),
            _ => self.content(token),
        };
        format_heading(&text, depth, self.heading_style, self.markers)
    }

    fn blockquote(&self, token: &Token) -> String {
        let inner = self.render(&token.tokens);
        let quoted: Vec<String> = inner
            .trim_end()
            .lines()
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {line}")
                }
            })
            .collect();
        format!("{}\n\n", quoted.join("\n"))
    }

    /// Only the first text or paragraph child is rendered; nested lists and
    /// later paragraphs are dropped.
    fn listitem(&self, token: &Token, task: Option<bool>) -> String {
        let prefix = match task {
            Some(true) => TASK_DONE,
            Some(false) => TASK_OPEN,
            None => BULLET,
        };
        let content = token
            .tokens
            .iter()
            .find(|child| match child.kind {
                TokenKind::Text => child.has_children(),
                TokenKind::Paragraph => true,
                _ => false,
            })
            .map(|child| self.content(child))
            .unwrap_or_else(|| token.text.clone());
        let content = match task {
            Some(_) => content.trim_start(),
            None => content.as_str(),
        };
        format!("{prefix}{content}\n")
    }

    fn list(&self, token: &Token) -> String {
        token
            .tokens
            .iter()
            .map(|item| match item.kind {
                TokenKind::ListItem { task } => self.listitem(item, task),
                _ => self.render_token(item),
            })
            .collect()
    }

    fn table(&self, token: &Token) -> String {
        let mut headers = Vec::new();
        let mut rows = Vec::new();
        for row in &token.tokens {
            let cells: Vec<String> = row.tokens.iter().map(|cell| cell.text.clone()).collect();
            match row.kind {
                TokenKind::TableRow { header: true } => headers = cells,
                _ => rows.push(cells),
            }
        }

        let table = ParsedTable::new(headers, rows);
        if table.is_empty() {
            return String::new();
        }
        format!("{}\n\n", format_table(&table, self.table_style, self.markers))
    }
}

/// Parse `input` and render it for the configured platform.
pub fn render_markdown(input: &str, options: &ConvertOptions) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    let tokens = tokenize(input);
    debug!(blocks = tokens.len(), platform = %options.platform, "rendering token tree");
    Renderer::new(options).render(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;
    use crate::markers::WHATSAPP;

    fn whatsapp(md: &str) -> String {
        render_markdown(md, &ConvertOptions::new(Platform::Whatsapp))
    }

    fn telegram(md: &str) -> String {
        render_markdown(md, &ConvertOptions::new(Platform::Telegram))
    }

    #[test]
    fn test_heading_bold() {
        assert_eq!(whatsapp("# Title"), "*Title*\n\n");
        assert_eq!(telegram("## Title"), "**Title**\n\n");
    }

    #[test]
    fn test_heading_with_inline_bold() {
        let opts = ConvertOptions::new(Platform::Whatsapp).with_heading_style(HeadingStyle::Decorated);
        assert_eq!(render_markdown("# **Title**", &opts), "══════ *Title* ══════\n\n");
    }

    #[test]
    fn test_heading_upper_keeps_code() {
        let opts = ConvertOptions::new(Platform::Whatsapp).with_heading_style(HeadingStyle::BoldUpper);
        assert_eq!(render_markdown("# Mixed `code`", &opts), "*MIXED `code`*

");
    }

    #[test]
    fn test_multiple_bold() {
        assert_eq!(whatsapp("**bold1** and **bold2**"), "*bold1* and *bold2*\n\n");
    }

    #[test]
    fn test_inline_styles() {
        assert_eq!(whatsapp("*it* ~~gone~~ `code`"), "_it_ ~gone~ `code`\n\n");
        assert_eq!(telegram("*it* ~~gone~~ `code`"), "__it__ ~~gone~~ `code`\n\n");
    }

    #[test]
    fn test_nested_emphasis() {
        assert_eq!(whatsapp("**bold *and italic***"), "*bold _and italic_*\n\n");
    }

    #[test]
    fn test_list_items() {
        assert_eq!(whatsapp("* **bold** and *italic*"), "• *bold* and _italic_\n");
        assert_eq!(whatsapp("* ~~text~~"), "• ~text~\n");
        assert_eq!(whatsapp("* `code`"), "• `code`\n");
        assert_eq!(whatsapp("- one\n- two"), "• one\n• two\n");
    }

    #[test]
    fn test_loose_list_uses_first_paragraph() {
        assert_eq!(whatsapp("- one\n\n- **two**"), "• one\n• *two*\n");
    }

    #[test]
    fn test_task_list() {
        assert_eq!(whatsapp("- [x] done\n- [ ] todo"), "[x] done\n[ ] todo\n");
    }

    #[test]
    fn test_link_and_image_keep_visible_text() {
        assert_eq!(
            whatsapp("see [the docs](https://example.com) ![logo](logo.png)"),
            "see the docs logo\n\n"
        );
    }

    #[test]
    fn test_code_block() {
        assert_eq!(
            whatsapp("```python\nprint('**hi**')\n```"),
            "```\nprint('**hi**')\n```\n\n"
        );
    }

    #[test]
    fn test_blockquote_and_rule() {
        assert_eq!(whatsapp("> quoted **text**"), "> quoted *text*\n\n");
        assert_eq!(whatsapp("above\n\n---\n\nbelow"), "above\n\n---\n\nbelow\n\n");
    }

    #[test]
    fn test_table_follows_table_style() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |";
        let opts = ConvertOptions::new(Platform::Whatsapp).with_table_style(TableStyle::List);
        assert_eq!(
            render_markdown(md, &opts),
            "*Row 1:*\n• a: 1\n• b: 2\n\n*Row 2:*\n• a: 3\n• b: 4\n\n"
        );

        let opts = opts.with_table_style(TableStyle::Compact);
        assert_eq!(render_markdown(md, &opts), "*a*: 1 | *b*: 2\n*a*: 3 | *b*: 4\n\n");
    }

    #[test]
    fn test_table_cells_use_flat_text() {
        let md = "| name |\n|---|\n| **x** |";
        let opts = ConvertOptions::new(Platform::Whatsapp).with_table_style(TableStyle::None);
        assert_eq!(render_markdown(md, &opts), "name\nx\n\n");
    }

    #[test]
    fn test_table_without_headers_keeps_rows() {
        assert_eq!(
            whatsapp("before\n\n|  |  |\n|---|---|\n| 1 | 2 |\n\nafter"),
            "before\n\n1, 2\n\nafter\n\n"
        );
    }

    #[test]
    fn test_custom_markers() {
        let tokens = tokenize("**x**");
        let renderer = Renderer::with_markers(&WHATSAPP, HeadingStyle::None, TableStyle::Code);
        assert_eq!(renderer.process_tokens(&tokens), "*x*");
    }

    #[test]
    fn test_whitespace_only_input() {
        assert_eq!(whatsapp(""), "");
        assert_eq!(telegram("  \n\t\n"), "");
    }
}
