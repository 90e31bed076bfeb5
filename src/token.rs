//! Owned token tree built from the `pulldown-cmark` event stream.
//!
//! The parser emits a flat sequence of start/end events; the renderer wants
//! nested tokens with a flat-text fallback on every node, so the events are
//! folded into [`Token`]s here.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

/// The closed set of token kinds the renderer handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    Strong,
    Em,
    Del,
    Codespan,
    Code { lang: Option<String> },
    Link { href: String },
    Image { src: String },
    Heading { depth: u8 },
    Paragraph,
    Blockquote,
    List { ordered: bool },
    ListItem { task: Option<bool> },
    Table,
    TableRow { header: bool },
    TableCell,
    Hr,
}

impl TokenKind {
    fn is_inline(&self) -> bool {
        matches!(
            self,
            TokenKind::Text
                | TokenKind::Strong
                | TokenKind::Em
                | TokenKind::Del
                | TokenKind::Codespan
                | TokenKind::Link { .. }
                | TokenKind::Image { .. }
        )
    }
}

/// A parsed unit of Markdown.
///
/// `text` is the plain-text content with all markup removed; `tokens`
/// holds nested content and is empty for leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Token {
    pub fn leaf(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            tokens: Vec::new(),
        }
    }

    /// A container whose flat text is the concatenation of its children's.
    pub fn node(kind: TokenKind, tokens: Vec<Token>) -> Self {
        let text = tokens.iter().map(|t| t.text.as_str()).collect();
        Self { kind, text, tokens }
    }

    pub fn has_children(&self) -> bool {
        !self.tokens.is_empty()
    }
}

struct Frame {
    kind: TokenKind,
    tokens: Vec<Token>,
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    root: Vec<Token>,
}

impl TreeBuilder {
    fn open(&mut self, kind: TokenKind) {
        self.stack.push(Frame {
            kind,
            tokens: Vec::new(),
        });
    }

    fn close(&mut self) {
        if let Some(frame) = self.stack.pop() {
            let token = finish_frame(frame);
            self.push(token);
        }
    }

    fn push(&mut self, token: Token) {
        match self.stack.last_mut() {
            Some(frame) => frame.tokens.push(token),
            None => self.root.push(token),
        }
    }

    fn mark_task(&mut self, checked: bool) {
        let item = self
            .stack
            .iter_mut()
            .rev()
            .find(|f| matches!(f.kind, TokenKind::ListItem { .. }));
        if let Some(frame) = item {
            frame.kind = TokenKind::ListItem {
                task: Some(checked),
            };
        }
    }

    fn finish(mut self) -> Vec<Token> {
        while !self.stack.is_empty() {
            self.close();
        }
        self.root
    }
}

fn finish_frame(frame: Frame) -> Token {
    match frame.kind {
        TokenKind::Code { .. } => {
            let mut code: String = frame.tokens.iter().map(|t| t.text.as_str()).collect();
            if code.ends_with('\n') {
                code.pop();
            }
            Token::leaf(frame.kind, code)
        }
        TokenKind::ListItem { .. } => {
            let tokens = group_inline(frame.tokens);
            Token::node(frame.kind, tokens)
        }
        kind => Token::node(kind, frame.tokens),
    }
}

/// Wrap each run of inline tokens directly inside a list item into one text
/// token, so tight and loose items expose the same shape: a text or
/// paragraph token holding the inline content.
fn group_inline(tokens: Vec<Token>) -> Vec<Token> {
    let mut grouped = Vec::with_capacity(tokens.len());
    let mut run = Vec::new();
    for token in tokens {
        if token.kind.is_inline() {
            run.push(token);
        } else {
            if !run.is_empty() {
                grouped.push(Token::node(TokenKind::Text, std::mem::take(&mut run)));
            }
            grouped.push(token);
        }
    }
    if !run.is_empty() {
        grouped.push(Token::node(TokenKind::Text, run));
    }
    grouped
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn kind_for(tag: Tag<'_>) -> TokenKind {
    match tag {
        Tag::Paragraph => TokenKind::Paragraph,
        Tag::Heading { level, .. } => TokenKind::Heading {
            depth: heading_depth(level),
        },
        Tag::BlockQuote(_) => TokenKind::Blockquote,
        Tag::CodeBlock(kind) => TokenKind::Code {
            lang: match kind {
                CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                _ => None,
            },
        },
        Tag::List(start) => TokenKind::List {
            ordered: start.is_some(),
        },
        Tag::Item => TokenKind::ListItem { task: None },
        Tag::Table(_) => TokenKind::Table,
        Tag::TableHead => TokenKind::TableRow { header: true },
        Tag::TableRow => TokenKind::TableRow { header: false },
        Tag::TableCell => TokenKind::TableCell,
        Tag::Emphasis => TokenKind::Em,
        Tag::Strong => TokenKind::Strong,
        Tag::Strikethrough => TokenKind::Del,
        Tag::Link { dest_url, .. } => TokenKind::Link {
            href: dest_url.to_string(),
        },
        Tag::Image { dest_url, .. } => TokenKind::Image {
            src: dest_url.to_string(),
        },
        // HTML blocks, footnote definitions and the like pass their content
        // through as plain text.
        _ => TokenKind::Text,
    }
}

/// Parse `markdown` into a token tree.
///
/// Tables, strikethrough and task lists are enabled.
pub fn tokenize(markdown: &str) -> Vec<Token> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = TreeBuilder::default();

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) => builder.open(kind_for(tag)),
            Event::End(_) => builder.close(),
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                builder.push(Token::leaf(TokenKind::Text, text.to_string()));
            }
            Event::Code(code) => builder.push(Token::leaf(TokenKind::Codespan, code.to_string())),
            Event::SoftBreak | Event::HardBreak => {
                builder.push(Token::leaf(TokenKind::Text, "\n"));
            }
            Event::Rule => builder.push(Token::leaf(TokenKind::Hr, "")),
            Event::TaskListMarker(checked) => builder.mark_task(checked),
            Event::FootnoteReference(label) => {
                builder.push(Token::leaf(TokenKind::Text, format!("[^{label}]")));
            }
            _ => {}
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\n").is_empty());
    }

    #[test]
    fn test_paragraph_with_strong() {
        let tokens = tokenize("**bold** text");
        assert_eq!(tokens.len(), 1);
        let para = &tokens[0];
        assert_eq!(para.kind, TokenKind::Paragraph);
        assert_eq!(para.text, "bold text");
        assert_eq!(para.tokens[0].kind, TokenKind::Strong);
        assert_eq!(para.tokens[0].text, "bold");
        assert_eq!(para.tokens[0].tokens[0], Token::leaf(TokenKind::Text, "bold"));
    }

    #[test]
    fn test_heading_depth() {
        let tokens = tokenize("### Third");
        assert_eq!(tokens[0].kind, TokenKind::Heading { depth: 3 });
        assert_eq!(tokens[0].text, "Third");
    }

    #[test]
    fn test_fenced_code_drops_trailing_newline() {
        let tokens = tokenize("```rust\nfn main() {}\n```");
        assert_eq!(
            tokens[0].kind,
            TokenKind::Code {
                lang: Some("rust".into())
            }
        );
        assert_eq!(tokens[0].text, "fn main() {}");
        assert!(!tokens[0].has_children());
    }

    #[test]
    fn test_tight_list_item_groups_inline_content() {
        let tokens = tokenize("* **a** and *b*");
        let list = &tokens[0];
        assert_eq!(list.kind, TokenKind::List { ordered: false });
        let item = &list.tokens[0];
        assert_eq!(item.kind, TokenKind::ListItem { task: None });
        assert_eq!(item.tokens.len(), 1);
        assert_eq!(item.tokens[0].kind, TokenKind::Text);
        assert_eq!(item.tokens[0].tokens.len(), 3);
    }

    #[test]
    fn test_task_markers() {
        let tokens = tokenize("- [x] done\n- [ ] todo\n- plain");
        let items = &tokens[0].tokens;
        assert_eq!(items[0].kind, TokenKind::ListItem { task: Some(true) });
        assert_eq!(items[1].kind, TokenKind::ListItem { task: Some(false) });
        assert_eq!(items[2].kind, TokenKind::ListItem { task: None });
    }

    #[test]
    fn test_table_rows() {
        let tokens = tokenize("| a | b |\n|---|---|\n| 1 | **2** |");
        let table = &tokens[0];
        assert_eq!(table.kind, TokenKind::Table);
        assert_eq!(table.tokens[0].kind, TokenKind::TableRow { header: true });
        assert_eq!(table.tokens[1].kind, TokenKind::TableRow { header: false });
        assert_eq!(table.tokens[1].tokens[1].text, "2");
    }

    #[test]
    fn test_link_keeps_href_and_text() {
        let tokens = tokenize("[docs](https://example.com)");
        let link = &tokens[0].tokens[0];
        assert_eq!(
            link.kind,
            TokenKind::Link {
                href: "https://example.com".into()
            }
        );
        assert_eq!(link.text, "docs");
    }
}
