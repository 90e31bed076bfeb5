use crate::config::Platform;

/// An opening and closing delimiter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub start: &'static str,
    pub end: &'static str,
}

impl Delimiters {
    const fn new(start: &'static str, end: &'static str) -> Self {
        Self { start, end }
    }

    pub fn wrap(&self, content: &str) -> String {
        let mut out = String::with_capacity(self.start.len() + content.len() + self.end.len());
        out.push_str(self.start);
        out.push_str(content);
        out.push_str(self.end);
        out
    }
}

/// The delimiter set one chat platform understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformMarkers {
    pub bold: Delimiters,
    pub italic: Delimiters,
    pub strikethrough: Delimiters,
    pub code: Delimiters,
    pub codeblock: Delimiters,
}

pub const WHATSAPP: PlatformMarkers = PlatformMarkers {
    bold: Delimiters::new("*", "*"),
    italic: Delimiters::new("_", "_"),
    strikethrough: Delimiters::new("~", "~"),
    code: Delimiters::new("`", "`"),
    codeblock: Delimiters::new("```\n", "\n```"),
};

pub const TELEGRAM: PlatformMarkers = PlatformMarkers {
    bold: Delimiters::new("**", "**"),
    italic: Delimiters::new("__", "__"),
    strikethrough: Delimiters::new("~~", "~~"),
    code: Delimiters::new("`", "`"),
    codeblock: Delimiters::new("```\n", "\n```"),
};

impl PlatformMarkers {
    pub fn for_platform(platform: Platform) -> &'static PlatformMarkers {
        match platform {
            Platform::Whatsapp => &WHATSAPP,
            Platform::Telegram => &TELEGRAM,
        }
    }

    /// Markers for a platform name; anything unrecognised gets WhatsApp's.
    pub fn for_name(name: &str) -> &'static PlatformMarkers {
        Self::for_platform(Platform::parse_or_default(name))
    }

    pub fn bold(&self, content: &str) -> String {
        self.bold.wrap(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_markers() {
        let p = PlatformMarkers::for_platform(Platform::Whatsapp);
        assert_eq!(p.bold.wrap("x"), "*x*");
        assert_eq!(p.italic.wrap("x"), "_x_");
        assert_eq!(p.strikethrough.wrap("x"), "~x~");
        assert_eq!(p.code.wrap("x"), "`x`");
        assert_eq!(p.codeblock.wrap("x"), "```\nx\n```");
    }

    #[test]
    fn test_telegram_markers() {
        let p = PlatformMarkers::for_platform(Platform::Telegram);
        assert_eq!(p.bold.wrap("x"), "**x**");
        assert_eq!(p.italic.wrap("x"), "__x__");
        assert_eq!(p.strikethrough.wrap("x"), "~~x~~");
        assert_eq!(p.code, WHATSAPP.code);
        assert_eq!(p.codeblock, WHATSAPP.codeblock);
    }

    #[test]
    fn test_unknown_name_defaults_to_whatsapp() {
        assert_eq!(PlatformMarkers::for_name("matrix"), &WHATSAPP);
        assert_eq!(PlatformMarkers::for_name("telegram"), &TELEGRAM);
    }
}
