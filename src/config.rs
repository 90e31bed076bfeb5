//! Conversion options.
//!
//! Every option is a closed set of names. Strict parsing goes through
//! [`FromStr`]; host surfaces that must never fail use `parse_or_default`,
//! which falls back to the default and logs the rejected value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

macro_rules! named_options {
    (
        $name:ident, $err:ident, $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        impl $name {
            /// All accepted values, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Parse `value`, falling back to the default when it is not an
            /// accepted name. Surrounding whitespace and ASCII case are ignored.
            pub fn parse_or_default(value: &str) -> Self {
                match value.parse() {
                    Ok(parsed) => parsed,
                    Err(_) => {
                        let fallback = Self::default();
                        if !value.trim().is_empty() {
                            warn!(
                                option = $label,
                                value,
                                fallback = fallback.as_str(),
                                "unknown option value, using default"
                            );
                        }
                        fallback
                    }
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let key = s.trim().to_ascii_lowercase();
                match key.as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(Error::$err(s.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Target chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    #[default]
    Whatsapp,
    Telegram,
}

named_options!(Platform, UnknownPlatform, "platform" {
    Whatsapp => "whatsapp",
    Telegram => "telegram",
});

/// How headings are decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingStyle {
    None,
    #[default]
    Bold,
    BoldUpper,
    Decorated,
    Hierarchical,
}

named_options!(HeadingStyle, UnknownHeadingStyle, "heading style" {
    None => "none",
    Bold => "bold",
    BoldUpper => "bold-upper",
    Decorated => "decorated",
    Hierarchical => "hierarchical",
});

/// Which layout a table is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableStyle {
    None,
    #[default]
    Code,
    List,
    Compact,
    Unicode,
}

named_options!(TableStyle, UnknownTableStyle, "table style" {
    None => "none",
    Code => "code",
    List => "list",
    Compact => "compact",
    Unicode => "unicode",
});

/// Conversion engine: parse into a token tree, or rewrite raw text with regexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    #[default]
    Tree,
    Regex,
}

named_options!(Engine, UnknownEngine, "engine" {
    Tree => "tree",
    Regex => "regex",
});

/// Everything a single conversion depends on besides the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub platform: Platform,
    pub heading_style: HeadingStyle,
    pub table_style: TableStyle,
    pub engine: Engine,
}

impl ConvertOptions {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    pub fn with_heading_style(mut self, style: HeadingStyle) -> Self {
        self.heading_style = style;
        self
    }

    pub fn with_table_style(mut self, style: TableStyle) -> Self {
        self.table_style = style;
        self
    }

    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    /// Parse options from a JSON object. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.platform, Platform::Whatsapp);
        assert_eq!(opts.heading_style, HeadingStyle::Bold);
        assert_eq!(opts.table_style, TableStyle::Code);
        assert_eq!(opts.engine, Engine::Tree);
    }

    #[test]
    fn test_from_str_accepts_all_names() {
        for style in HeadingStyle::ALL {
            assert_eq!(style.as_str().parse::<HeadingStyle>().unwrap(), *style);
        }
        for style in TableStyle::ALL {
            assert_eq!(style.as_str().parse::<TableStyle>().unwrap(), *style);
        }
        assert_eq!(" Telegram ".parse::<Platform>().unwrap(), Platform::Telegram);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "signal".parse::<Platform>().unwrap_err();
        assert!(matches!(err, Error::UnknownPlatform(ref v) if v == "signal"));
        assert!("fancy".parse::<HeadingStyle>().is_err());
        assert!("grid".parse::<TableStyle>().is_err());
        assert!("ast".parse::<Engine>().is_err());
    }

    #[test]
    fn test_parse_or_default_falls_back() {
        assert_eq!(Platform::parse_or_default("irc"), Platform::Whatsapp);
        assert_eq!(Platform::parse_or_default(""), Platform::Whatsapp);
        assert_eq!(HeadingStyle::parse_or_default("bogus"), HeadingStyle::Bold);
        assert_eq!(TableStyle::parse_or_default("bogus"), TableStyle::Code);
        assert_eq!(
            TableStyle::parse_or_default("unicode"),
            TableStyle::Unicode
        );
    }

    #[test]
    fn test_display_matches_serde_name() {
        let json = serde_json::to_string(&HeadingStyle::BoldUpper).unwrap();
        assert_eq!(json, "\"bold-upper\"");
        assert_eq!(HeadingStyle::BoldUpper.to_string(), "bold-upper");
    }

    #[test]
    fn test_options_from_json() {
        let opts =
            ConvertOptions::from_json(r#"{"platform": "telegram", "table_style": "list"}"#)
                .unwrap();
        assert_eq!(opts.platform, Platform::Telegram);
        assert_eq!(opts.table_style, TableStyle::List);
        assert_eq!(opts.heading_style, HeadingStyle::Bold);
        assert_eq!(opts.engine, Engine::Tree);
    }

    #[test]
    fn test_options_from_json_rejects_unknown_value() {
        let err = ConvertOptions::from_json(r#"{"platform": "signal"}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
