//! Error types for configuration parsing and the CLI edge.
//!
//! Conversion itself never fails; these errors only come from reading
//! options or input.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown platform: {0} (expected whatsapp or telegram)")]
    UnknownPlatform(String),

    #[error("unknown heading style: {0} (expected none, bold, bold-upper, decorated or hierarchical)")]
    UnknownHeadingStyle(String),

    #[error("unknown table style: {0} (expected none, code, list, compact or unicode)")]
    UnknownTableStyle(String),

    #[error("unknown engine: {0} (expected tree or regex)")]
    UnknownEngine(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
