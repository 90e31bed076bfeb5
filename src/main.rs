//! chatfmt - Markdown to WhatsApp/Telegram formatting

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use modular_agent_chatfmt::{ConvertOptions, Engine, HeadingStyle, Platform, Result, TableStyle};

#[derive(Parser)]
#[command(name = "chatfmt")]
#[command(version, about = "Convert Markdown to WhatsApp or Telegram formatting", long_about = None)]
#[command(after_help = "EXAMPLES:
    chatfmt notes.md                          Format for WhatsApp
    chatfmt -p telegram --table-style list    Read stdin, format for Telegram")]
struct Cli {
    /// Markdown file to read (stdin when omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Target platform: whatsapp or telegram
    #[arg(short, long, default_value_t = Platform::default())]
    platform: Platform,

    /// Heading style: none, bold, bold-upper, decorated or hierarchical
    #[arg(long, default_value_t = HeadingStyle::default())]
    heading_style: HeadingStyle,

    /// Table style: none, code, list, compact or unicode
    #[arg(long, default_value_t = TableStyle::default())]
    table_style: TableStyle,

    /// Conversion engine: tree or regex
    #[arg(long, default_value_t = Engine::default())]
    engine: Engine,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let markdown = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let options = ConvertOptions::new(cli.platform)
        .with_heading_style(cli.heading_style)
        .with_table_style(cli.table_style)
        .with_engine(cli.engine);

    let text = modular_agent_chatfmt::convert(&markdown, &options);
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}
