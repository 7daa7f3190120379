//! replymark CLI - render LLM reply text to HTML or a JSON document

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;

use replymark::{Document, Options};

#[derive(Parser)]
#[command(name = "replymark")]
#[command(version, about = "Render LLM reply text to HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    replymark reply.md              Render Markdown to HTML
    replymark --plain dump.txt      Detect ASCII tables in plain text
    cat reply.md | replymark --json Print the block document as JSON")]
struct Cli {
    /// Input file; reads stdin when omitted or `-`
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Use the ASCII-table fallback instead of the Markdown grammar
    #[arg(long)]
    plain: bool,

    /// Print the document as JSON instead of HTML
    #[arg(long)]
    json: bool,

    /// Leave `\(..\)`, `\[..\]` and `$$..$$` as text
    #[arg(long)]
    no_math: bool,

    /// Also treat `$$..$$` as display math
    #[arg(long)]
    dollar_math: bool,

    /// Do not link bare URLs
    #[arg(long)]
    no_autolinks: bool,

    /// Do not format ASCII-table cells as numbers
    #[arg(long)]
    no_numeric: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            math: !self.no_math,
            dollar_math: self.dollar_math,
            autolinks: !self.no_autolinks,
            numeric_cells: !self.no_numeric,
        }
    }
}

fn main() -> ExitCode {
    #[cfg(feature = "trace")]
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
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

fn run(cli: &Cli) -> Result<(), String> {
    let input = read_input(cli.input.as_deref()).map_err(|e| e.to_string())?;
    let options = cli.options();

    let document = if cli.plain {
        replymark::plain_to_document_with_options(&input, &options)
    } else {
        replymark::to_document_with_options(&input, &options)
    };

    let output = if cli.json {
        to_json(&document)?
    } else {
        let mut writer = replymark::HtmlWriter::with_capacity_for(input.len());
        writer.write_document(&document, &options);
        writer.into_string()
    };

    io::stdout()
        .write_all(output.as_bytes())
        .map_err(|e| e.to_string())
}

fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) if path != "-" => std::fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn to_json(document: &Document) -> Result<String, String> {
    let mut json = serde_json::to_string_pretty(document).map_err(|e| e.to_string())?;
    json.push('\n');
    Ok(json)
}
