//! Write the OpenAPI document as JSON, to stdout or a file.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use coursehub::doc::ApiDoc;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump", about = "Print the CourseHub OpenAPI document", version)]
struct CliArgs {
    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
    /// Write to this file instead of stdout.
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = CliArgs::parse();
    let doc = ApiDoc::openapi();
    let json = if args.pretty {
        doc.to_pretty_json()
    } else {
        doc.to_json()
    }
    .map_err(io::Error::other)?;

    match args.output {
        Some(path) => std::fs::write(path, json),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")
        }
    }
}
