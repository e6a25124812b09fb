use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use sqlgen_java::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "sqlgen-java")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Generate request as JSON (default: read from stdin)
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// Plugin options as JSON, overriding the options inside the request
    #[arg(long)]
    options: Option<PathBuf>,

    /// Output directory (default: JSON response on stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// One file of the response written to stdout
#[derive(Serialize)]
struct OutputFile<'a> {
    name: &'a str,
    contents: &'a str,
}

#[derive(Serialize)]
struct Response<'a> {
    files: Vec<OutputFile<'a>>,
}

fn main() {
    if let Err(e) = run() {
        error!(error = ?e, "Fatal error");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    info!("sqlgen-java v{}", env!("CARGO_PKG_VERSION"));
    debug!(request = ?cli.request, options = ?cli.options, output = ?cli.output, "Arguments");

    let request = read_request(&cli)?;
    let options = match &cli.options {
        Some(path) => Options::load(path).context("Failed to load plugin options")?,
        None => request.options().context("Invalid plugin options in request")?,
    };

    info!(
        engine = %request.settings.engine,
        package = ?options.package,
        queries = ?request.queries.len(),
        "Request loaded"
    );

    let files = generate(&request, &options).context("Code generation failed")?;

    match &cli.output {
        Some(dir) => write_files(&files, dir)
            .with_context(|| format!("Failed to write files to {}", dir.display()))?,
        None => write_response(&files)?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // stdout carries the response
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn read_request(cli: &Cli) -> Result<GenerateRequest> {
    let bytes = match &cli.request {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read request {}", path.display()))?,
        None => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("Failed to read request from stdin")?;
            bytes
        }
    };
    debug!(bytes = ?bytes.len(), "Read request");

    Ok(GenerateRequest::from_json(&bytes)?)
}

fn write_response(files: &GeneratedFiles) -> Result<()> {
    let response = Response {
        files: files
            .iter()
            .map(|(name, contents)| OutputFile { name, contents })
            .collect(),
    };

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response).context("Failed to encode response")?;
    writeln!(stdout).context("Failed to write response")?;
    Ok(())
}
