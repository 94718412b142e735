mod output;

use anyhow::{Context, Result};
use bestip_records::{parse_enriched, ParseMode};
use bestip_server::{AppState, ServerConfig};
use bestip_store::FileStore;
use clap::{Parser, Subcommand};
use colored::Colorize;
use output::{ClassifyResult, OutputFormat};
use std::io::{self, Read};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Dashboard and plain-text lists of preferred Cloudflare IPs
#[derive(Parser)]
#[command(name = "bestip")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard and address lists over HTTP
    Serve(ServeArgs),
    /// Classify addresses as Cloudflare native or proxy and detect their region
    Classify(ClassifyArgs),
    /// Parse a stored dataset blob and print its records
    Parse(ParseArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Listen address (overrides BESTIP_BIND)
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Directory holding the ipv4/ipv6/ipv4time/ipv6time files (overrides BESTIP_DATA_DIR)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Answer malformed rows with an error instead of dropping them
    #[arg(long)]
    strict: bool,
}

#[derive(Parser)]
struct ClassifyArgs {
    /// IPv4 or IPv6 addresses
    #[arg(value_name = "IP", required = true)]
    addresses: Vec<String>,
}

#[derive(Parser)]
struct ParseArgs {
    /// Blob file (use '-' for stdin)
    #[arg(value_name = "FILE")]
    file: String,

    /// Fail on the first malformed row
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve(args) => handle_serve(args).await?,
        Commands::Classify(args) => handle_classify(args, cli.output)?,
        Commands::Parse(args) => handle_parse(args, cli.output, cli.verbose)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Environment first, then command-line overrides
fn server_config(args: &ServeArgs) -> Result<ServerConfig> {
    let mut config = ServerConfig::from_env().context("Invalid server configuration")?;

    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(ref dir) = args.data_dir {
        config.data_dir = dir.clone();
    }
    if args.strict {
        config.strict = true;
    }

    Ok(config)
}

async fn handle_serve(args: ServeArgs) -> Result<()> {
    let config = server_config(&args)?;
    tracing::info!(data_dir = %config.data_dir.display(), "using file store");

    let store = Arc::new(FileStore::new(&config.data_dir));
    let state = AppState::new(store, config)?;

    bestip_server::serve(state)
        .await
        .context("Server terminated with an error")
}

fn handle_classify(args: ClassifyArgs, format: OutputFormat) -> Result<()> {
    let results: Vec<ClassifyResult> = args
        .addresses
        .iter()
        .map(|address| ClassifyResult::for_address(address.trim()))
        .collect();

    output::print_classified(io::stdout().lock(), &results, format)
}

fn handle_parse(args: ParseArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    if verbose {
        if args.file == "-" {
            eprintln!("{} Reading from stdin", "›".blue());
        } else {
            eprintln!("{} Reading from: {}", "›".blue(), args.file);
        }
    }

    let blob = read_input(&args.file)?;
    let mode = if args.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };
    let records = parse_enriched(blob.trim_end_matches(['\r', '\n']), mode)?;

    output::print_records(io::stdout().lock(), &records, format)
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))
    }
}
