use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use jsonld2ttl::{
    Converter,
    config::{ConverterConfigBuilder, CorruptCachePolicy},
    errors::Jsonld2TtlError,
};
use tracing_subscriber::filter;

/// Convert a JSON-LD document to Turtle.
///
/// Turtle is written to stdout, warnings and errors to stderr. Set RUST_LOG
/// (e.g. RUST_LOG=debug) for more detail.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
struct Args {
    /// JSON-LD file to convert
    jsonld_file: PathBuf,

    /// Namespace cache file (default: ~/.jsonld2ttl/namespaceCache.json)
    #[arg(long, value_name = "PATH")]
    cache_file: Option<PathBuf>,

    /// Fail on a corrupt namespace cache instead of starting a new one
    #[arg(long)]
    strict_cache: bool,

    /// Namespace for fields no context maps
    #[arg(long, value_name = "IRI")]
    placeholder: Option<String>,
}

async fn run(args: Args) -> Result<String, Jsonld2TtlError> {
    let mut config = ConverterConfigBuilder::default();
    if let Some(path) = args.cache_file {
        config = config.with_cache_path(path);
    }
    if args.strict_cache {
        config = config.with_corrupt_cache_policy(CorruptCachePolicy::Fail);
    }
    if let Some(placeholder) = args.placeholder.as_deref() {
        config = config.with_uncontextualized_namespace(placeholder);
    }

    let converter = Converter::new(config.build()).await?;
    converter.convert_file(&args.jsonld_file).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Formatted traces go to stderr so stdout carries only Turtle
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            filter::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Logging setup failed: {e}");
    }

    match run(args).await {
        Ok(turtle) => {
            print!("{turtle}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
