//! Backforge Command-Line Compiler
//!
//! Compiles a structural model in backforge JSON form into foreign-key
//! decisions, a storage layout, creation contracts, and construction plans.

mod executor;
mod formatter;

use clap::Parser;
use formatter::OutputFormat;
use std::path::PathBuf;

/// Backforge model compiler
#[derive(Parser, Debug)]
#[command(name = "backforge")]
#[command(version, about = "Compile a structural model into backend descriptors")]
pub struct Args {
    /// Model file (backforge JSON)
    pub model: PathBuf,

    /// Compile options file (JSON)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Allow nested creation payloads in many-to-many contract fields.
    /// Overrides the config file; pass `--nested-creations=false` to disable.
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub nested_creations: Option<bool>,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("backforge=info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = executor::load_config(&args)?;
    let formatter = formatter::create_formatter(args.format);
    let output = executor::execute(&args.model, &config, &*formatter)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, output)?;
            tracing::info!(path = %path.display(), "wrote compiled model");
        }
        None => println!("{}", output),
    }

    Ok(())
}
