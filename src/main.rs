//! # ClauseEase CLI (`clausease`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `clausease init` | Create the SQLite database and run schema migrations |
//! | `clausease analyze "<text>"` | Analyze text and print the result as JSON |
//! | `clausease analyze --file <path>` | Analyze a text or PDF file |
//! | `clausease serve` | Start the HTTP API server |
//!
//! ## Examples
//!
//! ```bash
//! clausease init --config ./config/clausease.toml
//! clausease analyze "The lessee shall indemnify the lessor." --pretty
//! clausease analyze --file ./contract.pdf
//! clausease -v serve --config ./config/clausease.toml
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::path::{Path, PathBuf};

use clausease::analyze::Analyzer;
use clausease::config::{self, NlpConfig};
use clausease::extract::acquire_text;
use clausease::models::{ContentKind, RawInput};
use clausease::{migrate, server};

/// ClauseEase: readability scoring and per-word complexity annotation for
/// contracts and other dense documents.
#[derive(Parser)]
#[command(name = "clausease", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/clausease.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the users and history tables.
    /// Safe to run repeatedly.
    Init,

    /// Analyze text and print the result as JSON.
    ///
    /// Reads the text argument, or the file given with `--file`. Files
    /// ending in `.pdf` go through PDF text extraction.
    Analyze {
        /// Text to analyze.
        #[arg(conflicts_with = "file")]
        text: Option<String>,

        /// Read input from a file instead.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Start the HTTP API server.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(cli.log_level())
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    match &cli.command {
        Commands::Init => {
            let cfg = config::load_config(&cli.config)?;
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized at {}", cfg.db.path.display());
        }
        Commands::Analyze { text, file, pretty } => {
            let nlp = nlp_config(&cli.config)?;
            let input = match (text, file) {
                (_, Some(path)) => read_input_file(path)?,
                (Some(text), None) => RawInput::Text(text.clone()),
                (None, None) => RawInput::Text(String::new()),
            };
            run_analyze(&nlp, &input, *pretty)?;
        }
        Commands::Serve => {
            let cfg = config::load_config(&cli.config)?;
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}

/// `[nlp]` from the config file, or defaults when no config file exists.
fn nlp_config(path: &Path) -> anyhow::Result<NlpConfig> {
    if path.exists() {
        Ok(config::load_config(path)?.nlp)
    } else {
        log::debug!("No config at {}, using default analyzer settings", path.display());
        Ok(NlpConfig::default())
    }
}

fn read_input_file(path: &Path) -> anyhow::Result<RawInput> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    Ok(RawInput::Bytes {
        bytes,
        kind: ContentKind::from_filename(name),
    })
}

fn run_analyze(nlp: &NlpConfig, input: &RawInput, pretty: bool) -> anyhow::Result<()> {
    let analyzer = Analyzer::from_config(nlp)?;
    let text = acquire_text(input);
    let result = analyzer.analyze(&text)?;

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);
    Ok(())
}
