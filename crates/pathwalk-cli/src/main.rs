mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pathwalk")]
#[command(version, about = "Pathwalk CLI - directory-tree request routing", long_about = None)]
struct Cli {
    /// Log every resolution step to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a request URI against a document root
    Resolve {
        /// Request URI, e.g. "/categories/1/detail.json?foo=bar"
        request_uri: String,

        /// Document root
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Config file (default: ./pathwalk.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Parameter directory delimiters, e.g. --delimiters "{%" "%}"
        #[arg(long, num_args = 2, value_names = ["LEFT", "RIGHT"])]
        delimiters: Option<Vec<String>>,

        /// Search extensions in order, e.g. "php,html"
        #[arg(short, long)]
        ext: Option<String>,

        /// Fallback script, "/from/root.php" or "file.php"
        #[arg(short, long)]
        fallback: Option<String>,

        /// Convert parameters of this type to integers (repeatable)
        #[arg(long = "int-param", value_name = "TYPE")]
        int_params: Vec<String>,

        /// Print the prepared request as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a config file and print the effective configuration
    #[command(name = "check-config")]
    CheckConfig {
        /// Config file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Resolve {
            request_uri,
            root,
            config,
            delimiters,
            ext,
            fallback,
            int_params,
            json,
        } => {
            commands::resolve::execute(commands::resolve::ResolveArgs {
                request_uri,
                root,
                config,
                delimiters: delimiters.and_then(|d| match d.as_slice() {
                    [left, right] => Some((left.clone(), right.clone())),
                    _ => None,
                }),
                ext,
                fallback,
                int_params,
                json,
            })?;
        }
        Commands::CheckConfig { file } => {
            commands::check_config::execute(&file)?;
        }
    }

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` wins unless `--verbose` is given
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
