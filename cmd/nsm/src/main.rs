//! NSM CLI - translate Kubernetes NetworkPolicies into ordered firewall rules.
//!
//! Commands:
//! - `nsm translate` - Translate policies and print the firewall rules
//! - `nsm describe` - Print a readable summary of the input policies

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::InputArgs;

#[derive(Parser)]
#[command(name = "nsm")]
#[command(about = "Translate Kubernetes NetworkPolicies into ordered firewall rules")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log line format on stderr
    #[arg(
        long,
        global = true,
        env = "NSM_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate policies into firewall rules
    Translate {
        #[command(flatten)]
        input: InputArgs,

        /// Output format (table, json, yaml or csv)
        #[arg(short, long, env = "NSM_OUTPUT", default_value = "table")]
        output: String,

        /// Write the report to this file instead of stdout
        #[arg(long)]
        out_file: Option<String>,
    },

    /// Describe policies as written
    Describe {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let logs = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => logs.init(),
        LogFormat::Json => logs.json().with_current_span(false).init(),
    }

    match cli.command {
        Commands::Translate {
            input,
            output,
            out_file,
        } => commands::translate::run(&input, &output, out_file.as_deref()),
        Commands::Describe { input } => commands::describe::run(&input),
    }
}
