//! doclens: contract risk scanner in the terminal.
//!
//! Upload a contract (or pick a sample), get a simulated risk report, and
//! watch it reveal itself section by section.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doclens_analyze::MockAnalyzer;
use doclens_core::{DoclensConfig, catalog, find_sample};
use doclens_reveal::RevealSchedule;
use tracing_subscriber::EnvFilter;

mod display;
mod player;
mod session;
mod theme;

use session::Session;
use theme::Theme;

/// doclens - Contract Risk Scanner
#[derive(Parser)]
#[command(name = "doclens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "DOCLENS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sample contracts
    Samples {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the report of a sample contract
    Demo {
        /// Sample number, name or slug
        sample: String,

        /// Show everything at once instead of animating
        #[arg(long = "static")]
        no_animation: bool,

        /// Print the payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze a contract file
    Scan {
        /// Contract to analyze (pdf, txt, doc, docx)
        file: PathBuf,

        /// Show everything at once instead of animating
        #[arg(long = "static")]
        no_animation: bool,
    },

    /// Print the reveal timeline computed for a sample
    Schedule {
        /// Sample number, name or slug
        sample: String,

        /// Compute the static (non-animated) timeline
        #[arg(long = "static")]
        no_animation: bool,
    },

    /// Start an interactive session
    Session,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!("doclens v{}", env!("CARGO_PKG_VERSION"));

    let config = DoclensConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Samples { json } => {
            let samples = catalog();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&display::samples_json(&samples))?
                );
            } else {
                display::print_samples(&samples, &config.thresholds);
            }
        }
        Commands::Demo {
            sample,
            no_animation,
            json,
        } => {
            if json {
                let sample = find_sample(&sample)?;
                println!("{}", serde_json::to_string_pretty(&sample.result)?);
            } else {
                let mut session = Session::new(config, Arc::new(MockAnalyzer::default()));
                session.demo(&sample, !no_animation).await?;
            }
        }
        Commands::Scan { file, no_animation } => {
            let analyzer = Arc::new(MockAnalyzer::new(config.analysis.delay()));
            let mut session = Session::new(config, analyzer);
            session.set_animate(!no_animation);
            session
                .upload(&file)
                .with_context(|| format!("cannot scan {}", file.display()))?;
            session.start_scan();
            session.finish_scan().await?;
        }
        Commands::Schedule {
            sample,
            no_animation,
        } => {
            let sample = find_sample(&sample)?;
            let schedule = RevealSchedule::build(&sample.result, !no_animation, &config.reveal);
            for line in display::timeline_lines(&sample.result, &schedule) {
                println!("{line}");
            }
        }
        Commands::Session => {
            let analyzer = Arc::new(MockAnalyzer::new(config.analysis.delay()));
            let mut session = Session::new(config, analyzer);
            session.run().await?;
            println!("{}", Theme::dimmed("bye"));
        }
    }

    Ok(())
}
