use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use finsight_extract::ExtractClient;

mod analyze;
mod config;
mod export;
mod session;

#[derive(Parser, Debug)]
#[command(name = "finsight", version, about = "Statement reconciliation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a statement file and reconcile it into the session
    Analyze {
        /// Statement file (jpg, png, webp, or pdf)
        file: PathBuf,

        /// Append to the current session instead of replacing it
        #[arg(long)]
        append: bool,

        /// Maximum extraction attempts before the batch is rejected
        #[arg(long)]
        max_retries: Option<u32>,

        /// Extraction model override
        #[arg(long)]
        model: Option<String>,

        /// Extraction API key (overrides GEMINI_API_KEY and config)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Print the reconciliation report for the current session
    Report,

    /// Export the current session as CSV
    Export {
        /// Output path (default: finsight-transactions-<date>.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Generate an AI spending-health report from the current session
    Insights {
        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        api_key: Option<String>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.finsight/config.toml
    Init,
}

fn build_client(model: Option<String>, api_key: Option<String>) -> Result<ExtractClient> {
    let cfg = config::load_config()?;
    let key = config::resolve_api_key(api_key, &cfg)?;
    let model = model.unwrap_or(cfg.extract.model);
    Ok(ExtractClient::new(key, model))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            file,
            append,
            max_retries,
            model,
            api_key,
        } => {
            if !file.exists() {
                bail!("statement file not found: {}", file.display());
            }
            let cfg = config::load_config()?;
            let retries = max_retries.unwrap_or(cfg.extract.max_retries);
            let client = build_client(model, api_key)?;

            println!("Analyzing {}...", file.display());
            let merged = analyze::run(&client, &file, append, retries).await?;

            println!("Accepted. Session now holds:");
            analyze::print_report(&merged);
        }

        Command::Report => {
            let session = session::load_session()?;
            if session.transactions.is_empty() && session.summaries.is_empty() {
                bail!("no analysis session; run: finsight analyze <file>");
            }
            analyze::print_report(&session);
        }

        Command::Export { out } => {
            let session = session::load_session()?;
            if session.transactions.is_empty() {
                bail!("nothing to export; run: finsight analyze <file>");
            }
            let path = out.unwrap_or_else(|| PathBuf::from(export::default_export_filename()));
            let file = std::fs::File::create(&path)
                .with_context(|| format!("create {}", path.display()))?;
            export::write_csv(file, &session)?;
            println!(
                "Exported {} transactions to {}",
                session.transactions.len(),
                path.display()
            );
        }

        Command::Insights { model, api_key } => {
            let session = session::load_session()?;
            if session.transactions.is_empty() {
                bail!("no transactions to analyze; run: finsight analyze <file>");
            }
            let client = build_client(model, api_key)?;
            let insight = client.deep_insights(&session.transactions).await?;

            println!("{}\n", insight.executive_summary);
            for m in &insight.metrics {
                println!("  {} | {}", m.label, m.value);
            }
            if !insight.tips.is_empty() {
                println!();
                for t in &insight.tips {
                    println!("[{:?}] {}: {}", t.priority, t.title, t.description);
                }
            }
            if !insight.red_flags.is_empty() {
                println!();
                for flag in &insight.red_flags {
                    println!("! {flag}");
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                config::init_config()?;
            }
        },
    }

    Ok(())
}
