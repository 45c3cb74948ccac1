//! CLI entrypoint for plenary
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod sitting;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use plenary_domain::{Tally, VoteApplication};
use plenary_infrastructure::{ConfigLoader, ConfigRuleRepository};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plenary", version, about = "Legislative voting and quorum resolution")]
struct Cli {
    /// Path to a configuration file (overrides discovered files)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Skip configuration files and use statutory defaults
    #[arg(long, global = true)]
    no_config: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a quorum rule against a tally, without touching any store
    Resolve {
        /// Voting application, e.g. "absolute-majority-vote"
        #[arg(short, long)]
        application: String,

        /// Yes votes
        #[arg(long)]
        yes: u32,

        /// No votes
        #[arg(long)]
        no: u32,

        /// Abstentions
        #[arg(long, default_value_t = 0)]
        abstain: u32,

        /// Members marked present
        #[arg(long)]
        present: u32,

        /// Eligible members (defaults to the configured chamber size)
        #[arg(long)]
        total: Option<u32>,
    },

    /// List the quorum rules bound per application
    Rules,

    /// Replay a scripted sitting through the voting core
    Sitting {
        /// Path to the sitting script (TOML)
        file: PathBuf,

        /// Append retroactive audit entries to this JSONL file
        #[arg(long)]
        audit_log: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let _guard = match &cli.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("could not create log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            None
        }
    };

    // Load configuration and bind the rule set
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("configuration error: {}", e))?
    };
    let rules = ConfigRuleRepository::from_config(&config)?;

    info!("Starting plenary");

    match cli.command {
        Command::Resolve {
            application,
            yes,
            no,
            abstain,
            present,
            total,
        } => {
            let application: VoteApplication = match application.parse() {
                Ok(a) => a,
                Err(e) => bail!("{}", e),
            };
            let Some(rule) = rules.bound_rules().find(|(a, _)| *a == application).map(|(_, r)| r)
            else {
                bail!("No quorum rule bound for application {}", application);
            };

            let chamber = rules.chamber_composition();
            let total = total.unwrap_or_else(|| chamber.total_for(rule.base));
            let verdict = rule.resolve(Tally::new(yes, no, abstain), total, present);

            println!();
            println!("Application: {}", application);
            println!(
                "Rule:        {} on {}",
                rule.quorum_type, rule.base
            );
            println!("Verdict:     {}", verdict.message);
            println!("Detail:      {}", verdict.detail);
            if !verdict.approved {
                std::process::exit(1);
            }
        }

        Command::Rules => {
            let chamber = rules.chamber_composition();
            println!();
            println!(
                "Chamber: {} members, {} mandates",
                chamber.total_members, chamber.total_mandates
            );
            println!();
            for (application, rule) in rules.bound_rules() {
                let mut extras = Vec::new();
                if let Some(pct) = rule.minimum_percentage {
                    extras.push(format!("min {}%", pct));
                }
                if let Some(count) = rule.minimum_count {
                    extras.push(format!("min {} votes", count));
                }
                if rule.abstention_counts_against {
                    extras.push("abstentions count against".to_string());
                }
                if rule.named_vote {
                    extras.push("roll-call".to_string());
                }
                let extras = if extras.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", extras.join(", "))
                };
                println!(
                    "  {:24} {} on {}{}",
                    application.key(),
                    rule.quorum_type,
                    rule.base,
                    extras
                );
            }
        }

        Command::Sitting { file, audit_log } => {
            sitting::run(&file, audit_log.as_deref(), rules).await?;
        }
    }

    Ok(())
}
