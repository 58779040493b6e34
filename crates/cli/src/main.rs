//! Qmore CLI - resolve queue identifiers and administer their patterns

mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use qmore_core::domain::PriorityPattern;
use qmore_core::port::{QueueEngine, SystemTimeProvider, ThreadRngShuffler};
use qmore_core::QueueResolver;
use qmore_infra_redis::RedisQueueEngine;
use settings::Settings;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tabled::{Table, Tabled};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "qmore")]
#[command(about = "Resolve queue identifiers into the queues a worker polls", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (TOML/JSON/YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Redis URL (overrides settings)
    #[arg(long, global = true, env = "QMORE_REDIS_URL")]
    redis_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve identifiers once and print the ordered queue names
    Resolve {
        /// Identifiers: names, globs (`jobs-*`), negations (`!jobs-slow`), groups (`@critical`)
        #[arg(required = true, num_args = 1..)]
        identifiers: Vec<String>,

        /// Print a JSON array instead of one name per line
        #[arg(long)]
        json: bool,
    },

    /// Re-resolve periodically and print whenever the result changes
    Watch {
        #[arg(required = true, num_args = 1..)]
        identifiers: Vec<String>,

        /// Seconds between resolutions
        #[arg(short, long, default_value = "5")]
        interval_secs: u64,
    },

    /// List identifier groups
    Groups,

    /// Replace a group's member patterns (no patterns deletes the group)
    SetGroup {
        name: String,
        patterns: Vec<String>,
    },

    /// List priority patterns in order
    Priorities,

    /// Replace all priority patterns, e.g. '[{"pattern":["mail-*"],"fairly":true}]'
    SetPriorities { json: String },

    /// List queue names known to the engine
    Queues,
}

#[derive(Tabled)]
struct GroupRow {
    group: String,
    members: String,
}

#[derive(Tabled)]
struct PriorityRow {
    #[tabled(rename = "#")]
    position: usize,
    patterns: String,
    fairly: bool,
}

/// Filter used when `RUST_LOG` is unset; stdout stays reserved for results
const DEFAULT_LOG_FILTER: &str = "qmore=warn";

fn init_logging() {
    let log_format = std::env::var("QMORE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Logs go to stderr so stdout stays pipeable
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn standard_resolver(engine: Arc<RedisQueueEngine>, settings: &Settings) -> Result<QueueResolver> {
    QueueResolver::standard(
        engine,
        &settings.resolver,
        Arc::new(SystemTimeProvider),
        Arc::new(ThreadRngShuffler),
    )
    .context("Failed to build resolver")
}

async fn watch(resolver: &QueueResolver, identifiers: &[String], interval: Duration) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    let mut last: Option<Vec<String>> = None;

    println!("{}", "Watching resolution (Ctrl-C to stop)".cyan().bold());
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match resolver.resolve_queue_names(identifiers).await {
                    Ok(queues) => {
                        if last.as_ref() != Some(&queues) {
                            println!("{} {}", "→".green(), queues.join(" "));
                            last = Some(queues);
                        }
                    }
                    Err(e) => println!("{} {}", "✗".red(), e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Watch interrupted");
                break;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(url) = cli.redis_url {
        settings.redis.url = url;
    }

    let engine = Arc::new(
        RedisQueueEngine::connect(settings.redis.clone())
            .await
            .context("Failed to connect to queue engine")?,
    );

    match cli.command {
        Commands::Resolve { identifiers, json } => {
            let resolver = standard_resolver(engine, &settings)?;
            let queues = resolver.resolve_queue_names(identifiers.as_slice()).await?;

            if json {
                println!("{}", serde_json::to_string(&queues)?);
            } else if queues.is_empty() {
                eprintln!("{}", "No queues matched".yellow());
            } else {
                for queue in queues {
                    println!("{}", queue);
                }
            }
        }

        Commands::Watch {
            identifiers,
            interval_secs,
        } => {
            let resolver = standard_resolver(engine, &settings)?;
            watch(&resolver, &identifiers, Duration::from_secs(interval_secs.max(1))).await?;
        }

        Commands::Groups => {
            let groups = engine.get_identifier_group_patterns().await?;
            if groups.is_empty() {
                println!("{}", "No identifier groups defined".yellow());
            } else {
                let rows: Vec<GroupRow> = groups
                    .into_iter()
                    .map(|(group, members)| GroupRow {
                        group,
                        members: members.join(", "),
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::SetGroup { name, patterns } => {
            engine.set_identifier_group(&name, &patterns).await?;
            if patterns.is_empty() {
                println!("{}", format!("✓ Group @{} deleted", name).green().bold());
            } else {
                println!("{}", format!("✓ Group @{} updated", name).green().bold());
            }
        }

        Commands::Priorities => {
            let patterns = engine.get_priority_patterns().await?;
            if patterns.is_empty() {
                println!("{}", "No priority patterns defined".yellow());
            } else {
                let rows: Vec<PriorityRow> = patterns
                    .into_iter()
                    .enumerate()
                    .map(|(position, entry)| PriorityRow {
                        position,
                        patterns: entry.pattern.join(", "),
                        fairly: entry.fairly,
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::SetPriorities { json } => {
            let patterns: Vec<PriorityPattern> =
                serde_json::from_str(&json).context("Invalid priority JSON")?;
            engine.set_priority_patterns(&patterns).await?;
            println!(
                "{}",
                format!("✓ {} priority patterns stored", patterns.len())
                    .green()
                    .bold()
            );
        }

        Commands::Queues => {
            for queue in engine.get_known_queue_names().await? {
                println!("{}", queue);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resolve_parses_sigils() {
        let cli = Cli::try_parse_from(["qmore", "resolve", "@critical", "jobs-*", "!jobs-slow"])
            .unwrap();
        match cli.command {
            Commands::Resolve { identifiers, json } => {
                assert_eq!(identifiers, vec!["@critical", "jobs-*", "!jobs-slow"]);
                assert!(!json);
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_default_log_filter_is_valid() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        assert!(filter.to_string().contains("qmore=warn"));
    }

    #[test]
    fn test_resolve_requires_identifiers() {
        assert!(Cli::try_parse_from(["qmore", "resolve"]).is_err());
    }
}
