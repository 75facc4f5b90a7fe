use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use survey_cli::{
    ConsoleNotifier, SystemNavigator, apply_fields, apply_ratings, display_banner, format_outcome,
    format_report, print_page_summary, render_from_results,
};
use survey_core::{Page, PageSession, RecordStore, StrategyKind, SurveyConfig, ready_page};
use survey_remote::RemoteRecordStore;

#[derive(Parser)]
#[command(name = "survey")]
#[command(about = "Recommendation survey page shell", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// JSON configuration file; environment variables are used otherwise
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a page snapshot from backend search results
    Render {
        #[arg(long)]
        results: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Run the ready-time description truncation on a page snapshot
    Truncate {
        #[arg(long)]
        page: PathBuf,
    },
    /// Set rating and free-text controls on a page snapshot
    Rate {
        #[arg(long)]
        page: PathBuf,
        /// Rating assignments, `element-ref=value` or `position=value`
        ratings: Vec<String>,
        /// Free-text assignments, `field=text`
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// Submit the survey on a page snapshot
    Submit {
        #[arg(long)]
        page: PathBuf,
        /// Override the configured strategy (remote or mail)
        #[arg(long)]
        strategy: Option<String>,
        /// Print the mailto URI without launching a mail client
        #[arg(long)]
        no_launch: bool,
    },
    /// Check that the record service is reachable
    Health,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "survey={level},survey_core={level},survey_remote={level},survey_cli={level},reqwest=warn,hyper=warn",
            level = level.to_lowercase()
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<SurveyConfig> {
    let config = match path {
        Some(path) => SurveyConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SurveyConfig::from_env().context("loading configuration from environment")?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    debug!("survey v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Render { results, out } => {
            let page = render_from_results(&results, &config.submission.sentinel)
                .with_context(|| format!("reading search results from {}", results.display()))?;
            page.save(&out)?;
            println!(
                "{} Rendered {} recommendations into {}",
                "✅".green(),
                page.descriptions.len(),
                out.display()
            );
        }
        Commands::Truncate { page: page_path } => {
            let mut page = Page::load(&page_path)?;
            let report = ready_page(&mut page, &config.truncation);
            page.save(&page_path)?;
            println!("{} {}", "✂️ ".cyan(), format_report(&report));
        }
        Commands::Rate {
            page: page_path,
            ratings,
            fields,
        } => {
            let mut page = Page::load(&page_path)?;
            let rated = apply_ratings(&mut page, &ratings)?;
            let filled = apply_fields(&mut page, &fields)?;
            page.save(&page_path)?;
            println!("{} {} ratings and {} fields updated", "✅".green(), rated, filled);
            print_page_summary(&page, &config.submission.sentinel);
        }
        Commands::Submit {
            page: page_path,
            strategy,
            no_launch,
        } => {
            if let Some(raw) = strategy {
                config.submission.strategy = StrategyKind::parse(&raw)
                    .with_context(|| format!("unknown strategy '{}', expected remote or mail", raw))?;
                config.validate()?;
            }

            display_banner();

            let store: Option<Arc<dyn RecordStore>> = match config.submission.strategy {
                StrategyKind::Remote => Some(Arc::new(RemoteRecordStore::from_env()?) as Arc<dyn RecordStore>),
                StrategyKind::Mail => None,
            };

            let page = Page::load(&page_path)?;
            let mut session = PageSession::from_config(
                page,
                config,
                store,
                Arc::new(SystemNavigator::new(!no_launch)),
                Arc::new(ConsoleNotifier),
            )?;

            let report = session.ready().clone();
            debug!("{}", format_report(&report));

            let outcome = session.submit().await;
            session.into_page().save(&page_path)?;

            println!("{} {}", "→".blue(), format_outcome(&outcome));
            if !outcome.is_delivered() {
                std::process::exit(1);
            }
        }
        Commands::Health => {
            let store = RemoteRecordStore::from_env()?;
            store.health().await?;
            println!("{} Record service is healthy", "✅".green());
        }
    }

    Ok(())
}
