//! wikiwars - Wikipedia edit history dashboard
//!
//! Fetches the complete revision history of articles and contributors from
//! the MediaWiki API and prints summaries, rankings and activity patterns.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Logs: $XDG_STATE_HOME/wikiwars/wikiwars.log (~/.local/state/wikiwars/wikiwars.log)
//! - Config: $XDG_CONFIG_HOME/wikiwars/config.toml (~/.config/wikiwars/config.toml)

mod render;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use wikiwars_core::{
    Config, Dashboard, FetchProgress, MovingAverageForecaster, SearchOutcome, Subject, WikiClient,
};

#[derive(Parser, Debug)]
#[command(name = "wikiwars")]
#[command(about = "Explore who edits Wikipedia, and when")]
#[command(version)]
struct Args {
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// MediaWiki api.php endpoint (overrides config)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Length of top contributor / article rankings (overrides config)
    #[arg(long, global = true)]
    top: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Statistics, top contributors and activity for one article
    Article {
        /// Article title, e.g. "Earth"
        name: String,
    },
    /// Statistics, most edited articles and activity for one user
    Contributor {
        /// Username or IP address
        username: String,
    },
    /// Search several articles and compare their headline statistics
    Compare {
        /// Article titles, searched in order
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Monthly edit history of an article with a short forecast
    Forecast {
        /// Article title
        name: String,

        /// Number of months to predict (1-1200)
        #[arg(long, default_value = "6", value_parser = clap::value_parser!(u16).range(1..=1200))]
        periods: u16,

        /// Months averaged for each prediction
        #[arg(long, default_value = "3")]
        window: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// JSON body printed when a subject has no data.
#[derive(Serialize)]
struct NoData<'a> {
    kind: &'a str,
    name: &'a str,
    found: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load().context("failed to load configuration")?;
    let _log_guard = wikiwars_core::logging::init(&config.logging).ok();

    if let Some(endpoint) = &args.endpoint {
        config.api.endpoint = endpoint.clone();
    }
    if let Some(top) = args.top {
        config.dashboard.top_n = top;
    }

    tracing::info!(endpoint = %config.api.endpoint, command = ?args.command, "wikiwars starting");

    let spinner = progress_spinner(args.format);
    let reporter = spinner.clone();
    let dashboard = Dashboard::from_config(&config)
        .context("failed to set up the dashboard")?
        .with_progress(Arc::new(move |subject: &Subject, p: FetchProgress| {
            reporter.set_message(format!(
                "Fetching {}: {} page{}, {} revisions",
                subject,
                p.pages,
                if p.pages == 1 { "" } else { "s" },
                p.records
            ));
        }));

    let result = run(&dashboard, &args).await;
    spinner.finish_and_clear();
    result
}

async fn run(dashboard: &Dashboard<WikiClient>, args: &Args) -> Result<()> {
    match &args.command {
        Command::Article { name } => {
            let subject = Subject::Article(name.clone());
            let details = dashboard
                .article_details(name)
                .await
                .with_context(|| fetch_failed(&subject))?;
            match details {
                Some(details) => emit(args.format, &details, render::article_details),
                None => no_data(args.format, &subject),
            }
        }
        Command::Contributor { username } => {
            let subject = Subject::Contributor(username.clone());
            let details = dashboard
                .contributor_details(username)
                .await
                .with_context(|| fetch_failed(&subject))?;
            match details {
                Some(details) => emit(args.format, &details, render::contributor_details),
                None => no_data(args.format, &subject),
            }
        }
        Command::Compare { names } => compare(dashboard, names, args.format).await,
        Command::Forecast {
            name,
            periods,
            window,
        } => {
            let subject = Subject::Article(name.clone());
            let forecast = dashboard
                .forecast(
                    name,
                    usize::from(*periods),
                    &MovingAverageForecaster::new(*window),
                )
                .await
                .with_context(|| fetch_failed(&subject))?;
            match forecast {
                Some(forecast) => emit(args.format, &forecast, render::forecast),
                None => no_data(args.format, &subject),
            }
        }
    }
}

/// Search each article in turn, then print the recent-articles table.
///
/// A failed or empty search is reported and skipped; the rest still run.
async fn compare(
    dashboard: &Dashboard<WikiClient>,
    names: &[String],
    format: OutputFormat,
) -> Result<()> {
    let mut failures = 0usize;
    for name in names {
        let subject = Subject::Article(name.clone());
        match dashboard.search_article(name).await {
            Ok(SearchOutcome::Found { .. }) => {}
            Ok(SearchOutcome::NotFound) => {
                eprintln!("No data found for {}.", subject);
            }
            Err(e) => {
                tracing::warn!(%subject, error = %e, "Search failed");
                eprintln!("{}: {}", fetch_failed(&subject), e);
                failures += 1;
            }
        }
    }

    let recent = dashboard
        .recent_articles()
        .await
        .context("failed to read recent articles")?;

    if failures == names.len() {
        anyhow::bail!("every search failed; check your connection and try again");
    }

    emit(format, recent.as_slice(), render::comparison_table)
}

fn emit<T: Serialize + ?Sized>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
            println!("{}", json);
        }
        OutputFormat::Text => print!("{}", text(value)),
    }
    Ok(())
}

fn no_data(format: OutputFormat, subject: &Subject) -> Result<()> {
    let body = NoData {
        kind: subject.kind(),
        name: subject.name(),
        found: false,
    };
    emit(format, &body, |_| format!("No data found for {}.\n", subject))
}

fn fetch_failed(subject: &Subject) -> String {
    format!("failed to fetch {}; please try again", subject)
}

/// Spinner on stderr; hidden for JSON output so stdout stays parseable.
fn progress_spinner(format: OutputFormat) -> ProgressBar {
    if format == OutputFormat::Json {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Contacting Wikipedia...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
