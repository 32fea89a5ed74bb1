use analytics::{
    CategoryAggregator, DiscountBinningEngine, EventSignificanceEngine, TemperatureAggregator,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{Config, LoggingSettings, OutputFormat};
use core_types::Dataset;
use serde::Serialize;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod narrative;
mod render;

/// The main entry point for the cafe sales dashboard.
fn main() {
    // Optional .env file with CAFE__* configuration overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match load_settings(&cli) {
        Ok(config) => config,
        Err(e) => fail_before_logging(e),
    };
    let guard = match init_tracing(&config.logging) {
        Ok(guard) => guard,
        Err(e) => fail_before_logging(e),
    };

    if let Err(e) = run(&cli, &config) {
        report(&e);
        // Flush the rolling file writer; `exit` skips destructors.
        drop(guard);
        std::process::exit(1);
    }
}

/// Installs stderr logging with default settings so the error is still logged.
fn fail_before_logging(e: anyhow::Error) -> ! {
    // The default settings have no log directory, so there is no guard to flush.
    let _ = init_tracing(&LoggingSettings::default());
    report(&e);
    std::process::exit(1)
}

fn report(e: &anyhow::Error) {
    tracing::error!(error = %format!("{e:#}"), "Dashboard failed");
    eprintln!("Error: {e:#}");
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Descriptive statistics over a cafe's sales ledger and events calendar.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = configuration::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Overrides the transactions CSV path from the configuration.
    #[arg(long, global = true)]
    transactions: Option<PathBuf>,

    /// Overrides the events CSV path from the configuration.
    #[arg(long, global = true)]
    events: Option<PathBuf>,

    /// Overrides the output format from the configuration.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Overview of the dashboard sections.
    Home,
    /// Event-day vs non-event-day sales and significance tests.
    Events,
    /// Correlation of sales with temperature.
    Temperature,
    /// Revenue and volume per product category.
    Categories,
    /// Quantity sold by discount depth.
    Discounts,
    /// Summary of the offline forecasting work.
    Model,
    /// Final recommendations.
    Conclusion,
    /// Every section in order.
    All,
}

impl Commands {
    fn needs_data(self) -> bool {
        !matches!(self, Commands::Home | Commands::Model | Commands::Conclusion)
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Everything `--format json` can emit. Sections that were not requested are omitted.
#[derive(Serialize, Default)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<analytics::EventImpactReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<analytics::TemperatureReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<analytics::CategoryReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    discounts: Option<analytics::DiscountReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    text: Vec<&'a str>,
}

/// Reads the configuration file and applies the command-line overrides.
fn load_settings(cli: &Cli) -> anyhow::Result<Config> {
    let mut config =
        configuration::load_config(&cli.config).context("Failed to load configuration")?;
    apply_overrides(&mut config, cli);
    Ok(config)
}

fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    tracing::debug!(command = ?cli.command, "Starting dashboard");

    let dataset = if cli.command.needs_data() {
        loader::load_dataset(&config.data.transactions_path, &config.data.events_path)
            .context("Failed to load the sales dataset")?
    } else {
        Dataset::default()
    };

    let json = config.report.format == OutputFormat::Json;
    let mut output = JsonOutput::default();
    let all = cli.command == Commands::All;

    if matches!(cli.command, Commands::Home | Commands::All) {
        show_text(json, &mut output, narrative::HOME);
    }
    if matches!(cli.command, Commands::Events | Commands::All) {
        let report = EventSignificanceEngine::new(config.report.event_p_value_decimals)
            .analyze(&dataset)
            .context("Event impact analysis failed")?;
        if json {
            output.events = Some(report);
        } else {
            render::events(&report, &config.report);
            render::text(narrative::EVENTS_CONCLUSION);
        }
    }
    if matches!(cli.command, Commands::Temperature | Commands::All) {
        let report = TemperatureAggregator::new()
            .analyze(&dataset)
            .context("Temperature analysis failed")?;
        if json {
            output.temperature = Some(report);
        } else {
            render::temperature(&report);
            render::text(narrative::TEMPERATURE_CONCLUSION);
        }
    }
    if matches!(cli.command, Commands::Categories | Commands::All) {
        let report = CategoryAggregator::new().analyze(&dataset);
        if json {
            output.categories = Some(report);
        } else {
            render::categories(&report);
            render::text(narrative::CATEGORY_TAKEAWAYS);
        }
    }
    if matches!(cli.command, Commands::Discounts | Commands::All) {
        let report = DiscountBinningEngine::new(config.discounts.histogram_bins)
            .analyze(&dataset)
            .context("Discount analysis failed")?;
        if json {
            output.discounts = Some(report);
        } else {
            render::discounts(&report);
            render::text(narrative::DISCOUNT_CONCLUSION);
        }
    }
    if matches!(cli.command, Commands::Model) || all {
        show_text(json, &mut output, narrative::MODEL_DEVELOPMENT);
    }
    if matches!(cli.command, Commands::Conclusion) || all {
        show_text(json, &mut output, narrative::FINAL_RECOMMENDATIONS);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

fn show_text<'a>(json: bool, output: &mut JsonOutput<'a>, body: &'a str) {
    if json {
        output.text.push(body);
    } else {
        render::text(body);
    }
}

/// Command-line flags take precedence over the configuration file.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(path) = &cli.transactions {
        config.data.transactions_path = path.clone();
    }
    if let Some(path) = &cli.events {
        config.data.events_path = path.clone();
    }
    if let Some(format) = cli.format {
        config.report.format = format;
    }
}

/// Installs the global subscriber: stderr always, plus a daily rolling file when
/// `logging.directory` is configured. `RUST_LOG` takes precedence over the config filter.
fn init_tracing(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = log_filter(settings)?;
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match &settings.directory {
        Some(directory) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("cafe-dashboard.log")
                .build(directory)
                .with_context(|| format!("Cannot write logs to {}", directory.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .try_init()?;
            Ok(None)
        }
    }
}

fn log_filter(settings: &LoggingSettings) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .with_context(|| format!("Invalid log filter '{}'", settings.filter))
}
