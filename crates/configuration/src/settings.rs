use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `dashboard.toml`; omitted sections fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSources,
    pub report: ReportSettings,
    pub discounts: DiscountSettings,
    pub logging: LoggingSettings,
}

/// Locations of the two input files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSources {
    /// The cleaned transaction ledger.
    pub transactions_path: PathBuf,
    /// The calendar of events and holidays.
    pub events_path: PathBuf,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            transactions_path: PathBuf::from("CafeSales_clean.csv"),
            events_path: PathBuf::from("Events_2023_2024.csv"),
        }
    }
}

/// How results are rendered.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub format: OutputFormat,
    /// Decimal places shown for the event vs non-event Welch test p-value.
    pub aggregate_p_value_decimals: u32,
    /// Decimal places kept for the per-event one-sample p-values.
    pub event_p_value_decimals: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            aggregate_p_value_decimals: 4,
            event_p_value_decimals: 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Parameters for the discount distribution section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscountSettings {
    /// Number of equal-width buckets in the discount-percentage histogram.
    pub histogram_bins: usize,
}

impl Default for DiscountSettings {
    fn default() -> Self {
        Self { histogram_bins: 30 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub filter: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
        }
    }
}
