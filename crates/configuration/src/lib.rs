use crate::error::ConfigError;
use config::{Environment, File, FileFormat};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    Config, DataSources, DiscountSettings, LoggingSettings, OutputFormat, ReportSettings,
};

/// The default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";

/// Prefix of the environment variables that override file values.
const ENV_PREFIX: &str = "CAFE";

/// Highest number of decimal places a p-value may be rounded to.
const MAX_P_VALUE_DECIMALS: u32 = 15;

/// Loads the application configuration.
///
/// Values are layered: built-in defaults, then the TOML file at `path` (if it
/// exists), then `CAFE__<SECTION>__<KEY>` environment variables.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_with_environment(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn load_with_environment(path: &Path, environment: Environment) -> Result<Config, ConfigError> {
    let load_error = |source: config::ConfigError| ConfigError::LoadError {
        path: path.to_path_buf(),
        source,
    };
    let config = config::Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(false))
        .add_source(environment)
        .build()
        .and_then(|built| built.try_deserialize::<Config>())
        .map_err(load_error)?;
    validate(&config)?;

    tracing::debug!(path = %path.display(), ?config, "Configuration loaded");
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.discounts.histogram_bins == 0 {
        return Err(ConfigError::ValidationError(
            "discounts.histogram_bins must be at least 1".to_string(),
        ));
    }
    for (key, value) in [
        ("report.aggregate_p_value_decimals", config.report.aggregate_p_value_decimals),
        ("report.event_p_value_decimals", config.report.event_p_value_decimals),
    ] {
        if value > MAX_P_VALUE_DECIMALS {
            return Err(ConfigError::ValidationError(format!(
                "{key} must be at most {MAX_P_VALUE_DECIMALS}, got {value}"
            )));
        }
    }
    Ok(())
}
