use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read settings from {} or CAFE__* variables: {source}", path.display())]
    LoadError {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },

    #[error("Invalid dashboard setting: {0}")]
    ValidationError(String),
}
