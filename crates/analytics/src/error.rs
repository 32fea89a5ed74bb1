use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Not enough data in sample '{sample}': need at least {required} observations, got {actual}")]
    InsufficientSample {
        sample: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Test statistic is undefined because {0} has zero variance")]
    ZeroVariance(&'static str),

    #[error(transparent)]
    DataIntegrity(#[from] CoreError),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
