//! Sample statistics and Student's t tests shared by the analysis engines.
//!
//! All variance figures use the unbiased (n - 1) estimator. p-values are two-sided.

use crate::error::AnalyticsError;
use crate::report::TTest;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

/// A named slice of observations, so errors can say which sample was short.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    pub name: &'static str,
    pub values: &'a [f64],
}

impl<'a> Sample<'a> {
    pub fn new(name: &'static str, values: &'a [f64]) -> Self {
        Self { name, values }
    }

    fn require(&self, required: usize) -> Result<(), AnalyticsError> {
        if self.values.len() < required {
            return Err(AnalyticsError::InsufficientSample {
                sample: self.name,
                required,
                actual: self.values.len(),
            });
        }
        Ok(())
    }

    fn len(&self) -> f64 {
        self.values.len() as f64
    }

    fn mean(&self) -> f64 {
        self.values.iter().mean()
    }

    fn variance(&self) -> f64 {
        self.values.iter().variance()
    }
}

/// Mean of the values, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().mean())
}

/// Sample standard deviation, or `None` with fewer than two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    (values.len() >= 2).then(|| values.iter().std_dev())
}

/// Welch's unequal-variance two-sample t test of `a` against `b`.
pub fn welch_t_test(a: Sample<'_>, b: Sample<'_>) -> Result<TTest, AnalyticsError> {
    a.require(2)?;
    b.require(2)?;

    let va = a.variance() / a.len();
    let vb = b.variance() / b.len();
    let standard_error = (va + vb).sqrt();
    if standard_error <= 0.0 || !standard_error.is_finite() {
        return Err(AnalyticsError::ZeroVariance("both samples"));
    }

    let t_statistic = (a.mean() - b.mean()) / standard_error;
    // Welch–Satterthwaite approximation
    let degrees_of_freedom =
        (va + vb).powi(2) / (va.powi(2) / (a.len() - 1.0) + vb.powi(2) / (b.len() - 1.0));

    two_sided(t_statistic, degrees_of_freedom)
}

/// One-sample t test of whether `sample` could have population mean `hypothesized_mean`.
pub fn one_sample_t_test(sample: Sample<'_>, hypothesized_mean: f64) -> Result<TTest, AnalyticsError> {
    sample.require(2)?;

    let standard_error = (sample.variance() / sample.len()).sqrt();
    if standard_error <= 0.0 || !standard_error.is_finite() {
        return Err(AnalyticsError::ZeroVariance(sample.name));
    }

    let t_statistic = (sample.mean() - hypothesized_mean) / standard_error;
    two_sided(t_statistic, sample.len() - 1.0)
}

fn two_sided(t_statistic: f64, degrees_of_freedom: f64) -> Result<TTest, AnalyticsError> {
    let distribution = StudentsT::new(0.0, 1.0, degrees_of_freedom)
        .map_err(|e| AnalyticsError::Calculation(format!("invalid t distribution: {e}")))?;
    let p_value = (2.0 * distribution.sf(t_statistic.abs())).clamp(0.0, 1.0);

    Ok(TTest {
        t_statistic,
        p_value,
        degrees_of_freedom,
    })
}

/// Pearson correlation coefficient over paired observations.
///
/// Returns `None` with fewer than two pairs or when either side is constant.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let xs: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    // Exact check: the running-sum variance can leave a tiny residue on constant input.
    if is_constant(&xs) || is_constant(&ys) {
        return None;
    }

    let spread = xs.iter().std_dev() * ys.iter().std_dev();
    if spread <= 0.0 || !spread.is_finite() {
        return None;
    }
    Some((xs.iter().covariance(ys.iter()) / spread).clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub(crate) fn to_f64(value: Decimal) -> Result<f64, AnalyticsError> {
    value
        .to_f64()
        .ok_or_else(|| AnalyticsError::Calculation(format!("{value} cannot be represented as f64")))
}
