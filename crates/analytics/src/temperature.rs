use crate::error::AnalyticsError;
use crate::report::{DailyTemperature, ProductCorrelation, TemperatureReport};
use crate::stats;
use chrono::NaiveDate;
use core_types::Dataset;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Relates sales to the recorded outdoor temperature.
#[derive(Debug, Default, Clone)]
pub struct TemperatureAggregator {}

#[derive(Default)]
struct Accumulator {
    sales: Decimal,
    temperature_sum: f64,
    rows: usize,
}

impl Accumulator {
    fn add(&mut self, sale: Decimal, temperature: f64) {
        self.sales += sale;
        self.temperature_sum += temperature;
        self.rows += 1;
    }

    fn mean_temperature(&self) -> f64 {
        self.temperature_sum / self.rows as f64
    }
}

impl TemperatureAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(&self, dataset: &Dataset) -> Result<TemperatureReport, AnalyticsError> {
        let mut by_day: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();
        let mut by_day_product: BTreeMap<(NaiveDate, &str), Accumulator> = BTreeMap::new();
        for t in dataset.transactions() {
            by_day
                .entry(t.date)
                .or_default()
                .add(t.sale_amount, t.temperature_f);
            by_day_product
                .entry((t.date, t.product.as_str()))
                .or_default()
                .add(t.sale_amount, t.temperature_f);
        }

        // --- Total daily sales vs temperature ---
        let daily: Vec<DailyTemperature> = by_day
            .iter()
            .map(|(date, acc)| DailyTemperature {
                date: *date,
                total_sales: acc.sales,
                mean_temperature: acc.mean_temperature(),
            })
            .collect();
        let pairs = daily
            .iter()
            .map(|d| Ok((stats::to_f64(d.total_sales)?, d.mean_temperature)))
            .collect::<Result<Vec<_>, AnalyticsError>>()?;
        let correlation = stats::pearson(&pairs);

        // --- Product-wise correlation ---
        // The day's temperature here is the mean of each product's mean temperature.
        let mut product_temps: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for ((date, _), acc) in &by_day_product {
            let entry = product_temps.entry(*date).or_default();
            entry.0 += acc.mean_temperature();
            entry.1 += 1;
        }

        let mut series: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
        for ((date, product), acc) in &by_day_product {
            let (sum, count) = product_temps[date];
            series
                .entry(*product)
                .or_default()
                .push((stats::to_f64(acc.sales)?, sum / count as f64));
        }

        let mut products: Vec<ProductCorrelation> = series
            .into_iter()
            .map(|(product, pairs)| ProductCorrelation {
                product: product.to_string(),
                days: pairs.len(),
                correlation: stats::pearson(&pairs),
            })
            .collect();
        products.sort_by(|a, b| match (a.correlation, b.correlation) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        tracing::info!(
            days = daily.len(),
            products = products.len(),
            "Temperature analysis complete"
        );

        Ok(TemperatureReport {
            daily,
            correlation,
            products,
        })
    }
}
