use chrono::NaiveDate;
use core_types::{DiscountBin, ItemCategory};
use rust_decimal::Decimal;
use serde::Serialize;

/// The result of a Student's t test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTest {
    pub t_statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    pub degrees_of_freedom: f64,
}

/// A significance test that may not be computable for the data at hand.
///
/// Insufficient samples degrade to `NotComputable` so that the rest of a
/// report can still be shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    Computed(TTest),
    NotComputable { reason: String },
}

impl TestOutcome {
    pub fn p_value(&self) -> Option<f64> {
        match self {
            TestOutcome::Computed(test) => Some(test.p_value),
            TestOutcome::NotComputable { .. } => None,
        }
    }
}

// ==============================================================================
// Event impact
// ==============================================================================

/// Total sales for one calendar day, joined against the events calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub total_sales: Decimal,
    pub event: Option<String>,
}

impl DailySales {
    pub fn is_event(&self) -> bool {
        self.event.is_some()
    }
}

/// Count, mean and sample standard deviation of one group of daily totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSummary {
    pub label: &'static str,
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

/// How a single event day compares with the non-event baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDayResult {
    pub date: NaiveDate,
    pub event: String,
    /// `"<event> (<YYYY-MM-DD>)"`, used as the chart axis label.
    pub label: String,
    pub sale_amount: Decimal,
    pub test: TestOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventImpactReport {
    pub daily_sales: Vec<DailySales>,
    /// Non-event days first, then event days.
    pub summary: Vec<SampleSummary>,
    /// Welch's test of event-day against non-event-day totals.
    pub welch_test: TestOutcome,
    /// Sorted by ascending p-value; rows without a test come last.
    pub event_days: Vec<EventDayResult>,
    /// Mean of the non-event daily totals.
    pub baseline_mean: Option<f64>,
}

impl EventImpactReport {
    /// Event days ordered by sales, highest first, for the bar chart.
    pub fn by_sales(&self) -> Vec<&EventDayResult> {
        let mut rows: Vec<_> = self.event_days.iter().collect();
        rows.sort_by(|a, b| b.sale_amount.cmp(&a.sale_amount).then(a.date.cmp(&b.date)));
        rows
    }
}

// ==============================================================================
// Discounts
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountSplit {
    pub label: &'static str,
    pub discount_applied: bool,
    pub quantity: u64,
}

/// One equal-width bucket of the discount-percentage histogram.
/// Buckets are `[lower, upper)` except the last, which also includes `upper`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinQuantity {
    pub bin: DiscountBin,
    pub label: &'static str,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinCategoryQuantity {
    pub bin: DiscountBin,
    pub label: &'static str,
    pub category: ItemCategory,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountReport {
    /// "Discounted" then "Non-Discounted".
    pub split: Vec<DiscountSplit>,
    pub histogram: Vec<HistogramBucket>,
    /// All five bins in bin order, including empty ones.
    pub per_bin: Vec<BinQuantity>,
    /// Ordered by bin then category. Pairs with no transactions are omitted.
    pub per_bin_category: Vec<BinCategoryQuantity>,
    /// Transactions whose gross amount is zero, so the discount ratio is undefined.
    pub undefined_ratio_rows: usize,
    /// Transactions discounted by more than 50%, which fall outside every bin.
    pub unbinned_rows: usize,
}

// ==============================================================================
// Categories
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: ItemCategory,
    pub total_sales: Decimal,
    pub total_quantity: u64,
    /// Revenue per item sold; absent when nothing was sold.
    pub average_price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCategorySales {
    /// First day of the month.
    pub month: NaiveDate,
    pub category: ItemCategory,
    pub total_sales: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    pub categories: Vec<CategoryStats>,
    pub monthly: Vec<MonthlyCategorySales>,
}

// ==============================================================================
// Temperature
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTemperature {
    pub date: NaiveDate,
    pub total_sales: Decimal,
    pub mean_temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCorrelation {
    pub product: String,
    /// Number of days on which the product sold.
    pub days: usize,
    pub correlation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureReport {
    pub daily: Vec<DailyTemperature>,
    /// Pearson correlation of daily total sales with daily mean temperature.
    pub correlation: Option<f64>,
    /// Ascending by correlation; undefined correlations last.
    pub products: Vec<ProductCorrelation>,
}
