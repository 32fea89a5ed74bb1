//! # Cafe Dashboard Analytics
//!
//! This crate turns the loaded sales dataset into the tables and summary values
//! each dashboard section displays.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of files or terminals. It depends
//!   only on `core-types`.
//! - **Stateless Calculation:** Every engine takes an immutable `&Dataset` and returns
//!   a freshly built report. Nothing is cached and the input is never mutated, so the
//!   sections can run in any order with identical results.
//! - **Graceful Degradation:** A significance test that lacks data becomes a
//!   `TestOutcome::NotComputable` instead of failing the whole report.
//!
//! ## Public API
//!
//! - `EventSignificanceEngine`: Event-day vs non-event-day comparisons.
//! - `DiscountBinningEngine`: Discount split, histogram and binned quantities.
//! - `CategoryAggregator` / `TemperatureAggregator`: Group-by summaries and correlations.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod category;
pub mod discounts;
pub mod error;
pub mod events;
pub mod report;
pub mod stats;
pub mod temperature;

// Re-export the key components to create a clean, public-facing API.
pub use category::CategoryAggregator;
pub use discounts::DiscountBinningEngine;
pub use error::AnalyticsError;
pub use events::EventSignificanceEngine;
pub use report::{
    BinCategoryQuantity, BinQuantity, CategoryReport, CategoryStats, DailySales,
    DailyTemperature, DiscountReport, DiscountSplit, EventDayResult, EventImpactReport,
    HistogramBucket, MonthlyCategorySales, ProductCorrelation, SampleSummary, TTest,
    TemperatureReport, TestOutcome,
};
pub use temperature::TemperatureAggregator;
