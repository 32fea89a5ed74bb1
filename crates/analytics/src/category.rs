use crate::report::{CategoryReport, CategoryStats, MonthlyCategorySales};
use chrono::{Datelike, NaiveDate};
use core_types::{Dataset, ItemCategory};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Revenue and volume per menu category.
#[derive(Debug, Default, Clone)]
pub struct CategoryAggregator {}

impl CategoryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(&self, dataset: &Dataset) -> CategoryReport {
        let mut totals: BTreeMap<ItemCategory, (Decimal, u64)> = BTreeMap::new();
        let mut monthly: BTreeMap<(NaiveDate, ItemCategory), Decimal> = BTreeMap::new();

        for transaction in dataset.transactions() {
            let entry = totals.entry(transaction.category).or_default();
            entry.0 += transaction.sale_amount;
            entry.1 += u64::from(transaction.quantity);

            *monthly
                .entry((month_start(transaction.date), transaction.category))
                .or_default() += transaction.sale_amount;
        }

        // BTreeMap iteration follows `ItemCategory`'s declared order.
        let categories = totals
            .into_iter()
            .map(|(category, (total_sales, total_quantity))| CategoryStats {
                category,
                total_sales,
                total_quantity,
                average_price: (total_quantity > 0)
                    .then(|| total_sales / Decimal::from(total_quantity)),
            })
            .collect();

        let monthly = monthly
            .into_iter()
            .map(|((month, category), total_sales)| MonthlyCategorySales {
                month,
                category,
                total_sales,
            })
            .collect();

        CategoryReport {
            categories,
            monthly,
        }
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
