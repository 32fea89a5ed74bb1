use crate::error::AnalyticsError;
use crate::report::{BinCategoryQuantity, BinQuantity, DiscountReport, DiscountSplit, HistogramBucket};
use crate::stats;
use core_types::{Dataset, DiscountBin, ItemCategory, Transaction};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Measures how discount depth relates to the quantity sold.
#[derive(Debug, Clone)]
pub struct DiscountBinningEngine {
    histogram_bins: usize,
}

impl Default for DiscountBinningEngine {
    fn default() -> Self {
        Self::new(30)
    }
}

impl DiscountBinningEngine {
    /// `histogram_bins` is the number of equal-width buckets in the distribution
    /// histogram; values below one are treated as one.
    pub fn new(histogram_bins: usize) -> Self {
        Self {
            histogram_bins: histogram_bins.max(1),
        }
    }

    pub fn analyze(&self, dataset: &Dataset) -> Result<DiscountReport, AnalyticsError> {
        let transactions = dataset.transactions();
        let split = discount_split(transactions);

        // --- Discount ratio per transaction, zero-gross rows set aside ---
        let mut discounted: Vec<(Decimal, &Transaction)> = Vec::new();
        let mut undefined_ratio_rows = 0;
        for transaction in transactions {
            match transaction.discount_ratio()? {
                Some(ratio) if ratio > Decimal::ZERO => discounted.push((ratio, transaction)),
                Some(_) => {}
                None => undefined_ratio_rows += 1,
            }
        }
        if undefined_ratio_rows > 0 {
            tracing::warn!(
                rows = undefined_ratio_rows,
                "Excluded transactions with zero gross amount from discount percentages"
            );
        }

        let ratios = discounted
            .iter()
            .map(|(ratio, _)| stats::to_f64(*ratio))
            .collect::<Result<Vec<_>, _>>()?;
        let histogram = histogram(&ratios, self.histogram_bins);

        // --- Fixed bins ---
        let mut per_bin: BTreeMap<DiscountBin, u64> =
            DiscountBin::ALL.iter().map(|bin| (*bin, 0)).collect();
        let mut per_bin_category: BTreeMap<(DiscountBin, ItemCategory), u64> = BTreeMap::new();
        let mut unbinned_rows = 0;
        for (ratio, transaction) in &discounted {
            let Some(bin) = DiscountBin::classify(*ratio) else {
                unbinned_rows += 1;
                continue;
            };
            let quantity = u64::from(transaction.quantity);
            *per_bin.entry(bin).or_default() += quantity;
            *per_bin_category
                .entry((bin, transaction.category))
                .or_default() += quantity;
        }

        tracing::info!(
            discounted = discounted.len(),
            unbinned = unbinned_rows,
            "Discount analysis complete"
        );

        Ok(DiscountReport {
            split,
            histogram,
            per_bin: per_bin
                .into_iter()
                .map(|(bin, quantity)| BinQuantity {
                    bin,
                    label: bin.label(),
                    quantity,
                })
                .collect(),
            per_bin_category: per_bin_category
                .into_iter()
                .map(|((bin, category), quantity)| BinCategoryQuantity {
                    bin,
                    label: bin.label(),
                    category,
                    quantity,
                })
                .collect(),
            undefined_ratio_rows,
            unbinned_rows,
        })
    }
}

/// Total quantity sold with and without a discount, by the discount flag alone.
fn discount_split(transactions: &[Transaction]) -> Vec<DiscountSplit> {
    let (mut with, mut without) = (0u64, 0u64);
    for transaction in transactions {
        if transaction.discount_applied {
            with += u64::from(transaction.quantity);
        } else {
            without += u64::from(transaction.quantity);
        }
    }
    vec![
        DiscountSplit {
            label: "Discounted",
            discount_applied: true,
            quantity: with,
        },
        DiscountSplit {
            label: "Non-Discounted",
            discount_applied: false,
            quantity: without,
        },
    ]
}

/// Equal-width histogram over the observed range of `values`.
///
/// A degenerate range (all values equal) is widened by 0.5 on each side.
fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBucket> {
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    let max = values.iter().copied().fold(min, f64::max);
    let (lower, upper) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (upper - lower) / bins as f64;

    let mut counts = vec![0usize; bins];
    for value in values {
        let index = (((value - lower) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBucket {
            lower: lower + width * i as f64,
            upper: if i + 1 == bins {
                upper
            } else {
                lower + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn line(category: ItemCategory, sale: Decimal, discount: Decimal, quantity: u32) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            category,
            product: category.as_str().to_string(),
            sale_amount: sale,
            quantity,
            discount_applied: discount > Decimal::ZERO,
            discount_amount: discount,
            temperature_f: 60.0,
        }
    }

    fn quantities(report: &DiscountReport) -> Vec<u64> {
        report.per_bin.iter().map(|b| b.quantity).collect()
    }

    #[test]
    fn test_split_sums_to_total_quantity() {
        let dataset = Dataset::new(
            vec![
                line(ItemCategory::Coffee, dec!(10), dec!(0), 3),
                line(ItemCategory::Tea, dec!(9), dec!(1), 2),
                line(ItemCategory::Tea, dec!(0), dec!(0), 5),
                line(ItemCategory::Pastries, dec!(1), dec!(9), 4),
            ],
            vec![],
        );
        let report = DiscountBinningEngine::default().analyze(&dataset).unwrap();

        assert_eq!(report.split[0].label, "Discounted");
        assert_eq!(report.split[0].quantity, 6);
        assert_eq!(report.split[1].label, "Non-Discounted");
        assert_eq!(report.split[1].quantity, 8);
        let total: u64 = dataset.transactions().iter().map(|t| u64::from(t.quantity)).sum();
        assert_eq!(report.split.iter().map(|s| s.quantity).sum::<u64>(), total);
    }

    #[test]
    fn test_boundary_ratios_land_in_higher_bin() {
        let dataset = Dataset::new(
            vec![
                // 0.025 -> Low
                line(ItemCategory::Coffee, dec!(97.5), dec!(2.5), 1),
                // 0.05 -> Moderate
                line(ItemCategory::Coffee, dec!(95), dec!(5), 10),
                // 0.10 -> High
                line(ItemCategory::Coffee, dec!(90), dec!(10), 100),
                // 0.50 -> Very High
                line(ItemCategory::Coffee, dec!(50), dec!(50), 1000),
            ],
            vec![],
        );
        let report = DiscountBinningEngine::default().analyze(&dataset).unwrap();
        assert_eq!(quantities(&report), vec![0, 1, 10, 100, 1000]);
    }

    #[test]
    fn test_per_bin_keeps_fixed_order_and_empty_bins() {
        let dataset = Dataset::new(vec![line(ItemCategory::Tea, dec!(80), dec!(20), 7)], vec![]);
        let report = DiscountBinningEngine::default().analyze(&dataset).unwrap();
        let labels: Vec<_> = report.per_bin.iter().map(|b| b.label).collect();
        assert_eq!(
            labels,
            vec![
                "Very Low (0–2.5%)",
                "Low (2.5–5%)",
                "Moderate (5–10%)",
                "High (10–20%)",
                "Very High (>20%)"
            ]
        );
        assert_eq!(quantities(&report), vec![0, 0, 0, 0, 7]);
    }

    #[test]
    fn test_per_bin_sum_matches_binned_rows() {
        let dataset = Dataset::new(
            vec![
                line(ItemCategory::Coffee, dec!(99), dec!(1), 5),
                line(ItemCategory::Tea, dec!(93), dec!(7), 6),
                line(ItemCategory::Sandwiches, dec!(30), dec!(70), 9),
                line(ItemCategory::Pastries, dec!(12), dec!(0), 11),
                line(ItemCategory::Pastries, dec!(0), dec!(0), 13),
            ],
            vec![],
        );
        let report = DiscountBinningEngine::default().analyze(&dataset).unwrap();

        // 0.70 is above every bin; zero and zero-gross rows are never binned.
        assert_eq!(report.per_bin.iter().map(|b| b.quantity).sum::<u64>(), 11);
        assert_eq!(report.unbinned_rows, 1);
        assert_eq!(report.undefined_ratio_rows, 1);
    }

    #[test]
    fn test_per_bin_category_ordering_and_omission() {
        let dataset = Dataset::new(
            vec![
                line(ItemCategory::Sandwiches, dec!(93), dec!(7), 2),
                line(ItemCategory::Coffee, dec!(93), dec!(7), 3),
                line(ItemCategory::Coffee, dec!(99), dec!(1), 4),
                line(ItemCategory::Coffee, dec!(98), dec!(2), 1),
            ],
            vec![],
        );
        let report = DiscountBinningEngine::default().analyze(&dataset).unwrap();
        let rows: Vec<_> = report
            .per_bin_category
            .iter()
            .map(|r| (r.bin, r.category, r.quantity))
            .collect();
        assert_eq!(
            rows,
            vec![
                (DiscountBin::VeryLow, ItemCategory::Coffee, 5),
                (DiscountBin::Moderate, ItemCategory::Coffee, 3),
                (DiscountBin::Moderate, ItemCategory::Sandwiches, 2),
            ]
        );
    }

    #[test]
    fn test_negative_gross_is_a_data_integrity_error() {
        let dataset = Dataset::new(vec![line(ItemCategory::Coffee, dec!(-10), dec!(2), 1)], vec![]);
        let err = DiscountBinningEngine::default().analyze(&dataset).unwrap_err();
        assert!(matches!(err, AnalyticsError::DataIntegrity(_)));

        let message = err.to_string();
        assert_eq!(message.matches("Data integrity violation").count(), 1);
        assert!(message.contains("gross amount -8"));
    }

    #[test]
    fn test_histogram_counts_every_positive_ratio() {
        let dataset = Dataset::new(
            vec![
                line(ItemCategory::Coffee, dec!(99), dec!(1), 1),
                line(ItemCategory::Coffee, dec!(95), dec!(5), 1),
                line(ItemCategory::Coffee, dec!(90), dec!(10), 1),
                line(ItemCategory::Coffee, dec!(80), dec!(20), 1),
                line(ItemCategory::Coffee, dec!(10), dec!(0), 1),
            ],
            vec![],
        );
        let report = DiscountBinningEngine::new(4).analyze(&dataset).unwrap();
        assert_eq!(report.histogram.len(), 4);
        assert_eq!(report.histogram.iter().map(|b| b.count).sum::<usize>(), 4);
        assert!((report.histogram[0].lower - 0.01).abs() < 1e-12);
        assert!((report.histogram[3].upper - 0.20).abs() < 1e-12);
        // The maximum sits on the closed right edge of the last bucket.
        assert_eq!(report.histogram[3].count, 1);
    }

    #[test]
    fn test_histogram_degenerate_range() {
        let buckets = histogram(&[0.1, 0.1, 0.1], 5);
        assert_eq!(buckets.len(), 5);
        assert!((buckets[0].lower - (-0.4)).abs() < 1e-12);
        assert!((buckets[4].upper - 0.6).abs() < 1e-12);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 3);
        assert!(histogram(&[], 5).is_empty());
    }
}
