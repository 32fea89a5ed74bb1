use crate::error::AnalyticsError;
use crate::report::{DailySales, EventDayResult, EventImpactReport, SampleSummary, TTest, TestOutcome};
use crate::stats::{self, Sample};
use chrono::NaiveDate;
use core_types::Dataset;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

const EVENT_SAMPLE: &str = "event days";
const BASELINE_SAMPLE: &str = "non-event days";

/// Compares sales on event days against the typical non-event day.
///
/// The engine is stateless apart from its rounding setting; every call to
/// `analyze` recomputes the daily series from the dataset.
#[derive(Debug, Clone)]
pub struct EventSignificanceEngine {
    event_p_value_decimals: u32,
}

impl Default for EventSignificanceEngine {
    fn default() -> Self {
        Self::new(9)
    }
}

impl EventSignificanceEngine {
    /// `event_p_value_decimals` controls the rounding of the per-event p-values.
    pub fn new(event_p_value_decimals: u32) -> Self {
        Self {
            event_p_value_decimals,
        }
    }

    /// Sums sales per calendar day and left-joins the events calendar onto them.
    ///
    /// Days are returned in ascending date order. If the calendar lists a date
    /// more than once, the first description is used.
    pub fn daily_sales(dataset: &Dataset) -> Vec<DailySales> {
        let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for transaction in dataset.transactions() {
            *totals.entry(transaction.date).or_default() += transaction.sale_amount;
        }

        let mut calendar: HashMap<NaiveDate, &str> = HashMap::new();
        for event in dataset.events() {
            calendar.entry(event.date).or_insert(event.description.as_str());
        }

        totals
            .into_iter()
            .map(|(date, total_sales)| DailySales {
                date,
                total_sales,
                event: calendar.get(&date).map(|d| d.to_string()),
            })
            .collect()
    }

    /// Runs the full event-impact analysis.
    pub fn analyze(&self, dataset: &Dataset) -> Result<EventImpactReport, AnalyticsError> {
        let daily_sales = Self::daily_sales(dataset);

        let mut event_sales = Vec::new();
        let mut baseline = Vec::new();
        for day in &daily_sales {
            let total = stats::to_f64(day.total_sales)?;
            if day.is_event() {
                event_sales.push(total);
            } else {
                baseline.push(total);
            }
        }

        let summary = vec![
            summarize("Non-Event Day", &baseline),
            summarize("Event Day", &event_sales),
        ];

        let welch_test = degrade(stats::welch_t_test(
            Sample::new(EVENT_SAMPLE, &event_sales),
            Sample::new(BASELINE_SAMPLE, &baseline),
        ))?;
        if let TestOutcome::NotComputable { reason } = &welch_test {
            tracing::warn!(%reason, "Event vs non-event test not computable");
        }

        let mut event_days = daily_sales
            .iter()
            .filter_map(|day| day.event.as_deref().map(|event| (day, event)))
            .map(|(day, event)| self.test_event_day(day, event, &baseline))
            .collect::<Result<Vec<_>, AnalyticsError>>()?;

        event_days.sort_by(|a, b| {
            let pa = a.test.p_value().unwrap_or(f64::INFINITY);
            let pb = b.test.p_value().unwrap_or(f64::INFINITY);
            pa.total_cmp(&pb).then(a.date.cmp(&b.date))
        });

        tracing::info!(
            days = daily_sales.len(),
            event_days = event_days.len(),
            "Event impact analysis complete"
        );

        Ok(EventImpactReport {
            daily_sales,
            summary,
            welch_test,
            event_days,
            baseline_mean: stats::mean(&baseline),
        })
    }

    /// One-sample test of the baseline against this day's total as the hypothesized mean.
    fn test_event_day(
        &self,
        day: &DailySales,
        event: &str,
        baseline: &[f64],
    ) -> Result<EventDayResult, AnalyticsError> {
        let hypothesized_mean = stats::to_f64(day.total_sales)?;
        let test = match degrade(stats::one_sample_t_test(
            Sample::new(BASELINE_SAMPLE, baseline),
            hypothesized_mean,
        ))? {
            TestOutcome::Computed(test) => TestOutcome::Computed(TTest {
                p_value: stats::round_to(test.p_value, self.event_p_value_decimals),
                ..test
            }),
            not_computable => not_computable,
        };

        Ok(EventDayResult {
            date: day.date,
            event: event.to_string(),
            label: format!("{} ({})", event, day.date.format("%Y-%m-%d")),
            sale_amount: day.total_sales,
            test,
        })
    }
}

fn summarize(label: &'static str, values: &[f64]) -> SampleSummary {
    SampleSummary {
        label,
        count: values.len(),
        mean: stats::mean(values),
        std_dev: stats::std_dev(values),
    }
}

/// Turns data-shape failures into a reportable outcome; anything else is a real error.
fn degrade(result: Result<TTest, AnalyticsError>) -> Result<TestOutcome, AnalyticsError> {
    match result {
        Ok(test) => Ok(TestOutcome::Computed(test)),
        Err(e @ (AnalyticsError::InsufficientSample { .. } | AnalyticsError::ZeroVariance(_))) => {
            Ok(TestOutcome::NotComputable {
                reason: e.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Event, ItemCategory, Transaction};
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sale(day: u32, amount: Decimal) -> Transaction {
        Transaction {
            date: date(day),
            category: ItemCategory::Coffee,
            product: "Espresso".to_string(),
            sale_amount: amount,
            quantity: 1,
            discount_applied: false,
            discount_amount: Decimal::ZERO,
            temperature_f: 68.0,
        }
    }

    fn event(day: u32, description: &str) -> Event {
        Event {
            date: date(day),
            description: description.to_string(),
        }
    }

    /// Five baseline days averaging 100 and three event days.
    fn week_dataset() -> Dataset {
        let mut transactions = vec![
            sale(1, dec!(60)),
            sale(1, dec!(40)),
            sale(2, dec!(110)),
            sale(3, dec!(90)),
            sale(4, dec!(105)),
            sale(5, dec!(95)),
            sale(6, dec!(150)),
            sale(7, dec!(98)),
        ];
        transactions.push(sale(8, dec!(80)));
        let events = vec![
            event(6, "Long Weekend"),
            event(7, "Labor Day"),
            event(8, "Festival"),
            event(20, "No Sales That Day"),
        ];
        Dataset::new(transactions, events)
    }

    #[test]
    fn test_daily_sales_left_join() {
        let daily = EventSignificanceEngine::daily_sales(&week_dataset());
        assert_eq!(daily.len(), 8);
        assert_eq!(daily[0].date, date(1));
        assert_eq!(daily[0].total_sales, dec!(100));
        assert!(!daily[0].is_event());
        assert_eq!(daily[5].event.as_deref(), Some("Long Weekend"));
        // Calendar dates without sales do not create days.
        assert!(daily.iter().all(|d| d.date != date(20)));
    }

    #[test]
    fn test_duplicate_calendar_dates_keep_first_description() {
        let dataset = Dataset::new(
            vec![sale(2, dec!(10))],
            vec![event(2, "First"), event(2, "Second")],
        );
        let daily = EventSignificanceEngine::daily_sales(&dataset);
        assert_eq!(daily[0].event.as_deref(), Some("First"));
    }

    #[test]
    fn test_summary_statistics() {
        let report = EventSignificanceEngine::default().analyze(&week_dataset()).unwrap();

        let baseline = &report.summary[0];
        assert_eq!(baseline.label, "Non-Event Day");
        assert_eq!(baseline.count, 5);
        assert!((baseline.mean.unwrap() - 100.0).abs() < 1e-9);
        assert!((baseline.std_dev.unwrap() - 62.5f64.sqrt()).abs() < 1e-9);

        let events = &report.summary[1];
        assert_eq!(events.label, "Event Day");
        assert_eq!(events.count, 3);
        assert!((events.mean.unwrap() - 328.0 / 3.0).abs() < 1e-9);

        assert_eq!(report.baseline_mean, Some(100.0));
        assert!(matches!(report.welch_test, TestOutcome::Computed(_)));
    }

    #[test]
    fn test_event_days_sorted_by_p_value() {
        let report = EventSignificanceEngine::default().analyze(&week_dataset()).unwrap();
        let order: Vec<_> = report.event_days.iter().map(|e| e.event.as_str()).collect();
        assert_eq!(order, vec!["Long Weekend", "Festival", "Labor Day"]);

        let p_values: Vec<_> = report
            .event_days
            .iter()
            .map(|e| e.test.p_value().unwrap())
            .collect();
        assert!(p_values.windows(2).all(|w| w[0] <= w[1]));
        assert!(p_values.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_event_day_t_statistic_and_label() {
        let report = EventSignificanceEngine::default().analyze(&week_dataset()).unwrap();
        let long_weekend = &report.event_days[0];
        assert_eq!(long_weekend.label, "Long Weekend (2024-01-06)");
        assert_eq!(long_weekend.sale_amount, dec!(150));
        match long_weekend.test {
            TestOutcome::Computed(test) => {
                // (100 - 150) / sqrt(62.5 / 5)
                assert!((test.t_statistic - (-50.0 / 12.5f64.sqrt())).abs() < 1e-9);
                assert_eq!(test.degrees_of_freedom, 4.0);
            }
            ref other => panic!("expected a computed test, got {other:?}"),
        }
    }

    #[test]
    fn test_per_event_p_values_are_rounded() {
        let report = EventSignificanceEngine::new(2).analyze(&week_dataset()).unwrap();
        for row in &report.event_days {
            let p = row.test.p_value().unwrap();
            assert!(((p * 100.0).round() - p * 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_by_sales_orders_descending() {
        let report = EventSignificanceEngine::default().analyze(&week_dataset()).unwrap();
        let amounts: Vec<_> = report.by_sales().iter().map(|e| e.sale_amount).collect();
        assert_eq!(amounts, vec![dec!(150), dec!(98), dec!(80)]);
    }

    #[test]
    fn test_single_observation_samples_degrade_gracefully() {
        let dataset = Dataset::new(
            vec![sale(1, dec!(100)), sale(2, dec!(90))],
            vec![event(2, "Test Event")],
        );
        let report = EventSignificanceEngine::default().analyze(&dataset).unwrap();

        assert_eq!(report.summary[0].count, 1);
        assert_eq!(report.summary[0].std_dev, None);
        assert_eq!(report.summary[1].mean, Some(90.0));
        assert!(matches!(report.welch_test, TestOutcome::NotComputable { .. }));

        assert_eq!(report.event_days.len(), 1);
        assert_eq!(report.event_days[0].label, "Test Event (2024-01-02)");
        assert!(matches!(report.event_days[0].test, TestOutcome::NotComputable { .. }));
        assert_eq!(report.baseline_mean, Some(100.0));
    }

    #[test]
    fn test_constant_baseline_is_not_computable() {
        let dataset = Dataset::new(
            vec![sale(1, dec!(50)), sale(2, dec!(50)), sale(3, dec!(70))],
            vec![event(3, "Promo")],
        );
        let report = EventSignificanceEngine::default().analyze(&dataset).unwrap();
        match &report.event_days[0].test {
            TestOutcome::NotComputable { reason } => assert!(reason.contains("zero variance")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_empty_dataset() {
        let report = EventSignificanceEngine::default()
            .analyze(&Dataset::default())
            .unwrap();
        assert!(report.daily_sales.is_empty());
        assert!(report.event_days.is_empty());
        assert_eq!(report.summary[0].mean, None);
        assert_eq!(report.baseline_mean, None);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let dataset = week_dataset();
        let engine = EventSignificanceEngine::default();
        assert_eq!(engine.analyze(&dataset).unwrap(), engine.analyze(&dataset).unwrap());
    }
}
