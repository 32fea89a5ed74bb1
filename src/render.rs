use analytics::{
    CategoryReport, DiscountReport, EventImpactReport, TemperatureReport, TestOutcome,
};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use configuration::ReportSettings;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

const BAR_WIDTH: usize = 30;

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn right(text: impl ToString) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// A horizontal bar proportional to `value / max`.
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.clamp(1, BAR_WIDTH))
}

fn money(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

fn optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.decimals$}"))
}

fn heading(title: &str) {
    println!("\n=== {title} ===\n");
}

pub fn events(report: &EventImpactReport, settings: &ReportSettings) {
    heading("Event Effects on Sales");

    println!("Summary Statistics: Event vs Non-Event Days");
    let mut summary = table(&["", "count", "mean", "std"]);
    for row in &report.summary {
        summary.add_row(vec![
            Cell::new(row.label),
            right(row.count),
            right(optional(row.mean, 2)),
            right(optional(row.std_dev, 2)),
        ]);
    }
    println!("{summary}");

    let decimals = settings.aggregate_p_value_decimals as usize;
    match &report.welch_test {
        TestOutcome::Computed(test) => println!(
            "T-statistic: {:.2}, P-value: {:.decimals$}",
            test.t_statistic, test.p_value
        ),
        TestOutcome::NotComputable { reason } => {
            println!("T-test not computable: {reason}")
        }
    }

    println!("\nStatistical Test: Individual Event Days vs Non-Event Day Sales");
    let event_decimals = settings.event_p_value_decimals as usize;
    let mut per_event = table(&["Date", "Event", "Sale Amount", "T-stat", "P-value"]);
    for row in &report.event_days {
        let (t, p) = match &row.test {
            TestOutcome::Computed(test) => (
                format!("{:.4}", test.t_statistic),
                format!("{:.event_decimals$}", test.p_value),
            ),
            TestOutcome::NotComputable { reason } => {
                ("n/a".to_string(), format!("not computable: {reason}"))
            }
        };
        per_event.add_row(vec![
            Cell::new(row.date.format("%Y-%m-%d")),
            Cell::new(&row.event),
            right(money(row.sale_amount)),
            right(t),
            right(p),
        ]);
    }
    println!("{per_event}");

    println!("\nSales on Event Days vs. Average Non-Event Sales");
    let chart_rows = report.by_sales();
    let baseline = report.baseline_mean.unwrap_or_default();
    let max = chart_rows
        .iter()
        .filter_map(|r| r.sale_amount.to_f64())
        .fold(baseline, f64::max);
    let mut chart = table(&["Event", "Total Sales", ""]);
    for row in chart_rows {
        let value = row.sale_amount.to_f64().unwrap_or_default();
        chart.add_row(vec![
            Cell::new(&row.label),
            right(money(row.sale_amount)),
            Cell::new(bar(value, max)),
        ]);
    }
    if let Some(mean) = report.baseline_mean {
        chart.add_row(vec![
            Cell::new("Avg Non-Event Sales"),
            right(format!("{mean:.2}")),
            Cell::new(bar(mean, max)),
        ]);
    }
    println!("{chart}");
}

pub fn temperature(report: &TemperatureReport) {
    heading("Temperature Effects on Sales");

    match report.correlation {
        Some(r) => println!("Correlation between temperature and total sales: {r:.3}"),
        None => println!("Correlation between temperature and total sales: not computable"),
    }

    println!("\nTemperature vs. Total Daily Sales");
    let mut daily = table(&["Date", "Temperature (°F)", "Total Sales"]);
    for row in &report.daily {
        daily.add_row(vec![
            Cell::new(row.date.format("%Y-%m-%d")),
            right(format!("{:.1}", row.mean_temperature)),
            right(money(row.total_sales)),
        ]);
    }
    println!("{daily}");

    println!("\nProduct-wise correlation with temperature");
    let mut products = table(&["Product", "Days", "Correlation", ""]);
    for row in &report.products {
        products.add_row(vec![
            Cell::new(&row.product),
            right(row.days),
            right(optional(row.correlation, 3)),
            Cell::new(row.correlation.map(|r| bar(r.abs(), 1.0)).unwrap_or_default()),
        ]);
    }
    println!("{products}");
}

pub fn categories(report: &CategoryReport) {
    heading("Category Performance Analysis");

    println!("Total Sales and Average Revenue per Item by Category");
    let max = report
        .categories
        .iter()
        .filter_map(|c| c.total_sales.to_f64())
        .fold(0.0, f64::max);
    let mut totals = table(&["Category", "Total Sales", "Total Quantity", "Avg Revenue / Item", ""]);
    for row in &report.categories {
        let value = row.total_sales.to_f64().unwrap_or_default();
        totals.add_row(vec![
            Cell::new(row.category),
            right(money(row.total_sales)),
            right(row.total_quantity),
            right(row.average_price.map_or_else(|| "n/a".to_string(), |p| format!("{} SAR/item", money(p)))),
            Cell::new(bar(value, max)),
        ]);
    }
    println!("{totals}");

    println!("\nMonthly Sales Trend by Category");
    let mut monthly = table(&["Month", "Category", "Total Sales"]);
    for row in &report.monthly {
        monthly.add_row(vec![
            Cell::new(row.month.format("%Y-%m")),
            Cell::new(row.category),
            right(money(row.total_sales)),
        ]);
    }
    println!("{monthly}");
}

pub fn discounts(report: &DiscountReport) {
    heading("Discount Analysis");

    println!("Total Quantity Sold: Discounted vs Non-Discounted");
    let max = report.split.iter().map(|s| s.quantity).max().unwrap_or_default() as f64;
    let mut split = table(&["", "Quantity Sold", ""]);
    for row in &report.split {
        split.add_row(vec![
            Cell::new(row.label),
            right(row.quantity),
            Cell::new(bar(row.quantity as f64, max)),
        ]);
    }
    println!("{split}");

    println!("\nDistribution of Discount Percentages (Excl. 0%)");
    let max = report.histogram.iter().map(|b| b.count).max().unwrap_or_default() as f64;
    let mut histogram = table(&["Discount %", "Frequency", ""]);
    for bucket in &report.histogram {
        histogram.add_row(vec![
            Cell::new(format!("{:.2}–{:.2}%", bucket.lower * 100.0, bucket.upper * 100.0)),
            right(bucket.count),
            Cell::new(bar(bucket.count as f64, max)),
        ]);
    }
    println!("{histogram}");
    if report.undefined_ratio_rows > 0 {
        println!(
            "{} transaction(s) with a zero gross amount were excluded from discount percentages.",
            report.undefined_ratio_rows
        );
    }

    println!("\nQuantity Sold per Discount Bin");
    let max = report.per_bin.iter().map(|b| b.quantity).max().unwrap_or_default() as f64;
    let mut per_bin = table(&["Discount Bin", "Quantity Sold", ""]);
    for row in &report.per_bin {
        per_bin.add_row(vec![
            Cell::new(row.label),
            right(row.quantity),
            Cell::new(bar(row.quantity as f64, max)),
        ]);
    }
    println!("{per_bin}");
    if report.unbinned_rows > 0 {
        println!(
            "{} transaction(s) discounted above 50% fall outside every bin.",
            report.unbinned_rows
        );
    }

    println!("\nQuantity Sold per Discount Bin by Item Category");
    let mut grouped = table(&["Discount Bin", "Item Category", "Total Quantity"]);
    for row in &report.per_bin_category {
        grouped.add_row(vec![
            Cell::new(row.label),
            Cell::new(row.category),
            right(row.quantity),
        ]);
    }
    println!("{grouped}");
}

pub fn text(body: &str) {
    println!("\n{body}\n");
}
