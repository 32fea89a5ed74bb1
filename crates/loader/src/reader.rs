use crate::dates::parse_date;
use crate::error::LoaderError;
use core_types::{Dataset, Event, ItemCategory, Transaction};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const TRANSACTIONS_FILE: &str = "transactions";
const EVENTS_FILE: &str = "events";

/// Columns the transaction ledger must provide. Any other columns are ignored.
pub const TRANSACTION_COLUMNS: [&str; 8] = [
    "Date",
    "Item Category",
    "Product Description",
    "Sale Amount",
    "Quantity Sold",
    "Discount Applied",
    "Discount Amount",
    "Temperature (°F)",
];

/// Columns the events calendar must provide.
pub const EVENT_COLUMNS: [&str; 2] = ["Date", "Event Description"];

// Rows are decoded as text first so that every rejected cell can be reported
// with its column and line rather than as an opaque serde error.
#[derive(Debug, Deserialize)]
struct TransactionRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Item Category")]
    category: String,
    #[serde(rename = "Product Description")]
    product: String,
    #[serde(rename = "Sale Amount")]
    sale_amount: String,
    #[serde(rename = "Quantity Sold")]
    quantity: String,
    #[serde(rename = "Discount Applied")]
    discount_applied: String,
    #[serde(rename = "Discount Amount")]
    discount_amount: String,
    #[serde(rename = "Temperature (°F)")]
    temperature: String,
}

#[derive(Debug, Deserialize)]
struct EventRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Event Description")]
    description: String,
}

impl TransactionRow {
    fn into_transaction(self) -> Result<Transaction, String> {
        let date =
            parse_date(&self.date).ok_or_else(|| format!("unrecognized date '{}'", self.date))?;
        let category = ItemCategory::from_str(&self.category).map_err(|e| e.to_string())?;
        let sale_amount = parse_amount("Sale Amount", &self.sale_amount)?;
        let discount_amount = parse_amount("Discount Amount", &self.discount_amount)?;
        let quantity = parse_quantity(&self.quantity)?;
        let discount_applied = parse_flag(&self.discount_applied)?;
        let temperature_f = self
            .temperature
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite())
            .ok_or_else(|| format!("invalid temperature '{}'", self.temperature))?;

        Ok(Transaction {
            date,
            category,
            product: self.product,
            sale_amount,
            quantity,
            discount_applied,
            discount_amount,
            temperature_f,
        })
    }
}

/// Reads both input files and assembles the immutable dataset.
pub fn load_dataset(transactions_path: &Path, events_path: &Path) -> Result<Dataset, LoaderError> {
    let transactions = read_transactions(open(transactions_path)?)?;
    let events = read_events(open(events_path)?)?;

    tracing::info!(
        transactions = transactions.len(),
        events = events.len(),
        "Dataset loaded"
    );
    Ok(Dataset::new(transactions, events))
}

/// Decodes and validates the transaction ledger.
pub fn read_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>, LoaderError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    require_columns(&headers, &TRANSACTION_COLUMNS, TRANSACTIONS_FILE)?;

    let mut transactions = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = line_of(&record);
        let row: TransactionRow = record.deserialize(Some(&headers))?;
        let transaction = row
            .into_transaction()
            .map_err(|reason| LoaderError::DataIntegrity {
                file: TRANSACTIONS_FILE,
                line,
                reason,
            })?;
        transactions.push(transaction);
    }

    tracing::debug!(rows = transactions.len(), "Transactions decoded");
    Ok(transactions)
}

/// Decodes the events calendar.
///
/// Rows without a description are skipped, and when a date appears more than
/// once only its first description is kept.
pub fn read_events<R: Read>(reader: R) -> Result<Vec<Event>, LoaderError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    require_columns(&headers, &EVENT_COLUMNS, EVENTS_FILE)?;

    let mut seen = HashSet::new();
    let mut events = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = line_of(&record);
        let row: EventRow = record.deserialize(Some(&headers))?;

        let date = parse_date(&row.date).ok_or_else(|| LoaderError::DataIntegrity {
            file: EVENTS_FILE,
            line,
            reason: format!("unrecognized date '{}'", row.date),
        })?;
        if row.description.is_empty() {
            tracing::warn!(line, %date, "Skipping event row without a description");
            continue;
        }
        if !seen.insert(date) {
            tracing::warn!(line, %date, description = %row.description, "Duplicate event date, keeping the first entry");
            continue;
        }
        events.push(Event {
            date,
            description: row.description,
        });
    }

    Ok(events)
}

fn open(path: &Path) -> Result<File, LoaderError> {
    File::open(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn require_columns(
    headers: &StringRecord,
    required: &[&'static str],
    file: &'static str,
) -> Result<(), LoaderError> {
    match required
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        Some(column) => Err(LoaderError::MissingColumn { file, column }),
        None => Ok(()),
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or_default()
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn parse_amount(column: &str, raw: &str) -> Result<Decimal, String> {
    let amount = parse_decimal(raw).ok_or_else(|| format!("invalid {column} '{raw}'"))?;
    if amount < Decimal::ZERO {
        return Err(format!("{column} is negative ({amount})"));
    }
    Ok(amount)
}

fn parse_quantity(raw: &str) -> Result<u32, String> {
    let value = parse_decimal(raw).ok_or_else(|| format!("invalid Quantity Sold '{raw}'"))?;
    if value < Decimal::ZERO {
        return Err(format!("Quantity Sold is negative ({value})"));
    }
    if !value.fract().is_zero() {
        return Err(format!("Quantity Sold is not a whole number ({value})"));
    }
    value
        .to_u32()
        .ok_or_else(|| format!("Quantity Sold is out of range ({value})"))
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Ok(true),
        "no" | "n" | "false" | "0" => Ok(false),
        _ => Err(format!("invalid Discount Applied flag '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const HEADER: &str = "Date,Item Category,Product Description,Sale Amount,Quantity Sold,Discount Applied,Discount Amount,Temperature (°F)";

    fn ledger(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn test_read_transactions() {
        let csv = ledger(&[
            "2024-01-01,Coffee,Latte,100,4,No,0,71.5",
            "2024-01-02,Tea,Green Tea,90.00,2,Yes,10.00,65",
        ]);
        let transactions = read_transactions(csv.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 2);

        let second = &transactions[1];
        assert_eq!(second.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(second.category, ItemCategory::Tea);
        assert_eq!(second.product, "Green Tea");
        assert_eq!(second.sale_amount, dec!(90));
        assert_eq!(second.quantity, 2);
        assert!(second.discount_applied);
        assert_eq!(second.discount_amount, dec!(10));
        assert_eq!(second.temperature_f, 65.0);
    }

    #[test]
    fn test_extra_columns_and_column_order_are_ignored() {
        let csv = "Temperature (°F),Store,Date,Item Category,Product Description,Sale Amount,Quantity Sold,Discount Applied,Discount Amount\n\
                   70,Main,2024-03-01,Pastries,Croissant,12.5,1,No,0";
        let transactions = read_transactions(csv.as_bytes()).unwrap();
        assert_eq!(transactions[0].category, ItemCategory::Pastries);
        assert_eq!(transactions[0].sale_amount, dec!(12.5));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv = "Date,Item Category,Product Description,Sale Amount,Quantity Sold,Discount Applied,Discount Amount\n";
        let err = read_transactions(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::MissingColumn {
                file: "transactions",
                column: "Temperature (°F)"
            }
        ));
    }

    #[test]
    fn test_negative_sale_amount_is_fatal() {
        let csv = ledger(&[
            "2024-01-01,Coffee,Latte,10,1,No,0,70",
            "2024-01-01,Coffee,Latte,-5,1,No,0,70",
        ]);
        match read_transactions(csv.as_bytes()).unwrap_err() {
            LoaderError::DataIntegrity { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("Sale Amount"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_or_fractional_quantity_is_fatal() {
        for row in [
            "2024-01-01,Coffee,Latte,10,-1,No,0,70",
            "2024-01-01,Coffee,Latte,10,1.5,No,0,70",
        ] {
            let csv = ledger(&[row]);
            assert!(matches!(
                read_transactions(csv.as_bytes()),
                Err(LoaderError::DataIntegrity { .. })
            ));
        }
    }

    #[test]
    fn test_float_formatted_quantity_is_accepted() {
        let csv = ledger(&["2024-01-01,Coffee,Latte,10,3.0,No,0,70"]);
        assert_eq!(read_transactions(csv.as_bytes()).unwrap()[0].quantity, 3);
    }

    #[test]
    fn test_unknown_category_and_flag_are_fatal() {
        for row in [
            "2024-01-01,Smoothies,Mango,10,1,No,0,70",
            "2024-01-01,Coffee,Latte,10,1,Maybe,0,70",
        ] {
            let csv = ledger(&[row]);
            assert!(matches!(
                read_transactions(csv.as_bytes()),
                Err(LoaderError::DataIntegrity { .. })
            ));
        }
    }

    #[test]
    fn test_read_events_skips_blank_and_duplicate_dates() {
        let csv = "Date,Event Description\n\
                   2024-01-02,Long Weekend\n\
                   2024-01-03,\n\
                   2024-01-02,Second Listing\n\
                   2024-09-23,Independence Day";
        let events = read_events(csv.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].description, "Long Weekend");
        assert_eq!(events[1].description, "Independence Day");
    }

    #[test]
    fn test_read_events_requires_description_column() {
        let csv = "Date,Name\n2024-01-02,Long Weekend";
        assert!(matches!(
            read_events(csv.as_bytes()),
            Err(LoaderError::MissingColumn {
                column: "Event Description",
                ..
            })
        ));
    }

    #[test]
    fn test_load_dataset_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let sales_path = dir.path().join("sales.csv");
        let events_path = dir.path().join("events.csv");
        std::fs::File::create(&sales_path)
            .unwrap()
            .write_all(ledger(&["2024-01-01,Coffee,Latte,100,4,No,0,71.5"]).as_bytes())
            .unwrap();
        std::fs::File::create(&events_path)
            .unwrap()
            .write_all(b"Date,Event Description\n2024-01-01,Long Weekend\n")
            .unwrap();

        let dataset = load_dataset(&sales_path, &events_path).unwrap();
        assert_eq!(dataset.transactions().len(), 1);
        assert_eq!(dataset.events().len(), 1);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(&dir.path().join("nope.csv"), &dir.path().join("nope2.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}
