use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed menu categories sold by the cafe.
///
/// This is the single source of truth for category ordering and chart colours.
/// Every aggregator iterates `ItemCategory::ALL` rather than the order in which
/// categories happen to appear in the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Coffee,
    Pastries,
    Tea,
    Sandwiches,
}

impl ItemCategory {
    /// All categories in display order.
    pub const ALL: [ItemCategory; 4] = [
        ItemCategory::Coffee,
        ItemCategory::Pastries,
        ItemCategory::Tea,
        ItemCategory::Sandwiches,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Coffee => "Coffee",
            ItemCategory::Pastries => "Pastries",
            ItemCategory::Tea => "Tea",
            ItemCategory::Sandwiches => "Sandwiches",
        }
    }

    /// Hex colour used when the presentation layer charts this category.
    pub fn color(&self) -> &'static str {
        match self {
            ItemCategory::Coffee => "#6f4e37",
            ItemCategory::Pastries => "#f5c16c",
            ItemCategory::Tea => "#8cbf26",
            ItemCategory::Sandwiches => "#d1bfa7",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ItemCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::InvalidInput("item category".to_string(), s.to_string()))
    }
}

/// Ordered discount-percentage bins.
///
/// Boundaries are `[0, 0.025, 0.05, 0.10, 0.20, 0.50]`. Each bin is `[lower, upper)`
/// with two exceptions: `VeryLow` excludes zero and `VeryHigh` includes 0.50.
/// A ratio sitting exactly on an inner boundary therefore lands in the higher bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiscountBin {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl DiscountBin {
    pub const ALL: [DiscountBin; 5] = [
        DiscountBin::VeryLow,
        DiscountBin::Low,
        DiscountBin::Moderate,
        DiscountBin::High,
        DiscountBin::VeryHigh,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DiscountBin::VeryLow => "Very Low (0–2.5%)",
            DiscountBin::Low => "Low (2.5–5%)",
            DiscountBin::Moderate => "Moderate (5–10%)",
            DiscountBin::High => "High (10–20%)",
            DiscountBin::VeryHigh => "Very High (>20%)",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            DiscountBin::VeryLow => "#a6cee3",
            DiscountBin::Low => "#1f78b4",
            DiscountBin::Moderate => "#33a02c",
            DiscountBin::High => "#fb9a99",
            DiscountBin::VeryHigh => "#e31a1c",
        }
    }

    /// The `(lower, upper)` boundaries of this bin as discount ratios.
    pub fn bounds(&self) -> (Decimal, Decimal) {
        match self {
            DiscountBin::VeryLow => (dec!(0), dec!(0.025)),
            DiscountBin::Low => (dec!(0.025), dec!(0.05)),
            DiscountBin::Moderate => (dec!(0.05), dec!(0.10)),
            DiscountBin::High => (dec!(0.10), dec!(0.20)),
            DiscountBin::VeryHigh => (dec!(0.20), dec!(0.50)),
        }
    }

    /// Assigns a discount ratio to its bin. Returns `None` for ratios at or below
    /// zero and above 0.50.
    pub fn classify(ratio: Decimal) -> Option<DiscountBin> {
        if ratio <= Decimal::ZERO || ratio > dec!(0.50) {
            return None;
        }
        DiscountBin::ALL
            .into_iter()
            .rev()
            .find(|bin| ratio >= bin.bounds().0)
    }
}

impl fmt::Display for DiscountBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
