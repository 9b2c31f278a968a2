use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

// ============================================================================
// Country
// ============================================================================

/// Bidding zone / country label as it appears in the price file, normalised
/// to lower-case snake-case (`"Czech Republic"` becomes `czech_republic`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Country(String);

impl Country {
    pub fn new(raw: &str) -> Self {
        let normalised = raw
            .trim()
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .map(|part| part.to_lowercase())
            .collect::<Vec<_>>()
            .join("_");
        Self(normalised)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Country {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// ============================================================================
// Price kinds
// ============================================================================

/// Which market a price column belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PriceKind {
    /// Hourly day-ahead auction price
    DayAhead,
    /// aFRR balancing price, long direction
    Long,
    /// aFRR balancing price, short direction
    Short,
}

/// Balancing direction used to pick the modelled series.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Direction {
    Long,
    Short,
}

impl From<Direction> for PriceKind {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Long => PriceKind::Long,
            Direction::Short => PriceKind::Short,
        }
    }
}

// ============================================================================
// Series keys
// ============================================================================

/// Identifies one raw price column of the observation table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub kind: PriceKind,
    pub country: Country,
}

impl SeriesKey {
    pub fn new(kind: PriceKind, country: impl Into<Country>) -> Self {
        Self {
            kind,
            country: country.into(),
        }
    }

    pub fn day_ahead(country: impl Into<Country>) -> Self {
        Self::new(PriceKind::DayAhead, country)
    }

    pub fn balancing(direction: Direction, country: impl Into<Country>) -> Self {
        Self::new(direction.into(), country)
    }

    /// Classify a raw CSV header.
    ///
    /// Recognises `<Country>_Day Ahead`, `long_<Country>` and `short_<Country>`
    /// (case-insensitive). Returns `None` for anything else.
    pub fn from_header(header: &str) -> Option<Self> {
        let trimmed = header.trim();
        let lower = trimmed.to_lowercase();

        for (prefix, kind) in [("long_", PriceKind::Long), ("short_", PriceKind::Short)] {
            if let Some(rest) = lower.strip_prefix(prefix) {
                let country = Country::new(&trimmed[prefix.len()..]);
                return (!rest.trim().is_empty()).then(|| Self::new(kind, country));
            }
        }

        let compact = lower.replace(['-', ' '], "_");
        let country = compact.strip_suffix("_day_ahead")?;
        let country = Country::new(country);
        (!country.is_empty()).then(|| Self::new(PriceKind::DayAhead, country))
    }

    /// Machine-friendly column name.
    pub fn column_name(&self) -> String {
        match self.kind {
            PriceKind::DayAhead => format!("{}_day_ahead", self.country),
            PriceKind::Long | PriceKind::Short => format!("{}_{}", self.kind, self.country),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column_name())
    }
}
