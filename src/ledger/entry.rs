use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ForecastError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Direction of a ledger entry. The stored amount is always a magnitude.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    /// Applies the direction to a magnitude: income adds, expense subtracts.
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            EntryKind::Income => amount,
            EntryKind::Expense => -amount,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

impl FromStr for EntryKind {
    type Err = ForecastError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            other => Err(ForecastError::InvalidKind(other.to_string())),
        }
    }
}

/// One dated income or expense event owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub amount: Decimal,
    pub occurred_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl LedgerEntry {
    /// Creates an entry, rejecting negative magnitudes.
    pub fn new(kind: EntryKind, amount: Decimal, occurred_on: NaiveDate) -> Result<Self> {
        let entry = Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            occurred_on,
            category: None,
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn income(amount: Decimal, occurred_on: NaiveDate) -> Result<Self> {
        Self::new(EntryKind::Income, amount, occurred_on)
    }

    pub fn expense(amount: Decimal, occurred_on: NaiveDate) -> Result<Self> {
        Self::new(EntryKind::Expense, amount, occurred_on)
    }

    /// Builds an entry from loosely typed request fields.
    pub fn parse(kind: &str, amount: Decimal, occurred_on: &str) -> Result<Self> {
        let kind = kind.parse()?;
        let date = parse_date(occurred_on)?;
        Self::new(kind, amount, date)
    }

    /// Tags the entry with a category. Blank names clear it.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        let trimmed = category.trim();
        self.category = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount < Decimal::ZERO {
            return Err(ForecastError::NegativeAmount(self.amount));
        }
        Ok(())
    }

    /// Amount with the direction applied.
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ForecastError::MalformedDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn expense_carries_negative_sign() {
        let entry = LedgerEntry::expense(dec!(42.50), date(2024, 5, 1)).unwrap();
        assert_eq!(entry.signed_amount(), dec!(-42.50));
        assert_eq!(entry.amount, dec!(42.50));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = LedgerEntry::income(dec!(-1), date(2024, 5, 1)).unwrap_err();
        assert_eq!(err, ForecastError::NegativeAmount(dec!(-1)));
    }

    #[test]
    fn zero_amount_is_accepted() {
        assert!(LedgerEntry::income(Decimal::ZERO, date(2024, 5, 1)).is_ok());
    }

    #[test]
    fn parse_accepts_mixed_case_kind() {
        let entry = LedgerEntry::parse(" Income ", dec!(10), "2024-02-29").unwrap();
        assert_eq!(entry.kind, EntryKind::Income);
        assert_eq!(entry.occurred_on, date(2024, 2, 29));
    }

    #[test]
    fn parse_rejects_unknown_kind_and_bad_date() {
        assert!(matches!(
            LedgerEntry::parse("transfer", dec!(10), "2024-01-01"),
            Err(ForecastError::InvalidKind(_))
        ));
        assert!(matches!(
            LedgerEntry::parse("expense", dec!(10), "2024-13-01"),
            Err(ForecastError::MalformedDate(_))
        ));
    }

    #[test]
    fn category_is_trimmed_and_optional_on_disk() {
        let entry = LedgerEntry::income(dec!(10), date(2024, 5, 1))
            .unwrap()
            .with_category("  salary ");
        assert_eq!(entry.category.as_deref(), Some("salary"));
        assert_eq!(entry.clone().with_category("   ").category, None);

        let json = r#"{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","kind":"expense","amount":"5","occurred_on":"2024-05-01"}"#;
        let legacy: LedgerEntry = serde_json::from_str(json).unwrap();
        assert_eq!(legacy.category, None);
        assert!(!serde_json::to_string(&legacy).unwrap().contains("category"));
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&EntryKind::Expense).unwrap();
        assert_eq!(json, "\"expense\"");
    }
}
