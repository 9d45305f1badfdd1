//! Stored yahrzeit entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::icu::MAX_HEBREW_YEAR;
use crate::calendar::{HebrewDate, HebrewMonth};
use crate::error::ConversionError;

/// A remembered person and the Hebrew date of their death.
///
/// The Hebrew fields are derived once from `death_date` and persisted as
/// plain numbers; they are only re-derived when `death_date` changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct YahrzeitEntry {
    pub id: i64,
    pub name: String,
    pub hebrew_name: Option<String>,
    pub death_date: NaiveDate,
    pub hebrew_day: u8,
    /// Storage number of the month (see [`HebrewMonth::number`]).
    pub hebrew_month: u8,
    pub hebrew_year: i32,
    pub notify_days_before: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl YahrzeitEntry {
    /// Parsed Hebrew date of death.
    ///
    /// # Errors
    /// `UnknownMonth` or `InvalidHebrewDate` when the stored numbers are
    /// corrupt.
    pub fn hebrew_death_date(&self) -> Result<HebrewDate, ConversionError> {
        let month = HebrewMonth::from_number(self.hebrew_month)?;
        if !(1..=30).contains(&self.hebrew_day) {
            return Err(ConversionError::InvalidHebrewDate {
                year: self.hebrew_year,
                month: month.name().to_string(),
                day: self.hebrew_day,
                reason: "stored day is outside 1..=30".to_string(),
            });
        }
        if !(1..=MAX_HEBREW_YEAR).contains(&self.hebrew_year) {
            return Err(ConversionError::InvalidHebrewDate {
                year: self.hebrew_year,
                month: month.name().to_string(),
                day: self.hebrew_day,
                reason: format!("stored year is outside 1..={MAX_HEBREW_YEAR}"),
            });
        }
        Ok(HebrewDate::new(self.hebrew_year, month, self.hebrew_day))
    }

    pub(crate) fn set_hebrew_death_date(&mut self, date: HebrewDate) {
        self.hebrew_day = date.day;
        self.hebrew_month = date.month.number();
        self.hebrew_year = date.year;
    }
}

/// Input for creating an entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewEntry {
    pub name: String,
    #[serde(default)]
    pub hebrew_name: Option<String>,
    pub death_date: NaiveDate,
    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub notify_days_before: Option<u32>,
}

impl NewEntry {
    pub fn new(name: impl Into<String>, death_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            hebrew_name: None,
            death_date,
            notify_days_before: None,
        }
    }

    pub fn with_hebrew_name(mut self, hebrew_name: impl Into<String>) -> Self {
        self.hebrew_name = Some(hebrew_name.into());
        self
    }

    pub fn with_notify_days_before(mut self, days: u32) -> Self {
        self.notify_days_before = Some(days);
        self
    }
}

/// Partial update of an entry. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the Hebrew name.
    pub hebrew_name: Option<Option<String>>,
    pub death_date: Option<NaiveDate>,
    pub notify_days_before: Option<u32>,
}

impl EntryUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.hebrew_name.is_none()
            && self.death_date.is_none()
            && self.notify_days_before.is_none()
    }
}
