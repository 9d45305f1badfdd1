//! [`HebrewDateConverter`] backed by the `icu_calendar` Hebrew calendar.

use chrono::{Datelike, NaiveDate};
use icu_calendar::hebrew::Hebrew;
use icu_calendar::{Date, Iso};

use super::{HebrewDate, HebrewDateConverter, HebrewMonth};
use crate::error::ConversionError;

/// Hebrew years accepted by the converter.
pub const MIN_HEBREW_YEAR: i32 = 3761;
pub const MAX_HEBREW_YEAR: i32 = 9999;

/// Gregorian years accepted by the converter (years 1..=6000 CE).
pub const MIN_GREGORIAN_YEAR: i32 = 1;
pub const MAX_GREGORIAN_YEAR: i32 = 6000;

/// The arithmetic (calculated) civil Hebrew calendar from ICU4X.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcuHebrewCalendar;

impl IcuHebrewCalendar {
    pub fn new() -> Self {
        Self
    }

    fn check_year(year: i32) -> Result<(), ConversionError> {
        if (MIN_HEBREW_YEAR..=MAX_HEBREW_YEAR).contains(&year) {
            Ok(())
        } else {
            Err(ConversionError::ConverterUnavailable(format!(
                "Hebrew year {year} outside supported range {MIN_HEBREW_YEAR}..={MAX_HEBREW_YEAR}"
            )))
        }
    }

    fn first_of_year(year: i32) -> Result<Date<Hebrew>, ConversionError> {
        Self::check_year(year)?;
        Date::try_new_hebrew_date(year, 1, 1)
            .map_err(|err| ConversionError::ConverterUnavailable(err.to_string()))
    }

    fn invalid(date: HebrewDate, reason: impl Into<String>) -> ConversionError {
        ConversionError::InvalidHebrewDate {
            year: date.year,
            month: date.month.name().to_string(),
            day: date.day,
            reason: reason.into(),
        }
    }
}

impl HebrewDateConverter for IcuHebrewCalendar {
    fn gregorian_to_hebrew(&self, date: NaiveDate) -> Result<HebrewDate, ConversionError> {
        if !(MIN_GREGORIAN_YEAR..=MAX_GREGORIAN_YEAR).contains(&date.year()) {
            return Err(ConversionError::ConverterUnavailable(format!(
                "Gregorian year {} outside supported range {MIN_GREGORIAN_YEAR}..={MAX_GREGORIAN_YEAR}",
                date.year()
            )));
        }

        // chrono months and days always fit in a u8.
        let iso = Date::try_new_iso_date(date.year(), date.month() as u8, date.day() as u8)
            .map_err(|err| ConversionError::ConverterUnavailable(err.to_string()))?;
        let hebrew = iso.to_calendar(Hebrew);

        let leap = hebrew.is_in_leap_year();
        let ordinal = hebrew.month().ordinal;
        let month = u8::try_from(ordinal)
            .ok()
            .and_then(|ordinal| HebrewMonth::from_ordinal(ordinal, leap))
            .ok_or_else(|| {
                ConversionError::ConverterUnavailable(format!(
                    "calendar returned month ordinal {ordinal} for {date}"
                ))
            })?;
        let day = u8::try_from(hebrew.day_of_month().0).map_err(|_| {
            ConversionError::ConverterUnavailable(format!("calendar returned bad day for {date}"))
        })?;

        Ok(HebrewDate::new(hebrew.year().number, month, day))
    }

    fn hebrew_to_gregorian(&self, date: HebrewDate) -> Result<NaiveDate, ConversionError> {
        let leap = self.is_leap_year(date.year)?;
        let ordinal = date.month.ordinal_in(leap).ok_or_else(|| {
            let kind = if leap { "leap" } else { "common" };
            Self::invalid(date, format!("{} does not occur in a {kind} year", date.month))
        })?;
        if date.day == 0 {
            return Err(Self::invalid(date, "day must be at least 1"));
        }

        let hebrew = Date::try_new_hebrew_date(date.year, ordinal, date.day)
            .map_err(|err| Self::invalid(date, err.to_string()))?;
        let iso: Date<Iso> = hebrew.to_iso();

        NaiveDate::from_ymd_opt(
            iso.year().number,
            iso.month().ordinal,
            iso.day_of_month().0,
        )
        .ok_or_else(|| {
            ConversionError::ConverterUnavailable(format!(
                "{date} has no representable Gregorian date"
            ))
        })
    }

    fn is_leap_year(&self, year: i32) -> Result<bool, ConversionError> {
        Ok(Self::first_of_year(year)?.is_in_leap_year())
    }

    fn days_in_month(&self, year: i32, month: HebrewMonth) -> Result<u8, ConversionError> {
        let leap = self.is_leap_year(year)?;
        let ordinal = month.ordinal_in(leap).ok_or_else(|| {
            Self::invalid(
                HebrewDate::new(year, month, 1),
                format!("{month} does not occur in this year"),
            )
        })?;
        let first = Date::try_new_hebrew_date(year, ordinal, 1)
            .map_err(|err| ConversionError::ConverterUnavailable(err.to_string()))?;
        Ok(first.days_in_month())
    }
}
