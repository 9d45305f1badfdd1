//! Hebrew calendar boundary.
//!
//! The scheduler never does calendar arithmetic itself. It talks to a
//! [`HebrewDateConverter`], which the default build backs with the Hebrew
//! calendar from `icu_calendar`, and reads "today" from a [`Clock`] so tests
//! can pin the date.

pub mod clock;
pub mod icu;
pub mod month;

pub use clock::{Clock, FixedClock, SystemClock};
pub use icu::IcuHebrewCalendar;
pub use month::{HebrewDate, HebrewMonth};

use chrono::NaiveDate;

use crate::error::ConversionError;

/// Bidirectional conversion between Gregorian and Hebrew calendar dates.
///
/// Implementations work on calendar dates only; there is no time-of-day or
/// time zone involved. Month naming follows [`HebrewMonth`]: leap years have
/// `AdarI` and `AdarII`, common years have a single `Adar`.
pub trait HebrewDateConverter: Send + Sync {
    /// Hebrew date of a Gregorian calendar day.
    fn gregorian_to_hebrew(&self, date: NaiveDate) -> Result<HebrewDate, ConversionError>;

    /// Gregorian day of a Hebrew date.
    ///
    /// # Errors
    /// `InvalidHebrewDate` if the day is out of range for the month in that
    /// year, or the month does not occur in that year.
    fn hebrew_to_gregorian(&self, date: HebrewDate) -> Result<NaiveDate, ConversionError>;

    /// Whether the Hebrew year has thirteen months.
    fn is_leap_year(&self, year: i32) -> Result<bool, ConversionError>;

    /// Length of `month` in `year` (29 or 30).
    fn days_in_month(&self, year: i32, month: HebrewMonth) -> Result<u8, ConversionError>;

    /// Hebrew date of the clock's current day.
    fn current_hebrew_date(&self, clock: &dyn Clock) -> Result<HebrewDate, ConversionError> {
        self.gregorian_to_hebrew(clock.today())
    }
}

impl<T: HebrewDateConverter + ?Sized> HebrewDateConverter for &T {
    fn gregorian_to_hebrew(&self, date: NaiveDate) -> Result<HebrewDate, ConversionError> {
        (**self).gregorian_to_hebrew(date)
    }

    fn hebrew_to_gregorian(&self, date: HebrewDate) -> Result<NaiveDate, ConversionError> {
        (**self).hebrew_to_gregorian(date)
    }

    fn is_leap_year(&self, year: i32) -> Result<bool, ConversionError> {
        (**self).is_leap_year(year)
    }

    fn days_in_month(&self, year: i32, month: HebrewMonth) -> Result<u8, ConversionError> {
        (**self).days_in_month(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_hebrew_date_reads_the_clock() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 4, 9).unwrap());
        let today = IcuHebrewCalendar::new().current_hebrew_date(&clock).unwrap();
        assert_eq!(today, HebrewDate::new(5784, HebrewMonth::Nisan, 1));
    }

    #[test]
    fn references_forward_to_the_converter() {
        let cal = IcuHebrewCalendar::new();
        let by_ref: &dyn HebrewDateConverter = &cal;
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(
            (&by_ref).current_hebrew_date(&clock).unwrap(),
            HebrewDate::new(5785, HebrewMonth::Adar, 14)
        );
    }
}
