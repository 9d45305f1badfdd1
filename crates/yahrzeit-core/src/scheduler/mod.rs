//! Yahrzeit scheduler.
//!
//! Projects stored entries onto the Gregorian calendar:
//! - Finds the next Gregorian day on which each entry's Hebrew day/month recurs
//! - Maps Adar anniversaries between leap and common years via [`AdarPolicy`]
//! - Moves the 30th of a month to its last day in years where it is short
//! - Flags occurrences inside the entry's notification window
//!
//! A bad entry never fails the batch. It is reported in
//! [`UpcomingReport::failures`] while the remaining entries are still listed.

pub mod adar;

pub use adar::{AdarPolicy, LeapAdar};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::{Clock, HebrewDate, HebrewDateConverter};
use crate::entry::YahrzeitEntry;
use crate::error::ConversionError;

/// The next observance of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingOccurrence {
    pub entry_id: i64,
    pub name: String,
    pub next_gregorian_date: NaiveDate,
    pub next_hebrew_date: HebrewDate,
    pub next_hebrew_date_label: String,
    pub days_until: i64,
    pub is_soon: bool,
    /// Hebrew years between the death and this occurrence.
    pub years_since_death: i32,
    /// The observance was moved to the last day of a short month.
    pub day_clamped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidHebrewDate,
    ConverterUnavailable,
}

/// An entry that could not be projected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFailure {
    pub entry_id: i64,
    pub kind: FailureKind,
    pub message: String,
}

impl EntryFailure {
    /// A stored entry that could not even be loaded.
    pub fn unreadable(entry_id: i64, message: impl Into<String>) -> Self {
        Self {
            entry_id,
            kind: FailureKind::InvalidHebrewDate,
            message: message.into(),
        }
    }

    fn new(entry_id: i64, err: &ConversionError) -> Self {
        let kind = if err.is_invalid_date() {
            FailureKind::InvalidHebrewDate
        } else {
            FailureKind::ConverterUnavailable
        };
        Self {
            entry_id,
            kind,
            message: err.to_string(),
        }
    }
}

/// Result of projecting a batch of entries from one "today".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingReport {
    pub today: NaiveDate,
    pub hebrew_today: HebrewDate,
    /// Sorted by `days_until`, then entry id.
    pub occurrences: Vec<UpcomingOccurrence>,
    /// Sorted by entry id.
    pub failures: Vec<EntryFailure>,
}

impl UpcomingReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Occurrences flagged as inside their notification window.
    pub fn soon(&self) -> impl Iterator<Item = &UpcomingOccurrence> {
        self.occurrences.iter().filter(|occurrence| occurrence.is_soon)
    }

    /// Drop occurrences more than `days` away. Failures are kept.
    pub fn retain_within(&mut self, days: i64) {
        self.occurrences
            .retain(|occurrence| occurrence.days_until <= days);
    }
}

/// An occurrence resolved in a particular Hebrew year.
#[derive(Debug, Clone, Copy)]
struct Resolved {
    gregorian: NaiveDate,
    hebrew: HebrewDate,
    clamped: bool,
}

/// Computes upcoming yahrzeits on top of a [`HebrewDateConverter`].
#[derive(Debug, Clone)]
pub struct YahrzeitScheduler<C> {
    converter: C,
    policy: AdarPolicy,
}

impl<C: HebrewDateConverter> YahrzeitScheduler<C> {
    /// Create a scheduler with the default Adar policy
    pub fn new(converter: C) -> Self {
        Self::with_policy(converter, AdarPolicy::default())
    }

    pub fn with_policy(converter: C, policy: AdarPolicy) -> Self {
        Self { converter, policy }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn policy(&self) -> AdarPolicy {
        self.policy
    }

    /// Project every entry from the clock's current day.
    ///
    /// The clock is read once, so the whole batch shares one "today".
    pub fn upcoming_with_clock(
        &self,
        entries: &[YahrzeitEntry],
        clock: &dyn Clock,
    ) -> Result<UpcomingReport, ConversionError> {
        self.upcoming(entries, clock.today())
    }

    /// Project every entry from `today`.
    ///
    /// # Errors
    /// Only systemic failures: the current Hebrew date cannot be computed, or
    /// every entry failed with the same `ConverterUnavailable` error. Anything
    /// else is reported per entry in [`UpcomingReport::failures`].
    pub fn upcoming(
        &self,
        entries: &[YahrzeitEntry],
        today: NaiveDate,
    ) -> Result<UpcomingReport, ConversionError> {
        self.upcoming_with_failures(entries, Vec::new(), today)
    }

    /// Like [`Self::upcoming`], for a batch in which some entries already
    /// failed before scheduling (e.g. rows the store could not decode).
    /// Those count as differing failures, so they rule out a systemic error.
    pub fn upcoming_with_failures(
        &self,
        entries: &[YahrzeitEntry],
        mut failures: Vec<EntryFailure>,
        today: NaiveDate,
    ) -> Result<UpcomingReport, ConversionError> {
        let hebrew_today = self.converter.gregorian_to_hebrew(today)?;

        let mut occurrences = Vec::with_capacity(entries.len());
        let prior_failures = failures.len();
        let mut errors = Vec::new();

        for entry in entries {
            match self.next_occurrence_in(entry, today, hebrew_today.year) {
                Ok(occurrence) => occurrences.push(occurrence),
                Err(err) => {
                    warn!(entry_id = entry.id, error = %err, "unable to schedule yahrzeit");
                    failures.push(EntryFailure::new(entry.id, &err));
                    errors.push(err);
                }
            }
        }

        if occurrences.is_empty() && prior_failures == 0 {
            if let Some(first) = errors.first() {
                let systemic = matches!(first, ConversionError::ConverterUnavailable(_))
                    && errors.iter().all(|err| err == first);
                if systemic {
                    return Err(first.clone());
                }
            }
        }

        occurrences.sort_by(|a, b| {
            a.days_until
                .cmp(&b.days_until)
                .then_with(|| a.entry_id.cmp(&b.entry_id))
        });
        failures.sort_by_key(|failure| failure.entry_id);

        Ok(UpcomingReport {
            today,
            hebrew_today,
            occurrences,
            failures,
        })
    }

    /// Next occurrence of a single entry on or after `today`.
    pub fn next_occurrence(
        &self,
        entry: &YahrzeitEntry,
        today: NaiveDate,
    ) -> Result<UpcomingOccurrence, ConversionError> {
        let current_year = self.converter.gregorian_to_hebrew(today)?.year;
        self.next_occurrence_in(entry, today, current_year)
    }

    fn next_occurrence_in(
        &self,
        entry: &YahrzeitEntry,
        today: NaiveDate,
        current_year: i32,
    ) -> Result<UpcomingOccurrence, ConversionError> {
        let death = entry.hebrew_death_date()?;
        let mut last_err = None;

        for year in [current_year, current_year + 1] {
            match self.occurrence_in(death, year) {
                Ok(resolved) if resolved.gregorian >= today => {
                    let days_until = (resolved.gregorian - today).num_days();
                    let years_since_death =
                        resolved.hebrew.year.checked_sub(death.year).ok_or_else(|| {
                            ConversionError::InvalidHebrewDate {
                                year: death.year,
                                month: death.month.name().to_string(),
                                day: death.day,
                                reason: "year is out of range".to_string(),
                            }
                        })?;
                    return Ok(UpcomingOccurrence {
                        entry_id: entry.id,
                        name: entry.name.clone(),
                        next_gregorian_date: resolved.gregorian,
                        next_hebrew_date: resolved.hebrew,
                        next_hebrew_date_label: resolved.hebrew.to_string(),
                        days_until,
                        is_soon: days_until <= i64::from(entry.notify_days_before),
                        years_since_death,
                        day_clamped: resolved.clamped,
                    });
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(entry_id = entry.id, year, error = %err, "no occurrence in year");
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| ConversionError::InvalidHebrewDate {
            year: current_year + 1,
            month: death.month.name().to_string(),
            day: death.day,
            reason: format!("no occurrence on or after {today}"),
        }))
    }

    /// Where the anniversary of `death` falls in Hebrew `year`.
    fn occurrence_in(&self, death: HebrewDate, year: i32) -> Result<Resolved, ConversionError> {
        let leap = self.converter.is_leap_year(year)?;
        let month = self.policy.resolve(death.month, leap).ok_or_else(|| {
            ConversionError::InvalidHebrewDate {
                year,
                month: death.month.name().to_string(),
                day: death.day,
                reason: "month does not occur in this year and remapping is disabled".to_string(),
            }
        })?;
        if month != death.month {
            debug!(from = %death.month, to = %month, year, "remapped Adar anniversary");
        }

        let target = HebrewDate::new(year, month, death.day);
        match self.converter.hebrew_to_gregorian(target) {
            Ok(gregorian) => Ok(Resolved {
                gregorian,
                hebrew: target,
                clamped: false,
            }),
            Err(err) if err.is_invalid_date() => {
                let last_day = self.converter.days_in_month(year, month)?;
                if death.day <= last_day {
                    return Err(err);
                }
                let clamped = HebrewDate::new(year, month, last_day);
                debug!(requested = %target, observed = %clamped, "clamped to end of short month");
                let gregorian = self.converter.hebrew_to_gregorian(clamped)?;
                Ok(Resolved {
                    gregorian,
                    hebrew: clamped,
                    clamped: true,
                })
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{FixedClock, HebrewMonth, IcuHebrewCalendar};
    use chrono::Utc;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn entry(id: i64, year: i32, month: HebrewMonth, day: u8, notify: u32) -> YahrzeitEntry {
        let now = Utc::now();
        YahrzeitEntry {
            id,
            name: format!("entry-{id}"),
            hebrew_name: None,
            death_date: ymd(2000, 1, 1),
            hebrew_day: day,
            hebrew_month: month.number(),
            hebrew_year: year,
            notify_days_before: notify,
            created_at: now,
            updated_at: now,
        }
    }

    fn scheduler() -> YahrzeitScheduler<IcuHebrewCalendar> {
        YahrzeitScheduler::new(IcuHebrewCalendar::new())
    }

    #[test]
    fn day_before_anniversary_is_one_day_away() {
        let nisan = entry(1, 5780, HebrewMonth::Nisan, 1, 1);
        let occurrence = scheduler().next_occurrence(&nisan, ymd(2024, 4, 8)).unwrap();
        assert_eq!(occurrence.next_gregorian_date, ymd(2024, 4, 9));
        assert_eq!(occurrence.days_until, 1);
        assert!(occurrence.is_soon);
        assert_eq!(occurrence.next_hebrew_date_label, "1 Nisan 5784");
        assert_eq!(occurrence.years_since_death, 4);
    }

    #[test]
    fn anniversary_today_is_zero_days_away() {
        let nisan = entry(1, 5780, HebrewMonth::Nisan, 1, 0);
        let occurrence = scheduler().next_occurrence(&nisan, ymd(2024, 4, 9)).unwrap();
        assert_eq!(occurrence.days_until, 0);
        assert!(occurrence.is_soon);
    }

    #[test]
    fn passed_anniversary_rolls_to_next_year() {
        let nisan = entry(1, 5780, HebrewMonth::Nisan, 1, 7);
        let occurrence = scheduler().next_occurrence(&nisan, ymd(2024, 4, 10)).unwrap();
        assert_eq!(occurrence.next_gregorian_date, ymd(2025, 3, 30));
        assert_eq!(occurrence.next_hebrew_date, HebrewDate::new(5785, HebrewMonth::Nisan, 1));
        assert_eq!(occurrence.days_until, 354);
        assert!(!occurrence.is_soon);
    }

    #[test]
    fn notification_threshold_is_inclusive() {
        let nisan = entry(1, 5780, HebrewMonth::Nisan, 1, 7);
        let eight = scheduler().next_occurrence(&nisan, ymd(2024, 4, 1)).unwrap();
        assert_eq!(eight.days_until, 8);
        assert!(!eight.is_soon);

        let seven = scheduler().next_occurrence(&nisan, ymd(2024, 4, 2)).unwrap();
        assert_eq!(seven.days_until, 7);
        assert!(seven.is_soon);
    }

    #[test]
    fn adar_i_anniversary_falls_in_adar_of_common_year() {
        let adar_i = entry(1, 5784, HebrewMonth::AdarI, 15, 7);
        let occurrence = scheduler().next_occurrence(&adar_i, ymd(2025, 1, 1)).unwrap();
        assert_eq!(occurrence.next_hebrew_date, HebrewDate::new(5785, HebrewMonth::Adar, 15));
        assert_eq!(occurrence.next_gregorian_date, ymd(2025, 3, 15));
        assert_eq!(occurrence.days_until, 73);
    }

    #[test]
    fn common_adar_anniversary_follows_leap_year_policy() {
        let adar = entry(1, 5785, HebrewMonth::Adar, 10, 7);
        let today = ymd(2026, 12, 1);

        let first = scheduler().next_occurrence(&adar, today).unwrap();
        assert_eq!(first.next_hebrew_date, HebrewDate::new(5787, HebrewMonth::AdarI, 10));
        assert_eq!(first.next_gregorian_date, ymd(2027, 2, 17));

        let second = YahrzeitScheduler::with_policy(
            IcuHebrewCalendar::new(),
            AdarPolicy {
                leap_year_adar: LeapAdar::Second,
                ..AdarPolicy::default()
            },
        )
        .next_occurrence(&adar, today)
        .unwrap();
        assert_eq!(second.next_hebrew_date, HebrewDate::new(5787, HebrewMonth::AdarII, 10));
        assert_eq!(second.next_gregorian_date, ymd(2027, 3, 19));
        assert_eq!(second.days_until, 108);
    }

    #[test]
    fn thirtieth_clamps_to_last_day_of_short_month() {
        // 5785 has a 30-day Cheshvan, 5786 only 29.
        let cheshvan = entry(1, 5785, HebrewMonth::Cheshvan, 30, 0);
        let occurrence = scheduler().next_occurrence(&cheshvan, ymd(2025, 10, 1)).unwrap();
        assert_eq!(occurrence.next_hebrew_date, HebrewDate::new(5786, HebrewMonth::Cheshvan, 29));
        assert_eq!(occurrence.next_gregorian_date, ymd(2025, 11, 20));
        assert_eq!(occurrence.days_until, 50);
        assert!(occurrence.day_clamped);
        assert_eq!(occurrence.next_hebrew_date_label, "29 Cheshvan 5786");
    }

    #[test]
    fn strict_policy_skips_years_without_adar_i() {
        let strict = YahrzeitScheduler::with_policy(
            IcuHebrewCalendar::new(),
            AdarPolicy {
                remap_adar_i: false,
                ..AdarPolicy::default()
            },
        );
        let adar_i = entry(1, 5784, HebrewMonth::AdarI, 15, 7);

        // 5786 has no Adar I, 5787 does.
        let occurrence = strict.next_occurrence(&adar_i, ymd(2026, 1, 1)).unwrap();
        assert_eq!(occurrence.next_hebrew_date, HebrewDate::new(5787, HebrewMonth::AdarI, 15));
        assert_eq!(occurrence.next_gregorian_date, ymd(2027, 2, 22));
        assert_eq!(occurrence.days_until, 417);

        // Neither 5785 nor 5786 has one.
        let err = strict.next_occurrence(&adar_i, ymd(2025, 1, 1)).unwrap_err();
        assert!(err.is_invalid_date());
    }

    #[test]
    fn batch_is_sorted_by_days_then_id() {
        let today = ymd(2024, 4, 1);
        let entries = vec![
            entry(3, 5780, HebrewMonth::Nisan, 1, 7),
            entry(1, 5780, HebrewMonth::Nisan, 1, 7),
            entry(2, 5781, HebrewMonth::Tishrei, 10, 7),
            entry(4, 5770, HebrewMonth::AdarII, 29, 7),
        ];
        let report = scheduler().upcoming(&entries, today).unwrap();
        let ids: Vec<i64> = report.occurrences.iter().map(|o| o.entry_id).collect();
        assert_eq!(ids, vec![4, 1, 3, 2]);
        assert!(report.is_complete());
        assert_eq!(report.hebrew_today.year, 5784);
        assert!(report
            .occurrences
            .windows(2)
            .all(|pair| pair[0].days_until <= pair[1].days_until));
    }

    #[test]
    fn corrupt_entry_does_not_hide_the_others() {
        let mut corrupt = entry(3, 5780, HebrewMonth::Nisan, 1, 7);
        corrupt.hebrew_month = 99;
        let entries = vec![
            entry(1, 5780, HebrewMonth::Nisan, 1, 7),
            entry(2, 5780, HebrewMonth::Iyar, 5, 7),
            corrupt,
            entry(4, 5780, HebrewMonth::Sivan, 6, 7),
            entry(5, 5780, HebrewMonth::Av, 9, 7),
        ];
        let report = scheduler().upcoming(&entries, ymd(2024, 4, 1)).unwrap();
        assert_eq!(report.occurrences.len(), 4);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].entry_id, 3);
        assert_eq!(report.failures[0].kind, FailureKind::InvalidHebrewDate);
    }

    #[test]
    fn same_inputs_give_same_report() {
        let entries = vec![
            entry(1, 5780, HebrewMonth::Kislev, 25, 7),
            entry(2, 5760, HebrewMonth::Shevat, 15, 30),
        ];
        let clock = FixedClock::new(ymd(2024, 12, 1));
        let first = scheduler().upcoming_with_clock(&entries, &clock).unwrap();
        let second = scheduler().upcoming_with_clock(&entries, &clock).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn retain_within_filters_by_distance() {
        let entries = vec![
            entry(1, 5780, HebrewMonth::Nisan, 1, 7),
            entry(2, 5780, HebrewMonth::Tishrei, 1, 7),
        ];
        let mut report = scheduler().upcoming(&entries, ymd(2024, 4, 1)).unwrap();
        report.retain_within(30);
        assert_eq!(report.occurrences.len(), 1);
        assert_eq!(report.occurrences[0].entry_id, 1);
        assert_eq!(report.soon().count(), 0);
    }

    /// Converter whose Hebrew-to-Gregorian direction is down.
    struct Offline;

    impl HebrewDateConverter for Offline {
        fn gregorian_to_hebrew(&self, date: NaiveDate) -> Result<HebrewDate, ConversionError> {
            IcuHebrewCalendar::new().gregorian_to_hebrew(date)
        }

        fn hebrew_to_gregorian(&self, _date: HebrewDate) -> Result<NaiveDate, ConversionError> {
            Err(ConversionError::ConverterUnavailable("offline".into()))
        }

        fn is_leap_year(&self, year: i32) -> Result<bool, ConversionError> {
            IcuHebrewCalendar::new().is_leap_year(year)
        }

        fn days_in_month(&self, _year: i32, _month: HebrewMonth) -> Result<u8, ConversionError> {
            Err(ConversionError::ConverterUnavailable("offline".into()))
        }
    }

    #[test]
    fn systemic_converter_failure_fails_the_batch() {
        let entries = vec![
            entry(1, 5780, HebrewMonth::Nisan, 1, 7),
            entry(2, 5780, HebrewMonth::Iyar, 1, 7),
        ];
        let err = YahrzeitScheduler::new(Offline)
            .upcoming(&entries, ymd(2024, 4, 1))
            .unwrap_err();
        assert_eq!(err, ConversionError::ConverterUnavailable("offline".into()));
    }

    #[test]
    fn converter_failure_with_a_corrupt_entry_stays_per_entry() {
        let mut corrupt = entry(2, 5780, HebrewMonth::Nisan, 1, 7);
        corrupt.hebrew_month = 0;
        let entries = vec![entry(1, 5780, HebrewMonth::Nisan, 1, 7), corrupt];
        let report = YahrzeitScheduler::new(Offline)
            .upcoming(&entries, ymd(2024, 4, 1))
            .unwrap();
        assert!(report.occurrences.is_empty());
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].kind, FailureKind::ConverterUnavailable);
        assert_eq!(report.failures[1].kind, FailureKind::InvalidHebrewDate);
    }

    #[test]
    fn corrupt_year_is_reported_not_panicking() {
        let mut corrupt = entry(2, 5780, HebrewMonth::Nisan, 1, 7);
        corrupt.hebrew_year = i32::MIN;
        let entries = vec![entry(1, 5780, HebrewMonth::Nisan, 1, 7), corrupt];
        let report = scheduler().upcoming(&entries, ymd(2024, 4, 1)).unwrap();
        assert_eq!(report.occurrences.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].entry_id, 2);
        assert_eq!(report.failures[0].kind, FailureKind::InvalidHebrewDate);
    }

    #[test]
    fn earlier_failures_are_merged_in_id_order() {
        let entries = vec![entry(1, 5780, HebrewMonth::Nisan, 1, 7)];
        let report = scheduler()
            .upcoming_with_failures(
                &entries,
                vec![EntryFailure::unreadable(0, "bad row")],
                ymd(2024, 4, 1),
            )
            .unwrap();
        assert_eq!(report.occurrences.len(), 1);
        assert_eq!(report.failures, vec![EntryFailure::unreadable(0, "bad row")]);
    }

    #[test]
    fn earlier_failures_rule_out_a_systemic_error() {
        let entries = vec![entry(1, 5780, HebrewMonth::Nisan, 1, 7)];
        let report = YahrzeitScheduler::new(Offline)
            .upcoming_with_failures(
                &entries,
                vec![EntryFailure::unreadable(2, "bad row")],
                ymd(2024, 4, 1),
            )
            .unwrap();
        assert!(report.occurrences.is_empty());
        let kinds: Vec<FailureKind> = report.failures.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![FailureKind::ConverterUnavailable, FailureKind::InvalidHebrewDate]
        );
    }

    #[test]
    fn empty_batch_is_an_empty_report() {
        let report = scheduler().upcoming(&[], ymd(2024, 4, 1)).unwrap();
        assert!(report.occurrences.is_empty());
        assert!(report.is_complete());
    }
}
