//! Entry lifecycle on top of a store, a converter and a clock.
//!
//! The registry is the one place that writes entries. It derives the Hebrew
//! death date when an entry is created or its Gregorian date changes, and
//! hands stored entries to the scheduler for projection.

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::calendar::{Clock, HebrewDateConverter, SystemClock};
use crate::entry::{EntryUpdate, NewEntry, YahrzeitEntry};
use crate::error::{CoreError, Result, ValidationError};
use crate::scheduler::{AdarPolicy, EntryFailure, UpcomingReport, YahrzeitScheduler};
use crate::storage::{Config, EntryStore};

pub struct YahrzeitRegistry<S, C> {
    store: S,
    scheduler: YahrzeitScheduler<C>,
    clock: Box<dyn Clock>,
    default_notify_days_before: u32,
}

impl<S: EntryStore, C: HebrewDateConverter> YahrzeitRegistry<S, C> {
    /// Registry with default settings and the system clock.
    pub fn new(store: S, converter: C) -> Self {
        Self::with_config(store, converter, &Config::default())
    }

    /// Registry using the notification default and Adar policy from `config`.
    pub fn with_config(store: S, converter: C, config: &Config) -> Self {
        Self {
            store,
            scheduler: YahrzeitScheduler::with_policy(converter, config.scheduler),
            clock: Box::new(SystemClock),
            default_notify_days_before: config.notifications.default_notify_days_before,
        }
    }

    /// Replace the clock, e.g. with a [`FixedClock`](crate::calendar::FixedClock).
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> AdarPolicy {
        self.scheduler.policy()
    }

    /// Create an entry, deriving its Hebrew death date.
    ///
    /// # Errors
    /// `Validation` for an empty name or a death date after today,
    /// `Conversion` if the converter cannot place the date.
    pub fn add(&self, new: NewEntry) -> Result<YahrzeitEntry> {
        let name = required_text("name", &new.name)?;
        self.check_death_date(new.death_date)?;

        let hebrew = self.scheduler.converter().gregorian_to_hebrew(new.death_date)?;
        let now = Utc::now();
        let mut entry = YahrzeitEntry {
            id: 0,
            name,
            hebrew_name: optional_text(new.hebrew_name),
            death_date: new.death_date,
            hebrew_day: 0,
            hebrew_month: 0,
            hebrew_year: 0,
            notify_days_before: new
                .notify_days_before
                .unwrap_or(self.default_notify_days_before),
            created_at: now,
            updated_at: now,
        };
        entry.set_hebrew_death_date(hebrew);
        entry.id = self.store.insert(&entry)?;

        info!(entry_id = entry.id, hebrew_date = %hebrew, "added yahrzeit entry");
        Ok(entry)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    /// `NotFound` for an unknown id; otherwise as for [`Self::add`].
    pub fn update(&self, id: i64, update: EntryUpdate) -> Result<YahrzeitEntry> {
        let mut entry = self.store.get(id)?.ok_or(CoreError::NotFound { id })?;
        if update.is_empty() {
            return Ok(entry);
        }

        if let Some(name) = update.name {
            entry.name = required_text("name", &name)?;
        }
        if let Some(hebrew_name) = update.hebrew_name {
            entry.hebrew_name = optional_text(hebrew_name);
        }
        if let Some(days) = update.notify_days_before {
            entry.notify_days_before = days;
        }
        if let Some(death_date) = update.death_date {
            self.check_death_date(death_date)?;
            let hebrew = self.scheduler.converter().gregorian_to_hebrew(death_date)?;
            entry.death_date = death_date;
            entry.set_hebrew_death_date(hebrew);
        }
        entry.updated_at = Utc::now();

        if !self.store.update(&entry)? {
            return Err(CoreError::NotFound { id });
        }
        info!(entry_id = id, "updated yahrzeit entry");
        Ok(entry)
    }

    /// # Errors
    /// `NotFound` for an unknown id.
    pub fn remove(&self, id: i64) -> Result<()> {
        if !self.store.delete(id)? {
            return Err(CoreError::NotFound { id });
        }
        info!(entry_id = id, "removed yahrzeit entry");
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Option<YahrzeitEntry>> {
        self.store.get(id)
    }

    pub fn list(&self) -> Result<Vec<YahrzeitEntry>> {
        self.store.list()
    }

    /// Next occurrence of every stored entry, as of the clock's today.
    ///
    /// Rows the store cannot decode are reported as failures alongside
    /// entries the scheduler could not place.
    pub fn upcoming(&self) -> Result<UpcomingReport> {
        let (entries, corrupt) = self.store.scan()?;
        let unreadable = corrupt
            .into_iter()
            .map(|record| EntryFailure::unreadable(record.id, record.reason))
            .collect();
        Ok(self
            .scheduler
            .upcoming_with_failures(&entries, unreadable, self.clock.today())?)
    }

    /// Like [`Self::upcoming`], keeping occurrences at most `days` away.
    pub fn upcoming_within(&self, days: u32) -> Result<UpcomingReport> {
        let mut report = self.upcoming()?;
        report.retain_within(i64::from(days));
        Ok(report)
    }

    fn check_death_date(&self, death_date: NaiveDate) -> Result<()> {
        let today = self.clock.today();
        if death_date > today {
            return Err(ValidationError::InvalidValue {
                field: "death_date".to_string(),
                message: format!("{death_date} is after today ({today})"),
            }
            .into());
        }
        Ok(())
    }
}

fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField {
            field: field.to_string(),
        }
        .into());
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
