//! # Yahrzeit Core Library
//!
//! This library provides the core logic for tracking yahrzeits, the yearly
//! anniversaries of a death reckoned by the Hebrew calendar. Like the
//! `yahrzeit` CLI built on it, everything works on plain calendar dates.
//!
//! ## Architecture
//!
//! - **Calendar**: Gregorian/Hebrew conversion behind the
//!   [`HebrewDateConverter`] trait, backed by `icu_calendar`
//! - **Scheduler**: Projects each entry to its next Gregorian occurrence,
//!   handling Adar in leap years and short months
//! - **Storage**: SQLite entry storage and TOML-based configuration
//! - **Registry**: Entry lifecycle tying the above together
//!
//! ## Key Components
//!
//! - [`YahrzeitScheduler`]: Next-occurrence computation
//! - [`YahrzeitRegistry`]: Add, update, remove and project entries
//! - [`Database`]: Entry persistence
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod entry;
pub mod error;
pub mod registry;
pub mod scheduler;
pub mod storage;

pub use calendar::{
    Clock, FixedClock, HebrewDate, HebrewDateConverter, HebrewMonth, IcuHebrewCalendar,
    SystemClock,
};
pub use entry::{EntryUpdate, NewEntry, YahrzeitEntry};
pub use error::{ConfigError, ConversionError, CoreError, DatabaseError, ValidationError};
pub use registry::YahrzeitRegistry;
pub use scheduler::{
    AdarPolicy, EntryFailure, FailureKind, LeapAdar, UpcomingOccurrence, UpcomingReport,
    YahrzeitScheduler,
};
pub use storage::{Config, CorruptRecord, Database, EntryStore, MemoryStore};
