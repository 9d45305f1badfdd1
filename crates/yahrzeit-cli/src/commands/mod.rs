pub mod config;
pub mod convert;
pub mod entry;
pub mod upcoming;

use yahrzeit_core::{Config, CoreError, Database, IcuHebrewCalendar, YahrzeitRegistry};

pub type Registry = YahrzeitRegistry<Database, IcuHebrewCalendar>;

/// Registry over the on-disk database, configured from `config.toml`.
pub fn open_registry() -> Result<Registry, CoreError> {
    let config = Config::load()?;
    let db = Database::open()?;
    Ok(YahrzeitRegistry::with_config(db, IcuHebrewCalendar::new(), &config))
}
