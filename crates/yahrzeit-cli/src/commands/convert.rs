//! Calendar conversion commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use serde::Serialize;
use yahrzeit_core::{
    Clock, HebrewDate, HebrewDateConverter, HebrewMonth, IcuHebrewCalendar, SystemClock,
};

#[derive(Subcommand)]
pub enum ConvertAction {
    /// Today's date in both calendars
    Today {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Gregorian date (YYYY-MM-DD) to Hebrew
    ToHebrew {
        date: NaiveDate,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Hebrew date to Gregorian
    ToGregorian {
        day: u8,
        /// Month name ("Nisan", "Adar II") or number (1 = Tishrei)
        month: HebrewMonth,
        year: i32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct Conversion {
    gregorian: NaiveDate,
    hebrew: HebrewDate,
    label: String,
    leap_year: bool,
}

pub fn run(action: ConvertAction) -> Result<(), Box<dyn std::error::Error>> {
    let calendar = IcuHebrewCalendar::new();

    let (gregorian, hebrew, json) = match action {
        ConvertAction::Today { json } => {
            let clock = SystemClock;
            (clock.today(), calendar.current_hebrew_date(&clock)?, json)
        }
        ConvertAction::ToHebrew { date, json } => {
            (date, calendar.gregorian_to_hebrew(date)?, json)
        }
        ConvertAction::ToGregorian {
            day,
            month,
            year,
            json,
        } => {
            let hebrew = HebrewDate::new(year, month, day);
            (calendar.hebrew_to_gregorian(hebrew)?, hebrew, json)
        }
    };

    let conversion = Conversion {
        gregorian,
        hebrew,
        label: hebrew.to_string(),
        leap_year: calendar.is_leap_year(hebrew.year)?,
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&conversion)?);
    } else {
        println!("{}  =  {}", conversion.gregorian, conversion.label);
    }
    Ok(())
}
