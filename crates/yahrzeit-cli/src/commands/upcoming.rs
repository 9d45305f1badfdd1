//! Upcoming yahrzeit listing.

use chrono::NaiveDate;
use clap::Args;
use yahrzeit_core::{FixedClock, UpcomingOccurrence, UpcomingReport};

use super::open_registry;

#[derive(Args)]
pub struct UpcomingArgs {
    /// Compute as of this date instead of today (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,
    /// Only show yahrzeits at most this many days away
    #[arg(long)]
    within: Option<u32>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: UpcomingArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = open_registry()?;
    if let Some(today) = args.today {
        registry = registry.with_clock(FixedClock::new(today));
    }

    let report = match args.within {
        Some(days) => registry.upcoming_within(days)?,
        None => registry.upcoming()?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render(&report));
    }
    Ok(())
}

fn render(report: &UpcomingReport) -> String {
    let mut out = format!("Today: {} ({})\n", report.today, report.hebrew_today);
    if report.occurrences.is_empty() && report.failures.is_empty() {
        out.push_str("No upcoming yahrzeits.\n");
    }
    for occurrence in &report.occurrences {
        out.push_str(&occurrence_line(occurrence));
        out.push('\n');
    }
    for failure in &report.failures {
        out.push_str(&format!("  ! #{}  {}\n", failure.entry_id, failure.message));
    }
    out
}

fn occurrence_line(occurrence: &UpcomingOccurrence) -> String {
    let when = match occurrence.days_until {
        0 => "today".to_string(),
        1 => "in 1 day".to_string(),
        n => format!("in {n} days"),
    };
    let mut line = format!(
        "{} {:<12} {}  {}  {} ({} years)",
        if occurrence.is_soon { "*" } else { " " },
        when,
        occurrence.next_gregorian_date,
        occurrence.next_hebrew_date_label,
        occurrence.name,
        occurrence.years_since_death,
    );
    if occurrence.day_clamped {
        line.push_str(" [moved to end of short month]");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use yahrzeit_core::{HebrewDate, HebrewMonth};

    fn occurrence(days_until: i64, is_soon: bool, day_clamped: bool) -> UpcomingOccurrence {
        let hebrew = HebrewDate::new(5785, HebrewMonth::Nisan, 1);
        UpcomingOccurrence {
            entry_id: 1,
            name: "Sarah".into(),
            next_gregorian_date: NaiveDate::from_ymd_opt(2025, 3, 30).unwrap(),
            next_hebrew_date: hebrew,
            next_hebrew_date_label: hebrew.to_string(),
            days_until,
            is_soon,
            years_since_death: 1,
            day_clamped,
        }
    }

    #[test]
    fn soon_occurrences_are_starred() {
        let line = occurrence_line(&occurrence(1, true, false));
        assert_eq!(line, "* in 1 day     2025-03-30  1 Nisan 5785  Sarah (1 years)");
    }

    #[test]
    fn clamped_occurrences_are_marked() {
        let line = occurrence_line(&occurrence(0, true, true));
        assert!(line.contains("today"));
        assert!(line.ends_with("[moved to end of short month]"));
        assert!(!occurrence_line(&occurrence(30, false, false)).starts_with('*'));
    }
}
