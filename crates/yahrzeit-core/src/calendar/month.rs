//! Hebrew months and dates.
//!
//! Months carry a stable storage number that does not depend on whether the
//! year is a leap year:
//!
//! | Month    | Number | | Month   | Number |
//! |----------|--------|-|---------|--------|
//! | Tishrei  | 1      | | Nisan   | 7      |
//! | Cheshvan | 2      | | Iyar    | 8      |
//! | Kislev   | 3      | | Sivan   | 9      |
//! | Tevet    | 4      | | Tammuz  | 10     |
//! | Shevat   | 5      | | Av      | 11     |
//! | Adar     | 6      | | Elul    | 12     |
//! | Adar I   | 13     | | Adar II | 14     |
//!
//! `Adar` is the single Adar of a common year. In a leap year the
//! intercalary `AdarI` precedes the regular `AdarII`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HebrewMonth {
    Tishrei,
    Cheshvan,
    Kislev,
    Tevet,
    Shevat,
    Adar,
    AdarI,
    AdarII,
    Nisan,
    Iyar,
    Sivan,
    Tammuz,
    Av,
    Elul,
}

/// Months following Adar, in civil order.
const AFTER_ADAR: [HebrewMonth; 6] = [
    HebrewMonth::Nisan,
    HebrewMonth::Iyar,
    HebrewMonth::Sivan,
    HebrewMonth::Tammuz,
    HebrewMonth::Av,
    HebrewMonth::Elul,
];

const BEFORE_ADAR: [HebrewMonth; 5] = [
    HebrewMonth::Tishrei,
    HebrewMonth::Cheshvan,
    HebrewMonth::Kislev,
    HebrewMonth::Tevet,
    HebrewMonth::Shevat,
];

impl HebrewMonth {
    pub const ALL: [HebrewMonth; 14] = [
        HebrewMonth::Tishrei,
        HebrewMonth::Cheshvan,
        HebrewMonth::Kislev,
        HebrewMonth::Tevet,
        HebrewMonth::Shevat,
        HebrewMonth::Adar,
        HebrewMonth::AdarI,
        HebrewMonth::AdarII,
        HebrewMonth::Nisan,
        HebrewMonth::Iyar,
        HebrewMonth::Sivan,
        HebrewMonth::Tammuz,
        HebrewMonth::Av,
        HebrewMonth::Elul,
    ];

    /// Storage number (see the module table).
    pub fn number(self) -> u8 {
        match self {
            HebrewMonth::Tishrei => 1,
            HebrewMonth::Cheshvan => 2,
            HebrewMonth::Kislev => 3,
            HebrewMonth::Tevet => 4,
            HebrewMonth::Shevat => 5,
            HebrewMonth::Adar => 6,
            HebrewMonth::Nisan => 7,
            HebrewMonth::Iyar => 8,
            HebrewMonth::Sivan => 9,
            HebrewMonth::Tammuz => 10,
            HebrewMonth::Av => 11,
            HebrewMonth::Elul => 12,
            HebrewMonth::AdarI => 13,
            HebrewMonth::AdarII => 14,
        }
    }

    /// Parse a storage number.
    ///
    /// # Errors
    /// `UnknownMonth` for anything outside 1..=14.
    pub fn from_number(number: u8) -> Result<Self, ConversionError> {
        Self::ALL
            .into_iter()
            .find(|month| month.number() == number)
            .ok_or_else(|| ConversionError::UnknownMonth(number.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            HebrewMonth::Tishrei => "Tishrei",
            HebrewMonth::Cheshvan => "Cheshvan",
            HebrewMonth::Kislev => "Kislev",
            HebrewMonth::Tevet => "Tevet",
            HebrewMonth::Shevat => "Shevat",
            HebrewMonth::Adar => "Adar",
            HebrewMonth::AdarI => "Adar I",
            HebrewMonth::AdarII => "Adar II",
            HebrewMonth::Nisan => "Nisan",
            HebrewMonth::Iyar => "Iyar",
            HebrewMonth::Sivan => "Sivan",
            HebrewMonth::Tammuz => "Tammuz",
            HebrewMonth::Av => "Av",
            HebrewMonth::Elul => "Elul",
        }
    }

    pub fn is_adar(self) -> bool {
        matches!(
            self,
            HebrewMonth::Adar | HebrewMonth::AdarI | HebrewMonth::AdarII
        )
    }

    /// Position of the month within a year, counted from Tishrei = 1.
    ///
    /// Returns `None` when the month does not occur in that kind of year:
    /// `Adar` in a leap year, `AdarI`/`AdarII` in a common year.
    pub fn ordinal_in(self, leap: bool) -> Option<u8> {
        let shift = u8::from(leap);
        match self {
            HebrewMonth::Adar => (!leap).then_some(6),
            HebrewMonth::AdarI => leap.then_some(6),
            HebrewMonth::AdarII => leap.then_some(7),
            month => {
                if let Some(idx) = BEFORE_ADAR.iter().position(|m| *m == month) {
                    return Some(idx as u8 + 1);
                }
                AFTER_ADAR
                    .iter()
                    .position(|m| *m == month)
                    .map(|idx| idx as u8 + 7 + shift)
            }
        }
    }

    /// Inverse of [`HebrewMonth::ordinal_in`].
    pub fn from_ordinal(ordinal: u8, leap: bool) -> Option<Self> {
        match (ordinal, leap) {
            (1..=5, _) => Some(BEFORE_ADAR[usize::from(ordinal) - 1]),
            (6, false) => Some(HebrewMonth::Adar),
            (6, true) => Some(HebrewMonth::AdarI),
            (7, true) => Some(HebrewMonth::AdarII),
            (7..=12, false) => Some(AFTER_ADAR[usize::from(ordinal) - 7]),
            (8..=13, true) => Some(AFTER_ADAR[usize::from(ordinal) - 8]),
            _ => None,
        }
    }
}

impl fmt::Display for HebrewMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HebrewMonth {
    type Err = ConversionError;

    /// Accepts month names (case-insensitive, common transliterations) or
    /// storage numbers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(number) = trimmed.parse::<u8>() {
            return Self::from_number(number);
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        let month = match normalized.as_str() {
            "tishrei" | "tishri" => HebrewMonth::Tishrei,
            "cheshvan" | "heshvan" | "marcheshvan" | "marheshvan" => HebrewMonth::Cheshvan,
            "kislev" => HebrewMonth::Kislev,
            "tevet" | "teves" => HebrewMonth::Tevet,
            "shevat" | "shvat" => HebrewMonth::Shevat,
            "adar" => HebrewMonth::Adar,
            "adari" | "adar1" | "adarrishon" => HebrewMonth::AdarI,
            "adarii" | "adar2" | "adarsheni" => HebrewMonth::AdarII,
            "nisan" | "nissan" => HebrewMonth::Nisan,
            "iyar" | "iyyar" => HebrewMonth::Iyar,
            "sivan" => HebrewMonth::Sivan,
            "tammuz" | "tamuz" => HebrewMonth::Tammuz,
            "av" => HebrewMonth::Av,
            "elul" => HebrewMonth::Elul,
            _ => return Err(ConversionError::UnknownMonth(trimmed.to_string())),
        };
        Ok(month)
    }
}

/// A day of the Hebrew calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HebrewDate {
    pub year: i32,
    pub month: HebrewMonth,
    pub day: u8,
}

impl HebrewDate {
    pub fn new(year: i32, month: HebrewMonth, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Same day and month in another year.
    pub fn with_year(self, year: i32) -> Self {
        Self { year, ..self }
    }
}

impl fmt::Display for HebrewDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.day, self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_numbers_are_unique_and_round_trip() {
        for month in HebrewMonth::ALL {
            assert_eq!(HebrewMonth::from_number(month.number()).unwrap(), month);
        }
        assert!(HebrewMonth::from_number(0).is_err());
        assert!(HebrewMonth::from_number(15).is_err());
    }

    #[test]
    fn ordinals_follow_civil_order() {
        assert_eq!(HebrewMonth::Tishrei.ordinal_in(false), Some(1));
        assert_eq!(HebrewMonth::Adar.ordinal_in(false), Some(6));
        assert_eq!(HebrewMonth::Nisan.ordinal_in(false), Some(7));
        assert_eq!(HebrewMonth::Elul.ordinal_in(false), Some(12));

        assert_eq!(HebrewMonth::AdarI.ordinal_in(true), Some(6));
        assert_eq!(HebrewMonth::AdarII.ordinal_in(true), Some(7));
        assert_eq!(HebrewMonth::Nisan.ordinal_in(true), Some(8));
        assert_eq!(HebrewMonth::Elul.ordinal_in(true), Some(13));
    }

    #[test]
    fn adar_variants_only_exist_in_matching_years() {
        assert_eq!(HebrewMonth::Adar.ordinal_in(true), None);
        assert_eq!(HebrewMonth::AdarI.ordinal_in(false), None);
        assert_eq!(HebrewMonth::AdarII.ordinal_in(false), None);
    }

    #[test]
    fn from_ordinal_inverts_ordinal_in() {
        for leap in [false, true] {
            let months = if leap { 13 } else { 12 };
            for ordinal in 1..=months {
                let month = HebrewMonth::from_ordinal(ordinal, leap).unwrap();
                assert_eq!(month.ordinal_in(leap), Some(ordinal));
            }
            assert_eq!(HebrewMonth::from_ordinal(0, leap), None);
            assert_eq!(HebrewMonth::from_ordinal(months + 1, leap), None);
        }
    }

    #[test]
    fn parses_names_and_numbers() {
        assert_eq!("Nisan".parse::<HebrewMonth>().unwrap(), HebrewMonth::Nisan);
        assert_eq!("adar ii".parse::<HebrewMonth>().unwrap(), HebrewMonth::AdarII);
        assert_eq!("Adar I".parse::<HebrewMonth>().unwrap(), HebrewMonth::AdarI);
        assert_eq!("heshvan".parse::<HebrewMonth>().unwrap(), HebrewMonth::Cheshvan);
        assert_eq!("13".parse::<HebrewMonth>().unwrap(), HebrewMonth::AdarI);
        assert!("Brumaire".parse::<HebrewMonth>().is_err());
    }

    #[test]
    fn date_label_uses_month_name() {
        let date = HebrewDate::new(5784, HebrewMonth::AdarII, 14);
        assert_eq!(date.to_string(), "14 Adar II 5784");
        assert_eq!(date.with_year(5785).year, 5785);
    }
}
