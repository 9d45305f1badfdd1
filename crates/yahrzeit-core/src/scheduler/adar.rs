//! Which Adar an anniversary is observed in.
//!
//! Leap years have two Adars, common years one. An anniversary fixed in one
//! kind of year has to be mapped onto the months of the other. Observance
//! customs differ here, so the mapping is a configurable modeling choice
//! rather than a ruling.

use serde::{Deserialize, Serialize};

use crate::calendar::HebrewMonth;

/// Adar of a leap year that hosts an anniversary from a common year's Adar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapAdar {
    #[default]
    First,
    Second,
}

impl LeapAdar {
    fn month(self) -> HebrewMonth {
        match self {
            LeapAdar::First => HebrewMonth::AdarI,
            LeapAdar::Second => HebrewMonth::AdarII,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdarPolicy {
    /// Where a common-year Adar anniversary goes in a leap year.
    #[serde(default)]
    pub leap_year_adar: LeapAdar,
    /// Observe an Adar I anniversary in Adar when the year has no Adar I.
    /// When off, such years have no occurrence.
    #[serde(default = "default_true")]
    pub remap_adar_i: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AdarPolicy {
    fn default() -> Self {
        Self {
            leap_year_adar: LeapAdar::First,
            remap_adar_i: true,
        }
    }
}

impl AdarPolicy {
    /// Month in which an anniversary fixed in `month` falls in a year of the
    /// given kind, or `None` if it has no counterpart under this policy.
    pub fn resolve(self, month: HebrewMonth, leap: bool) -> Option<HebrewMonth> {
        if !month.is_adar() {
            return Some(month);
        }
        match (month, leap) {
            (HebrewMonth::AdarI, false) => self.remap_adar_i.then_some(HebrewMonth::Adar),
            (HebrewMonth::AdarII, false) => Some(HebrewMonth::Adar),
            (HebrewMonth::Adar, true) => Some(self.leap_year_adar.month()),
            (month, _) => Some(month),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_adar_months_pass_through() {
        let policy = AdarPolicy::default();
        for leap in [false, true] {
            assert_eq!(
                policy.resolve(HebrewMonth::Nisan, leap),
                Some(HebrewMonth::Nisan)
            );
            assert_eq!(
                policy.resolve(HebrewMonth::Cheshvan, leap),
                Some(HebrewMonth::Cheshvan)
            );
        }
    }

    #[test]
    fn leap_adars_collapse_in_common_years() {
        let policy = AdarPolicy::default();
        assert_eq!(
            policy.resolve(HebrewMonth::AdarI, false),
            Some(HebrewMonth::Adar)
        );
        assert_eq!(
            policy.resolve(HebrewMonth::AdarII, false),
            Some(HebrewMonth::Adar)
        );
    }

    #[test]
    fn leap_adars_stay_put_in_leap_years() {
        let policy = AdarPolicy::default();
        assert_eq!(
            policy.resolve(HebrewMonth::AdarI, true),
            Some(HebrewMonth::AdarI)
        );
        assert_eq!(
            policy.resolve(HebrewMonth::AdarII, true),
            Some(HebrewMonth::AdarII)
        );
    }

    #[test]
    fn common_adar_follows_leap_year_choice() {
        let first = AdarPolicy::default();
        let second = AdarPolicy {
            leap_year_adar: LeapAdar::Second,
            ..AdarPolicy::default()
        };
        assert_eq!(
            first.resolve(HebrewMonth::Adar, true),
            Some(HebrewMonth::AdarI)
        );
        assert_eq!(
            second.resolve(HebrewMonth::Adar, true),
            Some(HebrewMonth::AdarII)
        );
        assert_eq!(
            second.resolve(HebrewMonth::Adar, false),
            Some(HebrewMonth::Adar)
        );
    }

    #[test]
    fn strict_policy_leaves_adar_i_unresolved() {
        let strict = AdarPolicy {
            remap_adar_i: false,
            ..AdarPolicy::default()
        };
        assert_eq!(strict.resolve(HebrewMonth::AdarI, false), None);
        assert_eq!(
            strict.resolve(HebrewMonth::AdarI, true),
            Some(HebrewMonth::AdarI)
        );
    }
}
