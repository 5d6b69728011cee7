//! Weekdays and whole-hour intervals.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hours in a day; the largest valid interval end.
pub const HOURS_PER_DAY: u8 = 24;

/// Day of the week a request applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Weekday {
    /// All weekdays starting from Monday.
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// English day name, capitalised as in opening-hours text.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Parse an English day name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|day| day.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors returned when validating [`TimeInterval`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// The interval ended before or when it started.
    #[error("interval {start}-{end} must start before it ends")]
    Empty {
        /// Start hour.
        start: u8,
        /// End hour.
        end: u8,
    },
    /// The interval ended after midnight.
    #[error("interval end {end} is past {HOURS_PER_DAY}:00")]
    PastMidnight {
        /// End hour.
        end: u8,
    },
    /// The interval started before the preceding one ended.
    #[error("interval starting at {start} overlaps the previous one ending at {previous_end}")]
    OutOfOrder {
        /// End hour of the preceding interval.
        previous_end: u8,
        /// Start hour of this interval.
        start: u8,
    },
}

/// Half-open interval of whole hours within one day, `start..end`.
///
/// # Examples
/// ```
/// use wayfarer_core::TimeInterval;
///
/// let lunch = TimeInterval::new(12, 14)?;
/// assert_eq!(lunch.minutes(), 120);
/// assert!(TimeInterval::new(14, 12).is_err());
/// # Ok::<(), wayfarer_core::TimeError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    /// First hour of the interval.
    pub start: u8,
    /// Hour the interval ends at (exclusive).
    pub end: u8,
}

impl TimeInterval {
    /// Validate and construct an interval.
    pub const fn new(start: u8, end: u8) -> Result<Self, TimeError> {
        let interval = Self { start, end };
        match interval.check() {
            Ok(()) => Ok(interval),
            Err(err) => Err(err),
        }
    }

    /// Re-check an interval obtained through deserialisation.
    pub const fn check(&self) -> Result<(), TimeError> {
        if self.end > HOURS_PER_DAY {
            return Err(TimeError::PastMidnight { end: self.end });
        }
        if self.start >= self.end {
            return Err(TimeError::Empty {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Check that `self` starts no earlier than `previous` ends.
    pub const fn check_follows(&self, previous: &Self) -> Result<(), TimeError> {
        if self.start < previous.end {
            return Err(TimeError::OutOfOrder {
                previous_end: previous.end,
                start: self.start,
            });
        }
        Ok(())
    }

    /// Length of the interval in minutes.
    ///
    /// Returns zero for an unchecked, inverted interval.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        (self.end.saturating_sub(self.start) as u32) * 60
    }

    /// Whether the two half-open intervals share at least one instant.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(8, 10, true)]
    #[case(0, 24, true)]
    #[case(10, 10, false)]
    #[case(12, 9, false)]
    #[case(20, 25, false)]
    fn validates_bounds(#[case] start: u8, #[case] end: u8, #[case] ok: bool) {
        assert_eq!(TimeInterval::new(start, end).is_ok(), ok);
    }

    #[rstest]
    #[case((8, 10), (9, 11), true)]
    #[case((8, 10), (10, 12), false)]
    #[case((8, 24), (0, 9), true)]
    #[case((13, 14), (8, 12), false)]
    fn detects_overlap(#[case] a: (u8, u8), #[case] b: (u8, u8), #[case] expected: bool) {
        let lhs = TimeInterval { start: a.0, end: a.1 };
        let rhs = TimeInterval { start: b.0, end: b.1 };
        assert_eq!(lhs.overlaps(&rhs), expected);
        assert_eq!(rhs.overlaps(&lhs), expected);
    }

    #[rstest]
    fn consecutive_intervals_must_not_overlap() {
        let morning = TimeInterval { start: 8, end: 10 };
        let late_morning = TimeInterval { start: 10, end: 12 };
        let clash = TimeInterval { start: 9, end: 11 };
        assert_eq!(late_morning.check_follows(&morning), Ok(()));
        assert_eq!(
            clash.check_follows(&morning),
            Err(TimeError::OutOfOrder {
                previous_end: 10,
                start: 9
            })
        );
    }

    #[rstest]
    fn weekday_names_round_trip() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_name(day.name()), Some(day));
        }
        assert_eq!(Weekday::from_name(" saturday "), Some(Weekday::Saturday));
        assert_eq!(Weekday::from_name("Funday"), None);
    }
}
