//! Caller-facing request payloads.
//!
//! Requests arrive unvalidated (for example from JSON); the engines
//! validate them before any computation.

use serde::{Deserialize, Serialize};

use crate::{TimeInterval, Weekday};

/// Ask for the best ways to fill one slot.
///
/// ```json
/// {
///   "location": "Paris,France",
///   "radius": 2000,
///   "tag": "EV",
///   "stay_times": [{ "start": 8, "end": 10 }, { "start": 10, "end": 12 }],
///   "weekday": "saturday"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequest {
    /// `city,country` to search in.
    pub location: String,
    /// Search radius in metres; zero selects the planner default.
    #[serde(default)]
    pub radius: u32,
    /// Slot tag such as `"EV"`.
    pub tag: String,
    /// One stay interval per tag position.
    pub stay_times: Vec<TimeInterval>,
    /// Day of the visit.
    pub weekday: Weekday,
}

impl SlotRequest {
    /// Interval from the first stay's start to the last stay's end.
    ///
    /// Returns `None` when there are no stay times. The span is not
    /// validated; an out-of-order request yields an inverted span.
    #[must_use]
    pub fn span(&self) -> Option<TimeInterval> {
        let first = self.stay_times.first()?;
        let last = self.stay_times.last()?;
        Some(TimeInterval {
            start: first.start,
            end: last.end,
        })
    }
}

/// Ask for a whole-day selection under time and money budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRequest {
    /// Day of the visit.
    pub weekday: Weekday,
    /// Hours of the day places must be open in.
    pub window: TimeInterval,
    /// Maximum total stay, in whole hours.
    pub time_budget_hours: u32,
    /// Maximum total spend, in whole-currency units.
    pub money_budget: u32,
}
