//! Decide whether a place is open during a window of a weekday.
//!
//! [`WeeklyHours`] understands the weekday text returned by common places
//! providers:
//!
//! ```text
//! Monday: 9:00 AM – 5:00 PM
//! Tuesday: 11:30 AM – 2:30 PM, 6:00 – 10:00 PM
//! Wednesday: Open 24 hours
//! Thursday: Closed
//! ```

use crate::{Place, TimeInterval, Weekday};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Map a place, weekday and hour window to open or closed.
///
/// Implementations must be deterministic and thread-safe.
pub trait OpeningHoursPredicate: Send + Sync {
    /// Return `true` when `place` is open at some point of `window` on
    /// `weekday`.
    fn is_open(&self, place: &Place, weekday: Weekday, window: TimeInterval) -> bool;
}

/// Predicate that treats every place as open.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysOpen;

impl OpeningHoursPredicate for AlwaysOpen {
    fn is_open(&self, _place: &Place, _weekday: Weekday, _window: TimeInterval) -> bool {
        true
    }
}

/// Predicate backed by the place's weekday opening-hours text.
///
/// A place without any opening-hours text is treated as open, since the
/// provider simply did not know. A weekday missing from non-empty text is
/// closed. A line that cannot be parsed is treated as open.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wayfarer_core::{
///     OpeningHours, OpeningHoursPredicate, Place, PlaceCategory, TimeInterval, Weekday,
///     WeeklyHours,
/// };
///
/// let hours: OpeningHours = ["Monday: 9:00 AM – 5:00 PM", "Tuesday: Closed"]
///     .into_iter()
///     .collect();
/// let museum = Place::new("m", "Museum", Coord { x: 0.0, y: 0.0 }, PlaceCategory::Visit)
///     .with_opening_hours(hours);
/// let morning = TimeInterval::new(8, 10)?;
///
/// assert!(WeeklyHours.is_open(&museum, Weekday::Monday, morning));
/// assert!(!WeeklyHours.is_open(&museum, Weekday::Tuesday, morning));
/// assert!(!WeeklyHours.is_open(&museum, Weekday::Sunday, morning));
/// # Ok::<(), wayfarer_core::TimeError>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct WeeklyHours;

impl OpeningHoursPredicate for WeeklyHours {
    fn is_open(&self, place: &Place, weekday: Weekday, window: TimeInterval) -> bool {
        if place.opening_hours.is_empty() {
            return true;
        }
        let Some(schedule) = place
            .opening_hours
            .lines()
            .find_map(|line| day_schedule(line, weekday))
        else {
            return false;
        };
        match schedule {
            Some(DaySchedule::Closed) => false,
            Some(DaySchedule::AllDay) => true,
            Some(DaySchedule::Ranges(ranges)) => {
                let window_start = u16::from(window.start) * 60;
                let window_end = u16::from(window.end) * 60;
                ranges
                    .iter()
                    .any(|&(open, close)| open < window_end && window_start < close)
            }
            None => {
                log::debug!(
                    "unparseable opening hours for place {} on {weekday}; treating as open",
                    place.id
                );
                true
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DaySchedule {
    Closed,
    AllDay,
    /// Minute-of-day ranges, `open..close`.
    Ranges(Vec<(u16, u16)>),
}

/// Return `Some(schedule)` when `line` describes `weekday`; the inner
/// option is `None` when the schedule text could not be parsed.
fn day_schedule(line: &str, weekday: Weekday) -> Option<Option<DaySchedule>> {
    let (day, rest) = line.split_once(':')?;
    if Weekday::from_name(day)? != weekday {
        return None;
    }
    Some(parse_schedule(&normalise_spaces(rest)))
}

fn normalise_spaces(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{202f}' | '\u{a0}' | '\u{2009}' => ' ',
            other => other,
        })
        .collect()
}

fn parse_schedule(text: &str) -> Option<DaySchedule> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("closed") {
        return Some(DaySchedule::Closed);
    }
    if trimmed.eq_ignore_ascii_case("open 24 hours") {
        return Some(DaySchedule::AllDay);
    }
    trimmed
        .split(',')
        .map(parse_range)
        .collect::<Option<Vec<_>>>()
        .map(DaySchedule::Ranges)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

fn parse_range(text: &str) -> Option<(u16, u16)> {
    let mut parts = text.split(['–', '—', '-']);
    let open_text = parts.next()?;
    let close_text = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let (close_clock, close_meridiem) = parse_clock(close_text)?;
    let (open_clock, open_meridiem) = parse_clock(open_text)?;
    // "6:00 – 10:00 PM" shares the closing meridiem.
    let open = to_minutes(open_clock, open_meridiem.or(close_meridiem))?;
    let close = to_minutes(close_clock, close_meridiem)?;
    let close_in_day = if close <= open { MINUTES_PER_DAY } else { close };
    Some((open, close_in_day))
}

/// Parse `"9:30 AM"`, `"17:00"` or `"9"` into `(hour, minute)` and meridiem.
fn parse_clock(text: &str) -> Option<((u16, u16), Option<Meridiem>)> {
    let trimmed = text.trim();
    let upper = trimmed.to_ascii_uppercase();
    let (digits, meridiem) = if let Some(head) = upper.strip_suffix("AM") {
        (head.trim().to_owned(), Some(Meridiem::Am))
    } else if let Some(head) = upper.strip_suffix("PM") {
        (head.trim().to_owned(), Some(Meridiem::Pm))
    } else {
        (upper.clone(), None)
    };
    let (hour_text, minute_text) = digits.split_once(':').unwrap_or((digits.as_str(), "0"));
    let hour = hour_text.trim().parse::<u16>().ok()?;
    let minute = minute_text.trim().parse::<u16>().ok()?;
    if minute >= 60 {
        return None;
    }
    Some(((hour, minute), meridiem))
}

fn to_minutes((hour, minute): (u16, u16), meridiem: Option<Meridiem>) -> Option<u16> {
    let hour_of_day = match meridiem {
        Some(Meridiem::Am) if hour == 12 => 0,
        Some(Meridiem::Pm) if hour == 12 => 12,
        Some(Meridiem::Am) if hour < 12 => hour,
        Some(Meridiem::Pm) if hour < 12 => hour + 12,
        Some(_) => return None,
        None if hour <= 24 => hour,
        None => return None,
    };
    Some(hour_of_day * 60 + minute).filter(|&total| total <= MINUTES_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OpeningHours, PlaceCategory};
    use geo::Coord;
    use rstest::{fixture, rstest};

    fn place_with_hours(lines: &[&str]) -> Place {
        Place::new("p", "P", Coord { x: 0.0, y: 0.0 }, PlaceCategory::Visit)
            .with_opening_hours(lines.iter().copied().collect::<OpeningHours>())
    }

    #[fixture]
    fn bistro() -> Place {
        place_with_hours(&[
            "Monday: 11:30 AM – 2:30 PM, 6:00 – 10:00 PM",
            "Tuesday: Closed",
            "Wednesday: Open 24 hours",
            "Thursday: 17:00–23:00",
            "Friday: 6:00\u{202f}PM – 2:00\u{202f}AM",
        ])
    }

    fn window(start: u8, end: u8) -> TimeInterval {
        TimeInterval { start, end }
    }

    #[rstest]
    #[case(Weekday::Monday, (12, 13), true)]
    #[case(Weekday::Monday, (15, 17), false)]
    #[case(Weekday::Monday, (21, 24), true)]
    #[case(Weekday::Tuesday, (0, 24), false)]
    #[case(Weekday::Wednesday, (3, 4), true)]
    #[case(Weekday::Thursday, (16, 17), false)]
    #[case(Weekday::Thursday, (22, 23), true)]
    #[case(Weekday::Friday, (23, 24), true)]
    #[case(Weekday::Friday, (8, 17), false)]
    #[case(Weekday::Saturday, (8, 24), false)]
    fn evaluates_schedule(
        bistro: Place,
        #[case] day: Weekday,
        #[case] hours: (u8, u8),
        #[case] expected: bool,
    ) {
        assert_eq!(
            WeeklyHours.is_open(&bistro, day, window(hours.0, hours.1)),
            expected
        );
    }

    #[rstest]
    fn missing_text_is_open() {
        let place = place_with_hours(&[]);
        assert!(WeeklyHours.is_open(&place, Weekday::Sunday, window(0, 1)));
    }

    #[rstest]
    fn unparseable_line_is_open() {
        let place = place_with_hours(&["Sunday: by appointment"]);
        assert!(WeeklyHours.is_open(&place, Weekday::Sunday, window(9, 10)));
    }

    #[rstest]
    #[case("9:00 AM", Some(((9, 0), Some(Meridiem::Am))))]
    #[case("12:15 pm", Some(((12, 15), Some(Meridiem::Pm))))]
    #[case("17:45", Some(((17, 45), None)))]
    #[case("7", Some(((7, 0), None)))]
    #[case("7:75", None)]
    #[case("noon", None)]
    fn parses_clock_text(#[case] text: &str, #[case] expected: Option<((u16, u16), Option<Meridiem>)>) {
        assert_eq!(parse_clock(text), expected);
    }

    #[rstest]
    fn midnight_close_ends_the_day() {
        assert_eq!(parse_range("8:00 PM – 12:00 AM"), Some((20 * 60, MINUTES_PER_DAY)));
    }
}
