//! Fixture pools, requests and temporary workspaces for CLI tests.

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use serde::Serialize;
use std::fs;
use tempfile::TempDir;
use wayfarer_core::{
    DayRequest, OpeningHours, Place, PlaceCategory, SlotRequest, TimeInterval, Weekday,
};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write fixture file");
}

pub(super) fn write_json_file<T: Serialize>(path: &Utf8Path, value: &T) {
    let payload = serde_json::to_string_pretty(value).expect("serialise fixture");
    write_utf8(path, payload.as_bytes());
}

/// A temporary directory with a UTF-8 root.
pub(super) struct Workspace {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

fn at_origin(id: &str, category: PlaceCategory) -> Place {
    Place::new(id, id, Coord { x: 2.35, y: 48.85 }, category)
}

/// Two eateries and two visits sharing one position.
pub(super) fn slot_pool() -> Vec<Place> {
    vec![
        at_origin("A", PlaceCategory::Eatery).with_rating(1.0),
        at_origin("B", PlaceCategory::Eatery).with_rating(2.0),
        at_origin("C", PlaceCategory::Visit).with_rating(3.0),
        at_origin("D", PlaceCategory::Visit).with_rating(4.0),
    ]
}

pub(super) fn slot_request(tag: &str) -> SlotRequest {
    SlotRequest {
        location: "Paris,France".to_owned(),
        radius: 1_000,
        tag: tag.to_owned(),
        stay_times: vec![
            TimeInterval { start: 8, end: 9 },
            TimeInterval { start: 9, end: 12 },
        ],
        weekday: Weekday::Saturday,
    }
}

/// A cafe, two visits and a park closed on Mondays.
pub(super) fn day_pool() -> Vec<Place> {
    let closed_monday: OpeningHours = ["Monday: Closed", "Tuesday: Open 24 hours"]
        .into_iter()
        .collect();
    vec![
        at_origin("cafe", PlaceCategory::Eatery)
            .with_price(10.0)
            .with_rating(4.0),
        at_origin("museum", PlaceCategory::Visit)
            .with_price(15.0)
            .with_rating(4.5),
        at_origin("gallery", PlaceCategory::Visit)
            .with_price(30.0)
            .with_rating(5.0),
        at_origin("park", PlaceCategory::Visit)
            .with_rating(5.0)
            .with_opening_hours(closed_monday),
    ]
}

pub(super) fn day_request(window: TimeInterval) -> DayRequest {
    DayRequest {
        weekday: Weekday::Monday,
        window,
        time_budget_hours: 3,
        money_budget: 30,
    }
}
