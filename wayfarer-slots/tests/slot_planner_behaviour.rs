#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural tests for request-level slot planning.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use wayfarer_core::test_support::{RecordingPlaceSource, ZeroTravelTime, place};
use wayfarer_core::{
    MemorySolutionCache, Place, PlaceCategory, RatingScorer, SlotRequest, SlotSolution,
    TimeInterval, Weekday,
};
use wayfarer_slots::{SlotError, SlotPlanner};

#[derive(Debug, Default)]
struct SlotWorld {
    places: RefCell<Vec<Place>>,
    source: RefCell<Option<RecordingPlaceSource>>,
    cache: MemorySolutionCache,
    outcome: RefCell<Option<Result<SlotSolution, SlotError>>>,
}

#[fixture]
fn world() -> SlotWorld {
    SlotWorld::default()
}

fn word(raw: &str) -> &str {
    raw.trim_matches('"')
}

fn rating(raw: &str) -> f32 {
    word(raw).parse().expect("numeric rating")
}

fn hour(raw: &str) -> u8 {
    word(raw).parse().expect("hour of day")
}

fn add_pair(world: &SlotWorld, category: PlaceCategory, pair: [(&str, &str); 2]) {
    let mut places = world.places.borrow_mut();
    for (id, rated) in pair {
        places.push(place(word(id), category, rating(rated)));
    }
}

#[given("eateries {first:word} rated {first_rating:word} and {second:word} rated {second_rating:word}")]
fn given_eateries(
    world: &SlotWorld,
    first: String,
    first_rating: String,
    second: String,
    second_rating: String,
) {
    add_pair(
        world,
        PlaceCategory::Eatery,
        [
            (first.as_str(), first_rating.as_str()),
            (second.as_str(), second_rating.as_str()),
        ],
    );
}

#[given("visits {first:word} rated {first_rating:word} and {second:word} rated {second_rating:word}")]
fn given_visits(
    world: &SlotWorld,
    first: String,
    first_rating: String,
    second: String,
    second_rating: String,
) {
    add_pair(
        world,
        PlaceCategory::Visit,
        [
            (first.as_str(), first_rating.as_str()),
            (second.as_str(), second_rating.as_str()),
        ],
    );
}

#[when("the slot {tag:word} is planned from {start:word} to {end:word}")]
fn when_planned(world: &SlotWorld, tag: String, start: String, end: String) {
    let symbols = word(&tag);
    let (first, last) = (hour(&start), hour(&end));
    // One-hour stays from the start; the last stay runs to the end.
    let stay_times: Vec<TimeInterval> = (0..symbols.len())
        .map(|offset| {
            let step = u8::try_from(offset).expect("short tag");
            let begin = first.saturating_add(step);
            let finish = if offset + 1 == symbols.len() {
                last
            } else {
                begin.saturating_add(1)
            };
            TimeInterval {
                start: begin,
                end: finish,
            }
        })
        .collect();
    let request = SlotRequest {
        location: "Paris,France".to_owned(),
        radius: 0,
        tag: symbols.to_owned(),
        stay_times,
        weekday: Weekday::Saturday,
    };

    let mut source = world.source.borrow_mut();
    let recording =
        source.get_or_insert_with(|| RecordingPlaceSource::new(world.places.borrow().clone()));
    let planner = SlotPlanner::new(&*recording, RatingScorer, ZeroTravelTime, &world.cache);
    world.outcome.replace(Some(planner.plan(&request)));
}

#[then("{count:word} candidates are returned")]
fn then_candidate_count(world: &SlotWorld, count: String) {
    let expected: usize = word(&count).parse().expect("candidate count");
    let outcome = world.outcome.borrow();
    let solution = outcome
        .as_ref()
        .expect("a plan was attempted")
        .as_ref()
        .expect("plan succeeded");
    assert_eq!(solution.candidates.len(), expected);
}

#[then("the best candidate is {first:word} then {second:word}")]
fn then_best(world: &SlotWorld, first: String, second: String) {
    let outcome = world.outcome.borrow();
    let solution = outcome
        .as_ref()
        .expect("a plan was attempted")
        .as_ref()
        .expect("plan succeeded");
    let best = solution.best().expect("non-empty solution");
    assert_eq!(
        best.place_ids().collect::<Vec<_>>(),
        [word(&first), word(&second)]
    );
}

#[then("the request is rejected as an invalid tag")]
fn then_invalid_tag(world: &SlotWorld) {
    let outcome = world.outcome.borrow();
    let result = outcome.as_ref().expect("a plan was attempted");
    assert!(matches!(result, Err(SlotError::InvalidTag(_))));
}

#[then("the place source was queried {count:word} times")]
fn then_source_calls(world: &SlotWorld, count: String) {
    let expected: usize = word(&count).parse().expect("call count");
    let calls = world
        .source
        .borrow()
        .as_ref()
        .map_or(0, RecordingPlaceSource::calls);
    assert_eq!(calls, expected);
}

#[scenario(path = "tests/features/slot_planner.feature", index = 0)]
fn ranks_eatery_then_visit(world: SlotWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/slot_planner.feature", index = 1)]
fn never_repeats_a_place(world: SlotWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/slot_planner.feature", index = 2)]
fn serves_repeat_requests_from_cache(world: SlotWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/slot_planner.feature", index = 3)]
fn rejects_invalid_tag_early(world: SlotWorld) {
    let _ = world;
}
