#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural tests for whole-day selection.

use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::str::FromStr;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use wayfarer_core::{DayRequest, Place, TimeInterval, Weekday};
use wayfarer_day::{DayKnapsackSelector, KnapsackSelection};

#[derive(Debug, Default)]
struct DayWorld {
    pool: RefCell<Vec<Place>>,
    budget: Cell<(u32, u32)>,
    selection: RefCell<Option<KnapsackSelection>>,
}

#[fixture]
fn world() -> DayWorld {
    DayWorld::default()
}

fn number<T>(raw: &str) -> T
where
    T: FromStr,
    T::Err: Debug,
{
    raw.trim_matches('"').parse().expect("numeric step argument")
}

#[given("the sample pool of twenty places")]
fn given_pool(world: &DayWorld) {
    let pool: Vec<Place> = serde_json::from_str(include_str!("fixtures/day_pool.json"))
        .expect("fixture pool parses");
    world.pool.replace(pool);
}

#[when(
    "a {day:word} from {start:word} to {end:word} is planned with {hours:word} hours and {money:word} to spend"
)]
fn when_planned(
    world: &DayWorld,
    day: String,
    start: String,
    end: String,
    hours: String,
    money: String,
) {
    let request = DayRequest {
        weekday: Weekday::from_name(day.trim_matches('"')).expect("known weekday"),
        window: TimeInterval::new(number(&start), number(&end)).expect("valid window"),
        time_budget_hours: number(&hours),
        money_budget: number(&money),
    };
    world
        .budget
        .set((request.time_budget_hours, request.money_budget));
    let selection = DayKnapsackSelector::new()
        .select(&world.pool.borrow(), &request)
        .expect("valid request");
    world.selection.replace(Some(selection));
}

#[then("place {position:word} of the day is {id:word}")]
fn then_place_at(world: &DayWorld, position: String, id: String) {
    let index: usize = number(&position);
    let selection = world.selection.borrow();
    let chosen = selection.as_ref().expect("a day was planned");
    let actual = chosen.place_ids().nth(index - 1);
    assert_eq!(actual, Some(id.trim_matches('"')));
}

#[then("the day stays within budget")]
fn then_within_budget(world: &DayWorld) {
    let (hours, money) = world.budget.get();
    let selection = world.selection.borrow();
    let chosen = selection.as_ref().expect("a day was planned");
    assert!(chosen.total_hours <= hours);
    assert!(chosen.total_cost <= money);
}

#[then("nothing is selected")]
fn then_empty(world: &DayWorld) {
    let selection = world.selection.borrow();
    assert!(selection.as_ref().expect("a day was planned").is_empty());
}

#[scenario(path = "tests/features/day_selection.feature", index = 0)]
fn monday_within_budget(world: DayWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/day_selection.feature", index = 1)]
fn no_time_no_places(world: DayWorld) {
    let _ = world;
}
