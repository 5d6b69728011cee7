//! Whole-day selection over a flat place pool.

use thiserror::Error;
use wayfarer_core::{DayRequest, OpeningHoursPredicate, Place, TimeError, WeeklyHours};

use crate::{Budget, KnapsackItem, KnapsackSelection, StayHours, knapsack, knapsack_reference};

/// Errors from [`DayKnapsackSelector::select`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DayError {
    /// The requested hour window is empty or runs past midnight.
    #[error("invalid day window: {0}")]
    InvalidWindow(#[from] TimeError),
}

/// Selects the most valuable set of open places that fits a day.
///
/// Places closed during the request window are dropped first; the rest are
/// priced with [`StayHours`] and passed to the knapsack.
#[derive(Debug, Clone, Default)]
pub struct DayKnapsackSelector<P = WeeklyHours>
where
    P: OpeningHoursPredicate,
{
    predicate: P,
    stay: StayHours,
}

impl DayKnapsackSelector<WeeklyHours> {
    /// Selector filtering on weekly opening-hours text.
    #[must_use]
    pub fn new() -> Self {
        Self::with_predicate(WeeklyHours, StayHours::default())
    }
}

impl<P: OpeningHoursPredicate> DayKnapsackSelector<P> {
    /// Selector using `predicate` and `stay` hours.
    pub const fn with_predicate(predicate: P, stay: StayHours) -> Self {
        Self { predicate, stay }
    }

    /// Price the places open during the request window, in input order.
    #[must_use]
    pub fn open_items(&self, places: &[Place], request: &DayRequest) -> Vec<KnapsackItem> {
        places
            .iter()
            .filter(|place| {
                self.predicate
                    .is_open(place, request.weekday, request.window)
            })
            .map(|place| KnapsackItem::from_place(place.clone(), self.stay))
            .collect()
    }

    /// Select the best day from `places`.
    ///
    /// # Errors
    /// Returns [`DayError::InvalidWindow`] when the request window is not a
    /// valid interval.
    pub fn select(
        &self,
        places: &[Place],
        request: &DayRequest,
    ) -> Result<KnapsackSelection, DayError> {
        self.run(places, request, knapsack)
    }

    /// Like [`DayKnapsackSelector::select`] but solved with the full table.
    ///
    /// # Errors
    /// Returns [`DayError::InvalidWindow`] when the request window is not a
    /// valid interval.
    pub fn select_reference(
        &self,
        places: &[Place],
        request: &DayRequest,
    ) -> Result<KnapsackSelection, DayError> {
        self.run(places, request, knapsack_reference)
    }

    fn run(
        &self,
        places: &[Place],
        request: &DayRequest,
        solve: fn(&[KnapsackItem], Budget) -> KnapsackSelection,
    ) -> Result<KnapsackSelection, DayError> {
        request.window.check()?;
        let items = self.open_items(places, request);
        log::debug!(
            "{} of {} places open on {} {}",
            items.len(),
            places.len(),
            request.weekday,
            request.window
        );
        let selection = solve(
            &items,
            Budget::new(request.time_budget_hours, request.money_budget),
        );
        log::info!(
            "selected {} places: {} h, cost {}, value {}",
            selection.items.len(),
            selection.total_hours,
            selection.total_cost,
            selection.total_value
        );
        Ok(selection)
    }
}
