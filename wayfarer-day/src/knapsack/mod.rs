//! Two-constraint 0/1 knapsack over hours and money.
//!
//! Both constructions maximise total value subject to the hour and money
//! budgets and take an item only when doing so is strictly better than
//! leaving it, so they agree on the selected items and their order.
//!
//! - [`knapsack_reference`] keeps the full `(n+1)×(T+1)×(B+1)` table with a
//!   take flag per cell and backtracks from the full budget.
//! - [`knapsack`] keeps one `(T+1)×(B+1)` layer whose cells share a
//!   persistent trace of the choices behind their value.

mod reference;
mod rolling;

pub use reference::knapsack_reference;
pub use rolling::knapsack;

use crate::KnapsackItem;

/// Hour and money limits for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Budget {
    /// Whole hours available.
    pub hours: u32,
    /// Whole money units available.
    pub money: u32,
}

impl Budget {
    /// Limits of `hours` and `money`.
    #[must_use]
    pub const fn new(hours: u32, money: u32) -> Self {
        Self { hours, money }
    }
}

/// Dimensions of one budget layer of the value table.
///
/// Each axis is clamped to what the items could ever spend on it. Every
/// budget at or above those sums admits the same choices, so the table
/// never grows past the pool itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layer {
    hours: usize,
    money: usize,
}

impl Layer {
    fn new(budget: Budget, items: &[KnapsackItem]) -> Self {
        let (spend_hours, spend_money) = items.iter().fold((0_u32, 0_u32), |(hours, money), item| {
            (hours.saturating_add(item.hours), money.saturating_add(item.cost))
        });
        Self {
            hours: widen(budget.hours.min(spend_hours)),
            money: widen(budget.money.min(spend_money)),
        }
    }

    const fn cells(self) -> usize {
        self.hours
            .saturating_add(1)
            .saturating_mul(self.money.saturating_add(1))
    }

    const fn offset(self, hours: usize, money: usize) -> usize {
        hours
            .saturating_mul(self.money.saturating_add(1))
            .saturating_add(money)
    }
}

fn widen(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Items chosen for a day, in input order, with their totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnapsackSelection {
    /// Chosen items in the order they were supplied.
    pub items: Vec<KnapsackItem>,
    /// Sum of item hours.
    pub total_hours: u32,
    /// Sum of item costs.
    pub total_cost: u32,
    /// Sum of item values.
    pub total_value: u64,
}

impl KnapsackSelection {
    /// Collect `items[i]` for each ascending index in `chosen`.
    fn from_indices(items: &[KnapsackItem], chosen: &[usize]) -> Self {
        let picked: Vec<KnapsackItem> = chosen
            .iter()
            .filter_map(|&index| items.get(index).cloned())
            .collect();
        let total_hours = picked
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.hours));
        let total_cost = picked
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.cost));
        let total_value = picked.iter().map(|item| u64::from(item.value)).sum();
        Self {
            items: picked,
            total_hours,
            total_cost,
            total_value,
        }
    }

    /// Whether nothing was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identifiers of the selected places, in order.
    pub fn place_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.place.id.as_str())
    }
}
