//! Full-table knapsack with backtracking.

use super::{Budget, KnapsackSelection, Layer, widen};
use crate::KnapsackItem;

/// Solve with the full value table and take flags.
///
/// Memory is `O(n·T·B)`, with each budget axis clamped to the pool's
/// total spend; prefer [`knapsack`](super::knapsack) for large
/// pools. Returns an empty selection when nothing fits.
#[must_use]
pub fn knapsack_reference(items: &[KnapsackItem], budget: Budget) -> KnapsackSelection {
    let layer = Layer::new(budget, items);
    let rows = items.len().saturating_add(1);
    let size = rows.saturating_mul(layer.cells());
    let mut values = vec![0_u64; size];
    let mut take = vec![false; size];
    let at = |row: usize, hours: usize, money: usize| {
        row.saturating_mul(layer.cells())
            .saturating_add(layer.offset(hours, money))
    };

    for (row, item) in items.iter().enumerate() {
        let (need_hours, need_money) = (widen(item.hours), widen(item.cost));
        for hours in 0..=layer.hours {
            for money in 0..=layer.money {
                let exclude = values.get(at(row, hours, money)).copied().unwrap_or(0);
                let include = hours
                    .checked_sub(need_hours)
                    .zip(money.checked_sub(need_money))
                    .and_then(|(left_hours, left_money)| values.get(at(row, left_hours, left_money)))
                    .map(|&rest| rest.saturating_add(u64::from(item.value)));
                let here = at(row + 1, hours, money);
                let (best, taken) = match include {
                    Some(value) if value > exclude => (value, true),
                    _ => (exclude, false),
                };
                if let Some(cell) = values.get_mut(here) {
                    *cell = best;
                }
                if let Some(flag) = take.get_mut(here) {
                    *flag = taken;
                }
            }
        }
    }

    let (mut hours, mut money) = (layer.hours, layer.money);
    let mut chosen = Vec::new();
    for (row, item) in items.iter().enumerate().rev() {
        if take.get(at(row + 1, hours, money)).copied().unwrap_or(false) {
            chosen.push(row);
            hours = hours.saturating_sub(widen(item.hours));
            money = money.saturating_sub(widen(item.cost));
        }
    }
    chosen.reverse();
    KnapsackSelection::from_indices(items, &chosen)
}
