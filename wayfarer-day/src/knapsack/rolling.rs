//! Single-layer knapsack with persistent choice traces.

use std::rc::Rc;

use super::{Budget, KnapsackSelection, Layer, widen};
use crate::KnapsackItem;

/// One chosen item and the choices made before it.
#[derive(Debug)]
struct Trace {
    item: usize,
    earlier: Option<Rc<Trace>>,
}

impl Drop for Trace {
    // Unlink the chain one node at a time; a long run of uniquely owned
    // traces would otherwise drop recursively.
    fn drop(&mut self) {
        let mut next = self.earlier.take();
        while let Some(link) = next {
            let Ok(mut trace) = Rc::try_unwrap(link) else {
                break;
            };
            next = trace.earlier.take();
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Cell {
    value: u64,
    trace: Option<Rc<Trace>>,
}

/// Solve with one rolling `(T+1)×(B+1)` layer.
///
/// Each cell stores the best value for its budget together with a shared
/// trace of the items behind it, so no per-item table is kept. Cells are
/// updated from the largest budget down, which keeps every read on the
/// previous item's values. Returns an empty selection when nothing fits.
///
/// # Examples
/// ```
/// use wayfarer_core::test_support::place;
/// use wayfarer_core::PlaceCategory;
/// use wayfarer_day::{Budget, KnapsackItem, StayHours, knapsack};
///
/// let items: Vec<_> = [("cafe", 4.0, 8.0), ("museum", 4.8, 20.0), ("park", 4.2, 0.0)]
///     .into_iter()
///     .map(|(id, rating, price)| {
///         let category = if id == "cafe" { PlaceCategory::Eatery } else { PlaceCategory::Visit };
///         let priced = place(id, category, rating).with_price(price);
///         KnapsackItem::from_place(priced, StayHours::default())
///     })
///     .collect();
/// let selection = knapsack(&items, Budget::new(3, 25));
/// assert_eq!(selection.place_ids().collect::<Vec<_>>(), ["cafe", "park"]);
/// ```
#[must_use]
pub fn knapsack(items: &[KnapsackItem], budget: Budget) -> KnapsackSelection {
    let layer = Layer::new(budget, items);
    let mut cells = vec![Cell::default(); layer.cells()];

    for (index, item) in items.iter().enumerate() {
        let (need_hours, need_money) = (widen(item.hours), widen(item.cost));
        for hours in (need_hours..=layer.hours).rev() {
            for money in (need_money..=layer.money).rev() {
                let from = layer.offset(hours - need_hours, money - need_money);
                let Some(source) = cells.get(from) else {
                    continue;
                };
                let include = source.value.saturating_add(u64::from(item.value));
                let earlier = source.trace.clone();
                let Some(cell) = cells.get_mut(layer.offset(hours, money)) else {
                    continue;
                };
                if include > cell.value {
                    *cell = Cell {
                        value: include,
                        trace: Some(Rc::new(Trace {
                            item: index,
                            earlier,
                        })),
                    };
                }
            }
        }
    }

    let mut chosen = Vec::new();
    let mut cursor = cells
        .get(layer.offset(layer.hours, layer.money))
        .and_then(|cell| cell.trace.clone());
    while let Some(step) = cursor {
        chosen.push(step.item);
        cursor = step.earlier.clone();
    }
    chosen.reverse();
    KnapsackSelection::from_indices(items, &chosen)
}
