//! Places priced in hours and money.

use wayfarer_core::{Place, PlaceCategory};

/// Hours spent at a place, by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayHours {
    /// Hours spent at an eatery.
    pub eatery: u32,
    /// Hours spent at a visit.
    pub visit: u32,
}

impl Default for StayHours {
    fn default() -> Self {
        Self {
            eatery: 1,
            visit: 2,
        }
    }
}

impl StayHours {
    /// Hours spent at a place of `category`.
    #[must_use]
    pub const fn for_category(self, category: PlaceCategory) -> u32 {
        match category {
            PlaceCategory::Eatery => self.eatery,
            PlaceCategory::Visit => self.visit,
        }
    }
}

/// A place with the costs of including it in a day.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wayfarer_core::{Place, PlaceCategory};
/// use wayfarer_day::{KnapsackItem, StayHours};
///
/// let museum = Place::new("m", "Museum", Coord { x: 0.0, y: 0.0 }, PlaceCategory::Visit)
///     .with_price(12.5)
///     .with_rating(4.4);
/// let item = KnapsackItem::from_place(museum, StayHours::default());
/// assert_eq!((item.hours, item.cost, item.value), (2, 13, 44));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KnapsackItem {
    /// The underlying place.
    pub place: Place,
    /// Whole hours spent at the place.
    pub hours: u32,
    /// Whole money units spent at the place.
    pub cost: u32,
    /// Worth of including the place.
    pub value: u32,
}

impl KnapsackItem {
    /// Price `place`: hours from `stay`, cost as the price rounded up and
    /// value as ten times the rating, rounded.
    #[must_use]
    pub fn from_place(place: Place, stay: StayHours) -> Self {
        let hours = stay.for_category(place.category);
        let cost = to_units(place.price.ceil());
        let value = rating_value(place.rating);
        Self {
            place,
            hours,
            cost,
            value,
        }
    }
}

#[expect(clippy::float_arithmetic, reason = "ratings are scaled to integers")]
fn rating_value(rating: f32) -> u32 {
    to_units((f64::from(rating) * 10.0).round())
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "input is clamped to the u32 range; NaN maps to zero"
)]
fn to_units(amount: f64) -> u32 {
    amount.clamp(0.0, f64::from(u32::MAX)) as u32
}
