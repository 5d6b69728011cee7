//! Points of interest supplied by a place source.

use std::fmt;

use geo::Coord;
use serde::{Deserialize, Serialize};

/// Category of a point of interest.
///
/// Every slot position and every cluster is keyed by one of these two
/// categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceCategory {
    /// Restaurants, cafes and other places to eat.
    Eatery,
    /// Museums, parks, galleries and other places to visit.
    Visit,
}

impl PlaceCategory {
    /// Single-letter tag symbol for the category.
    ///
    /// # Examples
    /// ```
    /// use wayfarer_core::PlaceCategory;
    ///
    /// assert_eq!(PlaceCategory::Eatery.symbol(), 'E');
    /// assert_eq!(PlaceCategory::Visit.symbol(), 'V');
    /// ```
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Eatery => 'E',
            Self::Visit => 'V',
        }
    }

    /// Parse a tag symbol, ignoring ASCII case.
    ///
    /// Returns `None` for anything other than `E` or `V`.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'E' => Some(Self::Eatery),
            'V' => Some(Self::Visit),
            _ => None,
        }
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eatery => f.write_str("eatery"),
            Self::Visit => f.write_str("visit"),
        }
    }
}

/// Raw opening-hours text, one line per weekday.
///
/// Lines follow the format used by common places providers, e.g.
/// `"Monday: 9:00 AM – 5:00 PM"`. An empty list means the provider had no
/// opening-hours information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpeningHours(pub Vec<String>);

impl OpeningHours {
    /// Whether any opening-hours text is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the raw weekday lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for OpeningHours {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A place that may fill a slot or a day.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Places are
/// shared by reference once handed to an engine and never mutated there.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wayfarer_core::{Place, PlaceCategory};
///
/// let place = Place::new("p1", "Louvre", Coord { x: 2.3376, y: 48.8606 }, PlaceCategory::Visit)
///     .with_rating(4.7)
///     .with_price(17.0);
/// assert_eq!(place.id, "p1");
/// assert_eq!(place.category, PlaceCategory::Visit);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Provider-assigned identifier, unique across categories.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Eatery or visit.
    pub category: PlaceCategory,
    /// Typical spend at the place, in whole-currency units.
    #[serde(default)]
    pub price: f64,
    /// Quality rating, usually `0.0..=5.0`.
    #[serde(default)]
    pub rating: f32,
    /// Weekday opening-hours text.
    #[serde(default)]
    pub opening_hours: OpeningHours,
    /// Provider price level, `0..=4`.
    #[serde(default)]
    pub price_level: u8,
}

impl Place {
    /// Construct a place with zero price and rating and no opening hours.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: Coord<f64>,
        category: PlaceCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            category,
            price: 0.0,
            rating: 0.0,
            opening_hours: OpeningHours::default(),
            price_level: 0,
        }
    }

    /// Set the price while returning `self` for chaining.
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Set the rating while returning `self` for chaining.
    #[must_use]
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    /// Set the price level while returning `self` for chaining.
    ///
    /// Values above 4 are clamped.
    #[must_use]
    pub fn with_price_level(mut self, price_level: u8) -> Self {
        self.price_level = price_level.min(4);
        self
    }

    /// Replace the opening-hours text while returning `self` for chaining.
    #[must_use]
    pub fn with_opening_hours(mut self, opening_hours: OpeningHours) -> Self {
        self.opening_hours = opening_hours;
        self
    }
}
