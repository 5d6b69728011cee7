//! Per-category place clusters handed to the slot engine.

use serde::{Deserialize, Serialize};

use crate::{OpeningHoursPredicate, Place, PlaceCategory, TimeInterval, Weekday};

/// Eatery and visit clusters for one query.
///
/// Both clusters are index-addressable and keep the order their supplier
/// gave them; the engine never re-sorts them. Once handed to the engine the
/// clusters are only read.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wayfarer_core::{AlwaysOpen, CategorizedPlaces, Place, PlaceCategory, TimeInterval, Weekday};
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let pool = vec![
///     Place::new("a", "Cafe", origin, PlaceCategory::Eatery),
///     Place::new("b", "Park", origin, PlaceCategory::Visit),
///     Place::new("c", "Bistro", origin, PlaceCategory::Eatery),
/// ];
/// let clusters = CategorizedPlaces::from_open_places(
///     pool,
///     &AlwaysOpen,
///     Weekday::Monday,
///     TimeInterval::new(9, 17)?,
/// );
/// assert_eq!(clusters.cluster(PlaceCategory::Eatery).len(), 2);
/// assert_eq!(clusters.cluster(PlaceCategory::Visit)[0].id, "b");
/// # Ok::<(), wayfarer_core::TimeError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizedPlaces {
    /// Places to eat, in supplier order.
    pub eatery: Vec<Place>,
    /// Places to visit, in supplier order.
    pub visit: Vec<Place>,
}

impl CategorizedPlaces {
    /// Build clusters from already-partitioned places.
    #[must_use]
    pub fn new(eatery: Vec<Place>, visit: Vec<Place>) -> Self {
        Self { eatery, visit }
    }

    /// Partition `places` by category, keeping only those open during
    /// `window` on `weekday`. Input order is preserved within each cluster.
    #[must_use]
    pub fn from_open_places<I>(
        places: I,
        predicate: &dyn OpeningHoursPredicate,
        weekday: Weekday,
        window: TimeInterval,
    ) -> Self
    where
        I: IntoIterator<Item = Place>,
    {
        let mut clusters = Self::default();
        for place in places {
            if predicate.is_open(&place, weekday, window) {
                clusters.cluster_mut(place.category).push(place);
            }
        }
        log::debug!(
            "clustered {} eateries and {} visits open {weekday} {window}",
            clusters.eatery.len(),
            clusters.visit.len()
        );
        clusters
    }

    /// The cluster holding places of `category`.
    #[must_use]
    pub fn cluster(&self, category: PlaceCategory) -> &[Place] {
        match category {
            PlaceCategory::Eatery => &self.eatery,
            PlaceCategory::Visit => &self.visit,
        }
    }

    fn cluster_mut(&mut self, category: PlaceCategory) -> &mut Vec<Place> {
        match category {
            PlaceCategory::Eatery => &mut self.eatery,
            PlaceCategory::Visit => &mut self.visit,
        }
    }

    /// Total number of places across both clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.eatery.len() + self.visit.len()
    }

    /// Whether both clusters are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.eatery.is_empty() && self.visit.is_empty()
    }
}
