//! Materialise slot candidates from index tuples.

use wayfarer_core::{CategorizedPlaces, Place, SlotScorer, SlotSolutionCandidate, SlotTag};

/// A place-assigned instantiation of a tag.
///
/// Borrowed from the clusters it was built over. A candidate is invalid
/// when a place id repeats across positions, in either category, or when
/// its tuple did not fit the clusters; invalid candidates carry a zero
/// score and never reach the selector.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotCandidate<'a> {
    places: Vec<&'a Place>,
    score: f64,
    valid: bool,
}

impl<'a> SlotCandidate<'a> {
    const fn invalid(places: Vec<&'a Place>) -> Self {
        Self {
            places,
            score: 0.0,
            valid: false,
        }
    }

    /// Places in slot order. Truncated at the first repeat when invalid.
    #[must_use]
    pub fn places(&self) -> &[&'a Place] {
        &self.places
    }

    /// Score assigned by the slot scorer.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Whether every place in the candidate is distinct.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Copy the candidate into an owned, serialisable form.
    #[must_use]
    pub fn to_solution_candidate(&self) -> SlotSolutionCandidate {
        SlotSolutionCandidate {
            places: self.places.iter().map(|&place| place.clone()).collect(),
            score: self.score,
        }
    }
}

/// Resolves index tuples against clusters and scores them.
///
/// # Examples
/// ```
/// use wayfarer_core::{CategorizedPlaces, PlaceCategory, RatingScorer, SlotTag};
/// use wayfarer_core::test_support::place;
/// use wayfarer_slots::CandidateBuilder;
///
/// let clusters = CategorizedPlaces::new(
///     vec![place("a", PlaceCategory::Eatery, 4.0)],
///     vec![place("b", PlaceCategory::Visit, 5.0)],
/// );
/// let tag = SlotTag::parse("EV")?;
/// let builder = CandidateBuilder::new(&tag, &clusters, &RatingScorer);
/// let candidate = builder.build(&[0, 0]);
/// assert!(candidate.is_valid());
/// assert_eq!(candidate.score(), 4.5);
/// # Ok::<(), wayfarer_core::TagError>(())
/// ```
pub struct CandidateBuilder<'a, S: SlotScorer + ?Sized> {
    tag: &'a SlotTag,
    clusters: &'a CategorizedPlaces,
    scorer: &'a S,
}

impl<'a, S: SlotScorer + ?Sized> CandidateBuilder<'a, S> {
    /// Build candidates for `tag` over `clusters`, scored by `scorer`.
    pub const fn new(tag: &'a SlotTag, clusters: &'a CategorizedPlaces, scorer: &'a S) -> Self {
        Self {
            tag,
            clusters,
            scorer,
        }
    }

    /// Materialise the candidate addressed by `tuple`.
    ///
    /// A repeated place id, a tuple of the wrong length, or an index outside
    /// its cluster yields an invalid candidate.
    #[must_use]
    pub fn build(&self, tuple: &[usize]) -> SlotCandidate<'a> {
        let categories = self.tag.categories();
        let mut places: Vec<&'a Place> = Vec::with_capacity(categories.len());
        if tuple.len() != categories.len() {
            return SlotCandidate::invalid(places);
        }
        for (&category, &index) in categories.iter().zip(tuple) {
            let Some(place) = self.clusters.cluster(category).get(index) else {
                return SlotCandidate::invalid(places);
            };
            if places.iter().any(|used| used.id == place.id) {
                return SlotCandidate::invalid(places);
            }
            places.push(place);
        }
        let score = self.scorer.score(&places);
        SlotCandidate {
            places,
            score,
            valid: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use wayfarer_core::test_support::place;
    use wayfarer_core::{PlaceCategory, RatingScorer};

    #[fixture]
    fn clusters() -> CategorizedPlaces {
        CategorizedPlaces::new(
            vec![
                place("A", PlaceCategory::Eatery, 1.0),
                place("B", PlaceCategory::Eatery, 2.0),
                // Same provider id listed under both categories.
                place("shared", PlaceCategory::Eatery, 3.0),
            ],
            vec![
                place("C", PlaceCategory::Visit, 3.0),
                place("D", PlaceCategory::Visit, 4.0),
                place("shared", PlaceCategory::Visit, 3.0),
            ],
        )
    }

    fn ids<'a>(candidate: &SlotCandidate<'a>) -> Vec<&'a str> {
        candidate.places().iter().map(|&place| place.id.as_str()).collect()
    }

    #[rstest]
    #[case(&[0, 0], &["A", "C"])]
    #[case(&[0, 1], &["A", "D"])]
    #[case(&[1, 0], &["B", "C"])]
    #[case(&[1, 1], &["B", "D"])]
    fn resolves_places_by_category(
        clusters: CategorizedPlaces,
        #[case] tuple: &[usize],
        #[case] expected: &[&str],
    ) {
        let tag = SlotTag::parse("EV").expect("valid tag");
        let candidate = CandidateBuilder::new(&tag, &clusters, &RatingScorer).build(tuple);
        assert!(candidate.is_valid());
        assert_eq!(ids(&candidate), expected);
    }

    #[rstest]
    fn repeated_place_in_one_category_is_invalid(clusters: CategorizedPlaces) {
        let tag = SlotTag::parse("EE").expect("valid tag");
        let candidate = CandidateBuilder::new(&tag, &clusters, &RatingScorer).build(&[1, 1]);
        assert!(!candidate.is_valid());
        assert_eq!(candidate.score(), 0.0);
    }

    #[rstest]
    fn repeated_place_across_categories_is_invalid(clusters: CategorizedPlaces) {
        let tag = SlotTag::parse("EV").expect("valid tag");
        let candidate = CandidateBuilder::new(&tag, &clusters, &RatingScorer).build(&[2, 2]);
        assert!(!candidate.is_valid());
    }

    #[rstest]
    #[case(&[0])]
    #[case(&[0, 1, 0])]
    #[case(&[0, 9])]
    fn malformed_tuples_are_invalid(clusters: CategorizedPlaces, #[case] tuple: &[usize]) {
        let tag = SlotTag::parse("EV").expect("valid tag");
        let candidate = CandidateBuilder::new(&tag, &clusters, &RatingScorer).build(tuple);
        assert!(!candidate.is_valid());
    }

    #[rstest]
    fn scores_places_in_slot_order(clusters: CategorizedPlaces) {
        let tag = SlotTag::parse("VE").expect("valid tag");
        let candidate = CandidateBuilder::new(&tag, &clusters, &RatingScorer).build(&[1, 1]);
        assert!((candidate.score() - 3.0).abs() < 1e-9);
        let owned = candidate.to_solution_candidate();
        assert_eq!(owned.place_ids().collect::<Vec<_>>(), ["D", "B"]);
    }
}
