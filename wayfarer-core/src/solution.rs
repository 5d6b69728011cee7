//! Slot solutions returned to callers and stored in caches.

use serde::{Deserialize, Serialize};

use crate::{Place, SlotTag};

/// One scored, place-assigned instantiation of a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSolutionCandidate {
    /// Places in slot order.
    pub places: Vec<Place>,
    /// Score assigned by the slot scorer.
    pub score: f64,
}

impl SlotSolutionCandidate {
    /// Place identifiers in slot order.
    pub fn place_ids(&self) -> impl Iterator<Item = &str> {
        self.places.iter().map(|place| place.id.as_str())
    }
}

/// The shortlist computed for one slot request.
///
/// Candidates are ordered best first. An empty list means no candidate was
/// feasible, which is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSolution {
    /// Tag the candidates instantiate.
    pub tag: SlotTag,
    /// Up to the display limit of candidates, best first.
    pub candidates: Vec<SlotSolutionCandidate>,
}

impl SlotSolution {
    /// Create a solution with no candidates.
    #[must_use]
    pub const fn empty(tag: SlotTag) -> Self {
        Self {
            tag,
            candidates: Vec::new(),
        }
    }

    /// Whether no candidate was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The highest-scoring candidate, if any.
    #[must_use]
    pub fn best(&self) -> Option<&SlotSolutionCandidate> {
        self.candidates.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlaceCategory;
    use geo::Coord;
    use rstest::rstest;

    #[rstest]
    fn serialises_tag_as_text() {
        let tag = SlotTag::parse("EV").expect("valid tag");
        let solution = SlotSolution {
            tag,
            candidates: vec![SlotSolutionCandidate {
                places: vec![
                    Place::new("a", "A", Coord { x: 1.0, y: 2.0 }, PlaceCategory::Eatery),
                    Place::new("b", "B", Coord { x: 3.0, y: 4.0 }, PlaceCategory::Visit),
                ],
                score: 4.5,
            }],
        };
        let json = serde_json::to_value(&solution).expect("serialise");
        assert_eq!(json["tag"], "EV");
        assert_eq!(json["candidates"][0]["places"][1]["category"], "visit");

        let back: SlotSolution = serde_json::from_value(json).expect("deserialise");
        assert_eq!(back, solution);
        let best = back.best().expect("one candidate");
        assert_eq!(best.place_ids().collect::<Vec<_>>(), ["a", "b"]);
    }
}
