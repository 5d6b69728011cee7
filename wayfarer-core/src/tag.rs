//! Slot type patterns.
//!
//! A tag such as `"EV"` describes the category of every event in a slot, in
//! order. Tags are validated once at the request boundary; downstream code
//! only ever sees a [`SlotTag`], so category dispatch is an exhaustive match
//! over [`PlaceCategory`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PlaceCategory;

/// Maximum number of events in one slot.
pub const MAX_TAG_LEN: usize = 4;

/// Errors returned by [`SlotTag::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// The pattern was empty.
    #[error("slot tag must not be empty")]
    Empty,
    /// The pattern had more than [`MAX_TAG_LEN`] symbols.
    #[error("slot tag has {len} symbols; at most {MAX_TAG_LEN} are allowed")]
    TooLong {
        /// Number of symbols supplied.
        len: usize,
    },
    /// A symbol other than `E` or `V` was found.
    #[error("slot tag symbol {symbol:?} at position {position} is not E or V")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Zero-based position of the character.
        position: usize,
    },
}

/// Validated, ordered sequence of event categories.
///
/// # Examples
/// ```
/// use wayfarer_core::{PlaceCategory, SlotTag};
///
/// let tag = SlotTag::parse("eVv")?;
/// assert_eq!(tag.len(), 3);
/// assert_eq!(tag.categories()[0], PlaceCategory::Eatery);
/// assert_eq!(tag.to_string(), "EVV");
/// # Ok::<(), wayfarer_core::TagError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTag {
    categories: Vec<PlaceCategory>,
}

impl SlotTag {
    /// Validate a tag string.
    ///
    /// The string is valid iff it is non-empty, has at most
    /// [`MAX_TAG_LEN`] characters and every character is `E` or `V` in
    /// either case.
    pub fn parse(raw: &str) -> Result<Self, TagError> {
        let len = raw.chars().count();
        if len == 0 {
            return Err(TagError::Empty);
        }
        if len > MAX_TAG_LEN {
            return Err(TagError::TooLong { len });
        }
        let categories = raw
            .chars()
            .enumerate()
            .map(|(position, symbol)| {
                PlaceCategory::from_symbol(symbol)
                    .ok_or(TagError::UnknownSymbol { symbol, position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { categories })
    }

    /// Build a tag from categories directly.
    pub fn from_categories(categories: Vec<PlaceCategory>) -> Result<Self, TagError> {
        if categories.is_empty() {
            return Err(TagError::Empty);
        }
        if categories.len() > MAX_TAG_LEN {
            return Err(TagError::TooLong {
                len: categories.len(),
            });
        }
        Ok(Self { categories })
    }

    /// Categories in slot order.
    #[must_use]
    pub fn categories(&self) -> &[PlaceCategory] {
        &self.categories
    }

    /// Number of events in the slot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always `false`; a validated tag has at least one symbol.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Returns `true` iff `raw` is a valid slot tag.
///
/// # Examples
/// ```
/// use wayfarer_core::is_valid_tag;
///
/// assert!(is_valid_tag("EVVE"));
/// assert!(!is_valid_tag("EVVEE"));
/// assert!(!is_valid_tag("EX"));
/// ```
#[must_use]
pub fn is_valid_tag(raw: &str) -> bool {
    SlotTag::parse(raw).is_ok()
}

impl FromStr for SlotTag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SlotTag {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SlotTag> for String {
    fn from(tag: SlotTag) -> Self {
        tag.to_string()
    }
}

impl fmt::Display for SlotTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.categories
            .iter()
            .try_for_each(|category| write!(f, "{}", category.symbol()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("E")]
    #[case("v")]
    #[case("EV")]
    #[case("eVvE")]
    #[case("VVVV")]
    fn accepts_valid_tags(#[case] raw: &str) {
        assert!(is_valid_tag(raw));
    }

    #[rstest]
    #[case("", TagError::Empty)]
    #[case("EVEVE", TagError::TooLong { len: 5 })]
    #[case("EX", TagError::UnknownSymbol { symbol: 'X', position: 1 })]
    #[case(" E", TagError::UnknownSymbol { symbol: ' ', position: 0 })]
    fn rejects_invalid_tags(#[case] raw: &str, #[case] expected: TagError) {
        assert_eq!(SlotTag::parse(raw), Err(expected));
    }

    #[rstest]
    fn per_category_counts_are_not_limited() {
        // Four eateries in one slot is allowed; only the total is bounded.
        assert!(is_valid_tag("EEEE"));
    }

    #[rstest]
    fn displays_upper_case_symbols() {
        let tag = SlotTag::parse("ev").expect("valid tag");
        assert_eq!(tag.to_string(), "EV");
    }

    #[rstest]
    fn serialises_as_string() {
        let tag = SlotTag::parse("VE").expect("valid tag");
        let json = serde_json::to_string(&tag).expect("serialise");
        assert_eq!(json, "\"VE\"");
        let back: SlotTag = serde_json::from_str("\"ve\"").expect("deserialise");
        assert_eq!(back, tag);
        assert!(serde_json::from_str::<SlotTag>("\"VX\"").is_err());
    }
}
