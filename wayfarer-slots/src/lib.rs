//! Slot engine: find the best ways to fill one slot of a day.
//!
//! A slot is described by a [`SlotTag`](wayfarer_core::SlotTag) such as
//! `"EV"` (an eatery followed by a visit). The engine enumerates every
//! assignment of clustered places to the tag positions, discards those that
//! repeat a place or cannot be travelled within the slot, and keeps the
//! highest-scoring shortlist.
//!
//! [`SlotPipeline`] is the pure search. [`SlotPlanner`] wraps it with
//! request validation, a place source and a solution cache.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod candidate;
pub mod enumerator;
pub mod feasibility;
pub mod pipeline;
pub mod planner;
pub mod top_k;

pub use candidate::{CandidateBuilder, SlotCandidate};
pub use enumerator::CombinationEnumerator;
pub use feasibility::FeasibilityFilter;
pub use pipeline::{SearchStats, SlotPipeline};
pub use planner::{DEFAULT_RADIUS_M, SlotError, SlotPlanner, SlotPlannerConfig};
pub use top_k::{DISPLAY_LIMIT, TopKSelector, WINDOW_LIMIT};
