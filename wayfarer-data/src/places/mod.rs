//! HTTP place lookup against a Google-Places-compatible API.
//!
//! [`HttpPlaceSource`] implements [`wayfarer_core::PlaceSource`] by
//! geocoding the requested city, searching each provider place type around
//! it and enriching results with opening hours before clustering them.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use wayfarer_data::places::{HttpPlaceSource, HttpPlaceSourceConfig};
//!
//! let config = HttpPlaceSourceConfig::new("my-api-key")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let source = HttpPlaceSource::with_config(config)?;
//! # Ok::<(), wayfarer_data::places::ProviderBuildError>(())
//! ```

pub mod google;
mod provider;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpPlaceSource, HttpPlaceSourceConfig,
    MAX_SEARCH_RADIUS_M, ProviderBuildError, SEARCH_TYPES,
};
