//! `city,country` request locations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by [`Location::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The text was not of the form `city,country`.
    #[error("location {raw:?} must have the form \"city,country\"")]
    Malformed {
        /// Text supplied by the caller.
        raw: String,
    },
}

/// A city within a country.
///
/// # Examples
/// ```
/// use wayfarer_core::Location;
///
/// let location: Location = "San Francisco, USA".parse()?;
/// assert_eq!(location.city, "San Francisco");
/// assert_eq!(location.country, "USA");
/// # Ok::<(), wayfarer_core::LocationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// City name.
    pub city: String,
    /// Country name or code.
    pub country: String,
}

impl Location {
    /// Parse `city,country`; both parts are trimmed and must be non-empty.
    pub fn parse(raw: &str) -> Result<Self, LocationError> {
        let malformed = || LocationError::Malformed {
            raw: raw.to_owned(),
        };
        let (city, country) = raw.split_once(',').ok_or_else(malformed)?;
        let (city_trimmed, country_trimmed) = (city.trim(), country.trim());
        if city_trimmed.is_empty() || country_trimmed.is_empty() || country_trimmed.contains(',')
        {
            return Err(malformed());
        }
        Ok(Self {
            city: city_trimmed.to_owned(),
            country: country_trimmed.to_owned(),
        })
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.city, self.country)
    }
}
