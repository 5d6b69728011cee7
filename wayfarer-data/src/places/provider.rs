//! HTTP-based `PlaceSource` over a Google-Places-compatible API.
//!
//! A lookup runs in four steps:
//!
//! 1. geocode `city,country` to a centre point;
//! 2. run one nearby search per provider place type around the centre;
//! 3. drop repeated place ids, keeping the first occurrence;
//! 4. fetch opening hours concurrently for results that lack them.
//!
//! The assembled pool is then filtered with [`WeeklyHours`] and split into
//! eatery and visit clusters. With a [`PlaceCache`] attached, the centre
//! and each category's enriched pool are read from the cache first and
//! written back after a fresh fetch.
//!
//! # Example
//!
//! ```no_run
//! use wayfarer_core::{Location, PlaceQuery, PlaceSource, TimeInterval, Weekday};
//! use wayfarer_data::places::HttpPlaceSource;
//!
//! let source = HttpPlaceSource::new("my-api-key")?;
//! let query = PlaceQuery {
//!     location: Location::parse("Paris,France")?,
//!     radius: 2000,
//!     weekday: Weekday::Saturday,
//!     interval: TimeInterval::new(10, 14)?,
//! };
//! let clusters = source.categorized_places(&query)?;
//! println!("{} eateries", clusters.eatery.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashSet;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;
use wayfarer_core::{
    CacheError, CategorizedPlaces, Location, Place, PlaceCache, PlaceCacheKey, PlaceCategory,
    PlaceQuery, PlaceSource, PlaceSourceError, WeeklyHours,
};

use super::google::{
    DetailsResponse, GeocodeResponse, LatLng, NearbySearchResponse, PlaceResult, status_is_ok,
};

/// Error type for [`HttpPlaceSource`] construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// The base URL could not be parsed or cannot carry a path.
    BaseUrl(String),
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BaseUrl(url) => write!(f, "invalid places API base URL {url:?}"),
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BaseUrl(_) => None,
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
        }
    }
}

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default user agent for places requests.
pub const DEFAULT_USER_AGENT: &str = "wayfarer-places/0.1";

/// Largest radius, in metres, sent to the nearby-search endpoint.
pub const MAX_SEARCH_RADIUS_M: u32 = 16_000;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Provider place types searched for each category, in search order.
pub const SEARCH_TYPES: [(&str, PlaceCategory); 6] = [
    ("cafe", PlaceCategory::Eatery),
    ("restaurant", PlaceCategory::Eatery),
    ("park", PlaceCategory::Visit),
    ("amusement_park", PlaceCategory::Visit),
    ("art_gallery", PlaceCategory::Visit),
    ("museum", PlaceCategory::Visit),
];

/// Configuration for [`HttpPlaceSource`].
#[derive(Clone)]
pub struct HttpPlaceSourceConfig {
    /// API root, e.g. [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Key appended to every request.
    pub api_key: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for HttpPlaceSourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPlaceSourceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for HttpPlaceSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpPlaceSourceConfig {
    /// Create a configuration for the default API root using `api_key`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Place source backed by the places HTTP API.
///
/// The synchronous [`PlaceSource`] trait is implemented by blocking on the
/// async requests. The source owns a `current_thread` Tokio runtime that is
/// reused across calls. When called from inside a multi-threaded Tokio
/// runtime it blocks on that runtime's handle via
/// [`tokio::task::block_in_place`] instead; calling it from inside a
/// `current_thread` runtime is not supported.
pub struct HttpPlaceSource {
    client: Client,
    base: Url,
    config: HttpPlaceSourceConfig,
    runtime: Runtime,
    cache: Option<Box<dyn PlaceCache>>,
}

impl std::fmt::Debug for HttpPlaceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPlaceSource")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl HttpPlaceSource {
    /// Create a source for the default API root.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpPlaceSourceConfig::new(api_key))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: HttpPlaceSourceConfig) -> Result<Self, ProviderBuildError> {
        let base = Url::parse(config.base_url.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ProviderBuildError::BaseUrl(config.base_url.clone()))?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            base,
            config,
            runtime,
            cache: None,
        })
    }

    /// Answer repeated lookups from `cache` and store fresh results in it.
    ///
    /// Cache failures are logged and treated as misses.
    #[must_use]
    pub fn with_cache(mut self, cache: impl PlaceCache + 'static) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    /// Configuration the source was built with.
    #[must_use]
    pub const fn config(&self) -> &HttpPlaceSourceConfig {
        &self.config
    }

    /// Build `{base_url}/{path}?{params}&key={api_key}`.
    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.split('/'));
        }
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("key", &self.config.api_key);
        url
    }

    fn geocode_url(&self, location: &Location) -> Url {
        let components = format!("locality:{}|country:{}", location.city, location.country);
        self.endpoint("geocode/json", &[("components", components.as_str())])
    }

    fn nearby_url(&self, centre: LatLng, radius: u32, place_type: &str) -> Url {
        let location = centre.query_value();
        let capped = radius.min(MAX_SEARCH_RADIUS_M).to_string();
        self.endpoint(
            "place/nearbysearch/json",
            &[
                ("location", location.as_str()),
                ("radius", capped.as_str()),
                ("rankby", "prominence"),
                ("type", place_type),
            ],
        )
    }

    fn details_url(&self, place_id: &str) -> Url {
        self.endpoint(
            "place/details/json",
            &[("place_id", place_id), ("fields", "opening_hours")],
        )
    }

    /// GET `url` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, PlaceSourceError> {
        let path = url.path().to_owned();
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(convert_reqwest_error)?
            .error_for_status()
            .map_err(convert_reqwest_error)?;
        let body = response
            .json::<T>()
            .await
            .map_err(|err| PlaceSourceError::Parse {
                message: err.without_url().to_string(),
            })?;
        log::debug!("GET {path} completed in {:?}", started.elapsed());
        Ok(body)
    }

    async fn geocode(&self, location: &Location) -> Result<LatLng, PlaceSourceError> {
        let response: GeocodeResponse = self.get_json(self.geocode_url(location)).await?;
        check_status(&response.status, response.error_message.as_deref())?;
        response
            .first_location()
            .ok_or_else(|| PlaceSourceError::Geocode {
                location: location.to_string(),
            })
    }

    async fn nearby(
        &self,
        centre: LatLng,
        radius: u32,
        place_type: &str,
    ) -> Result<Vec<PlaceResult>, PlaceSourceError> {
        let started = Instant::now();
        let response: NearbySearchResponse = self
            .get_json(self.nearby_url(centre, radius, place_type))
            .await?;
        check_status(&response.status, response.error_message.as_deref())?;
        log::info!(
            "nearby search for {place_type} returned {} results in {:?}",
            response.results.len(),
            started.elapsed()
        );
        Ok(response.results)
    }

    async fn weekday_text(&self, place_id: &str) -> Result<Vec<String>, PlaceSourceError> {
        let response: DetailsResponse = self.get_json(self.details_url(place_id)).await?;
        check_status(&response.status, response.error_message.as_deref())?;
        Ok(response.into_weekday_text())
    }

    /// Read from the attached cache; failures count as misses.
    fn cached<T>(
        &self,
        read: impl FnOnce(&dyn PlaceCache) -> Result<Option<T>, CacheError>,
    ) -> Option<T> {
        let cache = self.cache.as_deref()?;
        read(cache)
            .inspect_err(|err| log::warn!("place cache read failed: {err}"))
            .ok()
            .flatten()
    }

    fn store(&self, write: impl FnOnce(&dyn PlaceCache) -> Result<(), CacheError>) {
        let Some(cache) = self.cache.as_deref() else {
            return;
        };
        if let Err(err) = write(cache) {
            log::warn!("place cache write failed: {err}");
        }
    }

    async fn centre(&self, location: &Location) -> Result<LatLng, PlaceSourceError> {
        if let Some(coord) = self.cached(|cache| cache.geocode(location)) {
            log::debug!("geocode cache hit for {location}");
            return Ok(LatLng::from_coord(coord));
        }
        let centre = self.geocode(location).await?;
        self.store(|cache| cache.put_geocode(location, centre.to_coord()));
        Ok(centre)
    }

    /// Enriched pool for one category, from the cache when present.
    async fn category_places(
        &self,
        query: &PlaceQuery,
        centre: LatLng,
        category: PlaceCategory,
    ) -> Result<Vec<Place>, PlaceSourceError> {
        let radius = query.radius.min(MAX_SEARCH_RADIUS_M);
        let key = PlaceCacheKey::new(&query.location, radius, category);
        if let Some(places) = self.cached(|cache| cache.places(&key)) {
            log::debug!("place cache hit for {}", key.storage_key());
            return Ok(places);
        }
        let places = self.search_category(centre, radius, category).await?;
        self.store(|cache| cache.put_places(&key, &places));
        Ok(places)
    }

    /// Search every provider type of `category` and enrich the results.
    async fn search_category(
        &self,
        centre: LatLng,
        radius: u32,
        category: PlaceCategory,
    ) -> Result<Vec<Place>, PlaceSourceError> {
        let searches = SEARCH_TYPES
            .into_iter()
            .filter(|&(_, searched)| searched == category)
            .map(|(place_type, _)| self.nearby(centre, radius, place_type));

        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for outcome in join_all(searches).await {
            for result in outcome? {
                if seen.insert(result.place_id.clone()) {
                    found.push(result);
                }
            }
        }

        let lookups = found.iter().map(|result| async move {
            if result.has_weekday_text() {
                return None;
            }
            self.weekday_text(&result.place_id)
                .await
                .inspect_err(|err| {
                    log::warn!("opening hours lookup for {} failed: {err}", result.place_id);
                })
                .ok()
        });
        let enriched = join_all(lookups).await;

        Ok(found
            .into_iter()
            .zip(enriched)
            .map(|(result, hours)| {
                let mut place = result.into_place(category);
                if let Some(text) = hours {
                    place.opening_hours = text.into_iter().collect();
                }
                place
            })
            .collect())
    }

    /// Geocode, search and enrich without filtering.
    async fn fetch_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, PlaceSourceError> {
        let centre = self.centre(&query.location).await?;
        let pools = [PlaceCategory::Eatery, PlaceCategory::Visit]
            .map(|category| self.category_places(query, centre, category));

        let mut seen = HashSet::new();
        let mut pool = Vec::new();
        for outcome in join_all(pools).await {
            for place in outcome? {
                if seen.insert(place.id.clone()) {
                    pool.push(place);
                }
            }
        }
        log::info!(
            "found {} distinct places around {}",
            pool.len(),
            query.location
        );
        Ok(pool)
    }
}

/// Map an application status to an error unless it reports success.
fn check_status(status: &str, message: Option<&str>) -> Result<(), PlaceSourceError> {
    if status_is_ok(status) {
        return Ok(());
    }
    Err(PlaceSourceError::Service {
        code: status.to_owned(),
        message: message.unwrap_or_default().to_owned(),
    })
}

/// Convert a reqwest error to a `PlaceSourceError`.
///
/// The URL is stripped first because it carries the API key.
fn convert_reqwest_error(error: reqwest::Error) -> PlaceSourceError {
    let stripped = error.without_url();
    if stripped.is_timeout() {
        return PlaceSourceError::Timeout {
            message: stripped.to_string(),
        };
    }

    if let Some(status) = stripped.status() {
        return PlaceSourceError::Http {
            status: status.as_u16(),
            message: stripped.to_string(),
        };
    }

    PlaceSourceError::Network {
        message: stripped.to_string(),
    }
}

impl PlaceSource for HttpPlaceSource {
    /// Fetch, enrich and cluster places for `query`.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded (`flavor = "multi_thread"`).
    fn categorized_places(
        &self,
        query: &PlaceQuery,
    ) -> Result<CategorizedPlaces, PlaceSourceError> {
        let future = self.fetch_places(query);
        let places = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }?;
        Ok(CategorizedPlaces::from_open_places(
            places,
            &WeeklyHours,
            query.weekday,
            query.interval,
        ))
    }
}
