#![expect(
    clippy::expect_used,
    reason = "runtime tests use expect for readable failures"
)]

//! Calling [`HttpPlaceSource`] with and without an ambient Tokio runtime.

mod support;

use std::sync::Arc;

use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use support::{FakePlacesApi, details, geocode_ok, query_param, search_page, search_result};
use tempfile::TempDir;
use geo::Coord;
use wayfarer_core::{
    CacheError, Location, MemoryPlaceCache, Place, PlaceCache, PlaceCacheKey, PlaceQuery,
    PlaceSource, PlaceSourceError, TimeInterval, Weekday,
};
use wayfarer_data::SqlitePlaceCache;
use wayfarer_data::places::{HttpPlaceSource, HttpPlaceSourceConfig};

fn one_of_each(target: &str) -> (u16, String) {
    if target.contains("/geocode/json") {
        return (200, geocode_ok());
    }
    if target.contains("/place/details/json") {
        return (200, details("Sunday: Open 24 hours"));
    }
    let results = match query_param(target, "type").as_deref() {
        Some("cafe") => vec![search_result("cafe", 4.0, None)],
        Some("park") => vec![search_result("park", 4.5, None)],
        _ => Vec::new(),
    };
    (200, search_page(&results))
}

#[fixture]
fn api() -> FakePlacesApi {
    FakePlacesApi::start(one_of_each)
}

#[fixture]
fn query() -> PlaceQuery {
    PlaceQuery {
        location: Location::parse("Paris,France").expect("valid location"),
        radius: 1000,
        weekday: Weekday::Sunday,
        interval: TimeInterval { start: 9, end: 17 },
    }
}

fn source_for(api: &FakePlacesApi) -> HttpPlaceSource {
    let config = HttpPlaceSourceConfig::new("test-key").with_base_url(api.base_url());
    HttpPlaceSource::with_config(config).expect("source builds")
}

#[rstest]
fn blocks_on_its_own_runtime(api: FakePlacesApi, query: PlaceQuery) {
    let source = source_for(&api);

    let clusters = source.categorized_places(&query).expect("lookup succeeds");

    assert_eq!(clusters.eatery.len(), 1);
    assert_eq!(clusters.visit.len(), 1);
    assert_eq!(api.requests_to("/place/details/json").len(), 2);
}

#[rstest]
fn blocks_in_place_inside_a_multi_thread_runtime(api: FakePlacesApi, query: PlaceQuery) {
    let source = source_for(&api);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("runtime builds");

    let clusters = runtime
        .block_on(async { source.categorized_places(&query) })
        .expect("lookup succeeds");

    assert_eq!(clusters.len(), 2);
}

#[rstest]
fn every_request_carries_the_key(api: FakePlacesApi, query: PlaceQuery) {
    let source = source_for(&api);
    let clusters = source.categorized_places(&query).expect("lookup succeeds");
    assert!(!clusters.is_empty());

    let requests = api.requests();
    assert!(!requests.is_empty());
    assert!(
        requests
            .iter()
            .all(|target| query_param(target, "key").as_deref() == Some("test-key"))
    );
}

#[rstest]
fn repeated_lookups_are_answered_from_the_place_cache(api: FakePlacesApi, query: PlaceQuery) {
    let cache = Arc::new(MemoryPlaceCache::new());
    let source = source_for(&api).with_cache(Arc::clone(&cache));

    let first = source.categorized_places(&query).expect("first lookup succeeds");
    let made = api.requests().len();
    assert_eq!(api.requests_to("/geocode/json").len(), 1);
    assert_eq!(cache.pool_count(), 2);

    let second = source.categorized_places(&query).expect("second lookup succeeds");
    assert_eq!(second, first);
    assert_eq!(api.requests().len(), made);
}

#[rstest]
fn a_wider_radius_searches_again_but_reuses_the_centre(api: FakePlacesApi, query: PlaceQuery) {
    let source = source_for(&api).with_cache(MemoryPlaceCache::new());
    source.categorized_places(&query).expect("first lookup succeeds");
    let searches = api.requests_to("/place/nearbysearch/json").len();

    let wider = PlaceQuery {
        radius: query.radius * 2,
        ..query
    };
    source.categorized_places(&wider).expect("second lookup succeeds");

    assert_eq!(api.requests_to("/geocode/json").len(), 1);
    assert_eq!(
        api.requests_to("/place/nearbysearch/json").len(),
        searches * 2
    );
}

#[rstest]
fn a_new_source_reuses_the_sqlite_place_cache(api: FakePlacesApi, query: PlaceQuery) {
    let dir = TempDir::new().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("places.db")).expect("utf-8 path");
    {
        let cache = SqlitePlaceCache::open(&path).expect("open cache");
        let source = source_for(&api).with_cache(cache);
        source.categorized_places(&query).expect("first lookup succeeds");
    }
    let made = api.requests().len();

    let cache = SqlitePlaceCache::open(&path).expect("reopen cache");
    let source = source_for(&api).with_cache(cache);
    let clusters = source.categorized_places(&query).expect("cached lookup succeeds");

    assert_eq!(clusters.len(), 2);
    assert_eq!(api.requests().len(), made);
}

/// Place cache whose backend is always down.
struct UnavailableCache;

fn unavailable() -> CacheError {
    CacheError::Backend {
        message: "offline".to_owned(),
    }
}

impl PlaceCache for UnavailableCache {
    fn geocode(&self, _location: &Location) -> Result<Option<Coord<f64>>, CacheError> {
        Err(unavailable())
    }

    fn put_geocode(&self, _location: &Location, _centre: Coord<f64>) -> Result<(), CacheError> {
        Err(unavailable())
    }

    fn places(&self, _key: &PlaceCacheKey) -> Result<Option<Vec<Place>>, CacheError> {
        Err(unavailable())
    }

    fn put_places(&self, _key: &PlaceCacheKey, _places: &[Place]) -> Result<(), CacheError> {
        Err(unavailable())
    }
}

#[rstest]
fn cache_failures_fall_back_to_the_api(api: FakePlacesApi, query: PlaceQuery) {
    let source = source_for(&api).with_cache(UnavailableCache);

    let clusters = source.categorized_places(&query).expect("lookup succeeds");

    assert_eq!(clusters.len(), 2);
    assert_eq!(api.requests_to("/geocode/json").len(), 1);
}

#[rstest]
fn unreachable_service_is_a_network_error(query: PlaceQuery) {
    // Nothing listens on the discard port.
    let config =
        HttpPlaceSourceConfig::new("test-key").with_base_url("http://127.0.0.1:9/maps/api");
    let source = HttpPlaceSource::with_config(config).expect("source builds");

    let err = source
        .categorized_places(&query)
        .expect_err("nothing is listening");

    assert!(matches!(
        err,
        PlaceSourceError::Network { .. } | PlaceSourceError::Timeout { .. }
    ));
}
