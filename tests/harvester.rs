use chrono::{TimeZone, Utc};
use flickr_harvester::client::memory::Call;
use flickr_harvester::client::{GeoData, Owner, PhotoInfo, Place};
use flickr_harvester::{
    AccessCredentials, AuthToken, ConfigError, FlickrHarvester, HarvestError, Harvester,
    HarvesterConfig, InMemoryPhotoService, Observation,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn config(search_terms: &[&str]) -> HarvesterConfig {
    HarvesterConfig {
        credentials: AccessCredentials::new("api-key", "api-secret"),
        auth_token: AuthToken::new("token", "token-secret"),
        bbox_width: 2000.0,
        search_terms: search_terms.iter().map(|s| s.to_string()).collect(),
    }
}

fn photo(id: &str) -> PhotoInfo {
    PhotoInfo {
        id: id.to_string(),
        owner: Owner {
            nsid: "7@N07".to_string(),
            username: "harbourwatch".to_string(),
        },
        title: Some("High tide".to_string()),
        description: Some("Water on the promenade".to_string()),
        posted: Some(Utc.with_ymd_and_hms(2015, 11, 3, 9, 15, 0).unwrap()),
        taken: None,
        url: Some(format!("https://www.flickr.com/photos/harbourwatch/{}/", id)),
        tags: vec!["flood".to_string(), "harbour".to_string()],
        locality: Some(Place {
            id: Some("hamburg".to_string()),
            name: Some("Hamburg".to_string()),
        }),
    }
}

fn located() -> Option<GeoData> {
    Some(GeoData {
        longitude: 9.97,
        latitude: 53.54,
        accuracy: 16,
        locality: None,
    })
}

fn harvester_with(service: &Arc<InMemoryPhotoService>, terms: &[&str]) -> FlickrHarvester {
    FlickrHarvester::with_service(config(terms), service.clone())
}

#[tokio::test]
async fn tag_search_requires_a_tag() {
    let service = Arc::new(InMemoryPhotoService::new());
    let harvester = harvester_with(&service, &[]);

    let no_tags: [&str; 0] = [];
    let err = harvester.search_by_tags(&no_tags).await.unwrap_err();
    assert!(matches!(err, HarvestError::InvalidArgument(_)));
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn tag_search_is_not_geolocated() {
    let service = Arc::new(InMemoryPhotoService::new().with_page(vec![(photo("1"), located())]));
    let harvester = harvester_with(&service, &[]);

    let result = harvester.search_by_tags(&["flood", "harbour"]).await.unwrap();
    assert_eq!(result.len(), 1);

    match &service.calls()[0] {
        Call::Search { params, page, .. } => {
            assert_eq!(*page, 1);
            assert_eq!(params.tags, vec!["flood", "harbour"]);
            assert!(params.match_all_tags);
            assert!(params.bbox.is_none());
            assert!(!params.has_geo);
        }
        other => panic!("expected a search call, got {:?}", other),
    }
}

#[tokio::test]
async fn tag_search_deduplicates() {
    let service = Arc::new(
        InMemoryPhotoService::new()
            .with_page(vec![(photo("1"), located()), (photo("2"), located())])
            .with_page(vec![(photo("1"), located())]),
    );
    let harvester = harvester_with(&service, &[]);

    let result = harvester.search_by_tags(&["flood"]).await.unwrap();
    assert_eq!(service.searched_pages(), vec![1, 2]);
    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn location_search_sends_centered_box_and_time_range() {
    let service = Arc::new(InMemoryPhotoService::new().with_page(vec![(photo("1"), located())]));
    let harvester = harvester_with(&service, &[]);
    let start = Utc.with_ymd_and_hms(2015, 11, 1, 0, 0, 0).unwrap();

    let result = harvester
        .search_by_location_and_time(53.54, 9.97, Some(start), None)
        .await
        .unwrap();
    assert_eq!(result.len(), 1);

    let observation = &result[0];
    assert_eq!(observation.phenomenon_time(), observation.result_time());
    assert_eq!(observation.location().place_name, "Hamburg");
    assert_eq!(
        observation.result(),
        "TITLE: High tide; CAPTION: Water on the promenade; TAGS: [flood, harbour]; "
    );

    match &service.calls()[0] {
        Call::Search { params, .. } => {
            let bbox = params.bbox.expect("location search must send a bbox");
            assert!(params.has_geo);
            assert!(params.tags.is_empty());
            assert!(bbox.min_lon < bbox.max_lon);
            assert!(bbox.min_lat < bbox.max_lat);
            assert!(((bbox.min_lat + bbox.max_lat) / 2.0 - 53.54).abs() < 1e-9);
            assert!(((bbox.min_lon + bbox.max_lon) / 2.0 - 9.97).abs() < 1e-9);
            assert_eq!(params.min_taken_date, Some(start));
            assert_eq!(params.max_taken_date, None);
        }
        other => panic!("expected a search call, got {:?}", other),
    }
}

#[tokio::test]
async fn location_search_without_geo_hits_is_empty() {
    let service = Arc::new(
        InMemoryPhotoService::new().with_page(vec![(photo("1"), None), (photo("2"), None)]),
    );
    let harvester = harvester_with(&service, &[]);

    let result = harvester.search_by_location(53.54, 9.97).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn provider_failure_is_a_decoding_error() {
    let service = Arc::new(
        InMemoryPhotoService::new()
            .with_page(vec![(photo("1"), located())])
            .failing_on("1"),
    );
    let harvester = harvester_with(&service, &[]);

    let err = harvester.search_by_location(53.54, 9.97).await.unwrap_err();
    assert!(matches!(err, HarvestError::Decoding(_)));
}

#[tokio::test]
async fn ids_are_validated_before_fetching() {
    let service = Arc::new(InMemoryPhotoService::new().with_photo(photo("100"), located()));
    let harvester = harvester_with(&service, &[]);

    let none: [&str; 0] = [];
    assert!(matches!(
        harvester.get_by_ids(&none).await,
        Err(HarvestError::InvalidArgument(_))
    ));

    match harvester.get_by_ids(&["100", "abc"]).await {
        Err(HarvestError::IdParse { id, .. }) => assert_eq!(id, "abc"),
        other => panic!("expected an id parse error, got {:?}", other),
    }
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn ids_are_looked_up() {
    let service = Arc::new(
        InMemoryPhotoService::new()
            .with_photo(photo("100"), located())
            .with_photo(photo("101"), None),
    );
    let harvester = harvester_with(&service, &[]);

    let result = harvester.get_by_ids(&["100", "101", "100"]).await.unwrap();
    assert_eq!(result.len(), 1);
    assert!(result.iter().all(|o| o.identifier() == "100"));
    assert!(service.calls().contains(&Call::Geo("101".to_string())));
}

#[tokio::test]
async fn configured_terms_drive_a_tag_search() {
    let service = Arc::new(InMemoryPhotoService::new().with_page(vec![(photo("1"), located())]));
    let harvester = harvester_with(&service, &["flood", "harbour"]);

    assert!(harvester.has_configured_search_terms());
    let result = harvester.harvest_search_terms().await.unwrap();
    assert_eq!(result.len(), 1);

    match &service.calls()[0] {
        Call::Search { params, .. } => assert_eq!(params.tags, vec!["flood", "harbour"]),
        other => panic!("expected a search call, got {:?}", other),
    }
}

#[tokio::test]
async fn usable_through_the_harvester_trait() {
    let service = Arc::new(InMemoryPhotoService::new().with_photo(photo("100"), located()));
    let harvester: Box<dyn Harvester> = Box::new(harvester_with(&service, &["flood"]));

    assert_eq!(harvester.source_name(), "Flickr");
    assert_eq!(harvester.search_terms(), ["flood".to_string()]);

    let result = harvester.get_by_ids(&["100".to_string()]).await.unwrap();
    assert_eq!(result.len(), 1);
}

#[test]
fn harvester_loads_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flickr_credentials.toml");
    fs::write(
        &path,
        r#"
ACCESS_TOKEN = "api-key"
ACCESS_TOKEN_SECRET = "api-secret"
OAUTH_CONSUMER_KEY = "token"
OAUTH_CONSUMER_SECRET = "token-secret"
QUADRATICAL_BBOX_WIDTH = "1500"
SEARCH_TERMS = "flood,storm"
"#,
    )
    .unwrap();

    let harvester = FlickrHarvester::from_config_file(&path).unwrap();
    assert_eq!(harvester.credentials().api_key(), "api-key");
    assert_eq!(harvester.auth_token().token(), "token");
    assert_eq!(harvester.bbox_width(), 1500.0);
    assert_eq!(harvester.search_terms(), ["flood".to_string(), "storm".to_string()]);
}

#[test]
fn harvester_refuses_bad_config() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        FlickrHarvester::from_config_file(&missing),
        Err(HarvestError::Config(ConfigError::Read { .. }))
    ));

    let bad_width = dir.path().join("bad.toml");
    fs::write(
        &bad_width,
        r#"
ACCESS_TOKEN = "a"
ACCESS_TOKEN_SECRET = "b"
OAUTH_CONSUMER_KEY = "c"
OAUTH_CONSUMER_SECRET = "d"
QUADRATICAL_BBOX_WIDTH = "one mile"
"#,
    )
    .unwrap();
    assert!(matches!(
        FlickrHarvester::from_config_file(&bad_width),
        Err(HarvestError::Config(ConfigError::InvalidWidth(_)))
    ));
}
