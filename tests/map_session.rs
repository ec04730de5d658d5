//! End-to-end map session scenarios through the `BusinessMap` orchestrator:
//! geolocation fallback, entity churn, selection flows, enrichment staleness
//! and provider-failure style swaps.

use async_trait::async_trait;
use std::time::Instant;
use tokomap::prelude::*;

struct DeniedGeolocation;

#[async_trait]
impl GeolocationProvider for DeniedGeolocation {
    async fn current_position(&self) -> Result<LocationFix> {
        Err(MapError::Geolocation("user denied the prompt".to_string()))
    }
}

struct FixedGeolocation(LocationFix);

#[async_trait]
impl GeolocationProvider for FixedGeolocation {
    async fn current_position(&self) -> Result<LocationFix> {
        Ok(self.0)
    }
}

fn entity(id: &str, lat: f64, lng: f64, place_id: Option<&str>) -> BusinessEntity {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": format!("Toko {id}"),
        "category": "grocery",
        "position": { "lat": lat, "lng": lng },
        "rating": 4.0,
        "review_count": 12,
        "place_id": place_id
    }))
    .unwrap()
}

fn fleet(n: usize) -> Vec<BusinessEntity> {
    (0..n)
        .map(|i| entity(&format!("b-{i}"), -6.2 - 0.005 * i as f64, 106.8 + 0.005 * i as f64, None))
        .collect()
}

fn new_map(now: Instant) -> BusinessMap {
    BusinessMap::new(SurfaceSize::new(800, 600), now).unwrap()
}

#[tokio::test]
async fn geolocation_denial_keeps_the_documented_default_center() {
    let now = Instant::now();
    let mut map = new_map(now);
    map.init_location(&DeniedGeolocation, now).await;

    let settled = now + constants::CENTER_ANIMATION;
    assert_eq!(map.view().center_at(settled), LatLng::new(-6.2088, 106.8456));
    assert_eq!(map.user_position(), LatLng::default_center());
}

#[tokio::test]
async fn geolocation_success_seeds_the_initial_center() {
    let now = Instant::now();
    let mut map = new_map(now);
    map.init_location(
        &FixedGeolocation(LocationFix {
            lat: -6.17,
            lng: 106.79,
            accuracy: Some(30.0),
        }),
        now,
    )
    .await;

    let settled = now + constants::CENTER_ANIMATION;
    map.tick(settled);
    assert_eq!(map.view().center_at(settled), LatLng::new(-6.17, 106.79));
}

#[test]
fn dropping_one_entity_removes_exactly_one_marker() {
    let now = Instant::now();
    let mut map = new_map(now);
    let list = fleet(5);
    map.set_entities(list.clone(), now).unwrap();
    assert_eq!(map.registry().len(), 5);

    let summary = map.set_entities(list[..4].to_vec(), now).unwrap();
    assert_eq!(summary.removed, 1);
    assert_eq!(summary.updated, 4);
    assert_eq!(summary.created, 0);
    assert!(map.registry().get("b-4").is_none());

    let want: Vec<String> = list[..4].iter().map(|e| e.id.clone()).collect();
    for id in want {
        assert!(map.registry().get(&id).is_some());
    }
}

#[test]
fn selecting_centers_on_the_entity_and_suppresses_bounds() {
    let now = Instant::now();
    let mut map = new_map(now);
    map.set_entities(fleet(3), now).unwrap();

    map.select(Some("b-2"), now).unwrap();
    let settled = now + constants::CENTER_ANIMATION;
    map.tick(settled);
    let center = map.view().center_at(settled);
    assert!((center.lat - (-6.21)).abs() < 1e-9);
    assert!((center.lng - 106.81).abs() < 1e-9);
    assert_eq!(map.view().zoom(), constants::SELECTION_ZOOM);
    assert!(map.registry().get("b-2").unwrap().selected);
}

#[test]
fn deselecting_refits_bounds_over_entities_and_user() {
    let now = Instant::now();
    let mut map = new_map(now);
    map.set_entities(fleet(3), now).unwrap();
    map.select(Some("b-0"), now).unwrap();

    let later = now + constants::CENTER_ANIMATION;
    map.tick(later);
    map.select(None, later).unwrap();

    let settled = later + constants::CENTER_ANIMATION;
    map.tick(settled);
    // The fitted view sits between the entity cluster and the user default,
    // well away from the previously selected entity, and zoomed out from
    // the selection zoom.
    assert!(map.view().zoom() < constants::SELECTION_ZOOM);
    let center = map.view().center_at(settled);
    assert!(center.lat > -6.21 && center.lat < -6.19);
}

#[test]
fn late_enrichment_response_reflects_only_the_last_selection() {
    let now = Instant::now();
    let mut map = new_map(now);
    map.set_entities(
        vec![
            entity("b-1", -6.2, 106.8, Some("place-a")),
            entity("b-2", -6.21, 106.81, Some("place-b")),
        ],
        now,
    )
    .unwrap();

    let ticket_a = map.select(Some("b-1"), now).unwrap().unwrap();
    let ticket_b = map.select(Some("b-2"), now).unwrap().unwrap();

    // A's response arrives after the selection moved on: discarded.
    let stale = PlaceDetails {
        title: Some("Toko A".to_string()),
        rating: Some(4.8),
        ..Default::default()
    };
    assert!(!map.complete_enrichment(&ticket_a, Ok(stale)));
    assert_eq!(*map.enrichment().state(), FetchState::Loading);

    let fresh = PlaceDetails {
        title: Some("Toko B".to_string()),
        ..Default::default()
    };
    assert!(map.complete_enrichment(&ticket_b, Ok(fresh)));
    match map.enrichment().state() {
        FetchState::Success(d) => assert_eq!(d.title.as_deref(), Some("Toko B")),
        other => panic!("unexpected state {other:?}"),
    }
}

#[test]
fn enrichment_failure_shows_error_without_leftover_data() {
    let now = Instant::now();
    let mut map = new_map(now);
    map.set_entities(
        vec![
            entity("b-1", -6.2, 106.8, Some("place-a")),
            entity("b-2", -6.21, 106.81, Some("place-b")),
        ],
        now,
    )
    .unwrap();

    let ticket = map.select(Some("b-1"), now).unwrap().unwrap();
    let details = PlaceDetails {
        title: Some("Toko A".to_string()),
        ..Default::default()
    };
    map.complete_enrichment(&ticket, Ok(details));

    let ticket = map.select(Some("b-2"), now).unwrap().unwrap();
    map.complete_enrichment(
        &ticket,
        Err(MapError::PlaceDetails("503 from search endpoint".to_string())),
    );
    match map.enrichment().state() {
        FetchState::Error(msg) => {
            assert!(!msg.contains("Toko A"));
            assert!(!msg.contains("503"));
        }
        other => panic!("unexpected state {other:?}"),
    }
}

#[test]
fn provider_failure_tears_down_and_rebuilds_markers_after_style_ready() {
    let now = Instant::now();
    let mut map = new_map(now);
    map.set_entities(fleet(4), now).unwrap();

    map.handle(
        RendererEvent::TileError {
            provider_key: "carto-light".to_string(),
        },
        now,
    )
    .unwrap();
    assert!(map.registry().is_swapping());
    assert!(map.registry().is_empty());

    // Entity updates during the swap are cached, not applied.
    let summary = map.set_entities(fleet(5), now).unwrap();
    assert!(summary.deferred);

    map.handle(
        RendererEvent::StyleReady {
            style_key: "osm".to_string(),
        },
        now,
    )
    .unwrap();
    assert!(!map.registry().is_swapping());
    assert_eq!(map.registry().len(), 5);
}
