//! Place enrichment: supplementary details for a selected business.
//!
//! Fetches run against an external search endpoint keyed by an opaque place
//! id. Responses for a place the user has already navigated away from are
//! logically cancelled: the id captured at request time is compared against
//! the currently-requested id before any state is committed, so a slow
//! response can never overwrite a newer selection.

use crate::core::geo::LatLng;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Enrichment record for one place. Every field is optional: absent
/// response fields stay absent instead of defaulting to misleading values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub position: Option<LatLng>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub opening_hours: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
}

/// Lifecycle of one enrichment request.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Idle,
    Loading,
    Success(PlaceDetails),
    Error(String),
}

/// Captures the id a request was made for; `complete` refuses tickets whose
/// id no longer matches the current request.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    place_id: String,
}

impl FetchTicket {
    pub fn place_id(&self) -> &str {
        &self.place_id
    }
}

/// Seam over the place-details endpoint.
#[async_trait]
pub trait PlaceClient: Send + Sync {
    async fn fetch_details(&self, place_id: &str) -> Result<PlaceDetails>;
}

/// `reqwest`-backed client: GET `{base_url}/{place_id}`, JSON body mapped
/// through serde.
pub struct HttpPlaceClient {
    base_url: String,
}

impl HttpPlaceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PlaceClient for HttpPlaceClient {
    async fn fetch_details(&self, place_id: &str) -> Result<PlaceDetails> {
        let url = format!("{}/{}", self.base_url, place_id);
        let resp = crate::tiles::fetch::HTTP_CLIENT
            .get(&url)
            .send()
            .await?
            .error_for_status()?;
        let details = resp.json::<PlaceDetails>().await?;
        Ok(details)
    }
}

pub struct PlaceEnrichmentService {
    state: FetchState,
    /// Id of the request whose result we are willing to commit.
    current: Option<String>,
}

impl Default for PlaceEnrichmentService {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceEnrichmentService {
    pub fn new() -> Self {
        Self {
            state: FetchState::Idle,
            current: None,
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn current_place_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Starts a fetch for `place_id`. Passing `None` (deselection, or an
    /// entity without a place id) clears to `Idle`. Any state from a prior
    /// selection is dropped immediately so it cannot bleed into the panel.
    pub fn begin(&mut self, place_id: Option<&str>) -> Option<FetchTicket> {
        match place_id {
            Some(id) => {
                self.current = Some(id.to_string());
                self.state = FetchState::Loading;
                Some(FetchTicket {
                    place_id: id.to_string(),
                })
            }
            None => {
                self.clear();
                None
            }
        }
    }

    /// Commits a finished fetch. Returns `false` when the result was stale
    /// (a different id has been requested since) and was discarded.
    pub fn complete(&mut self, ticket: &FetchTicket, outcome: Result<PlaceDetails>) -> bool {
        if self.current.as_deref() != Some(ticket.place_id.as_str()) {
            log::debug!("stale place details for '{}' discarded", ticket.place_id);
            return false;
        }
        self.state = match outcome {
            Ok(details) => FetchState::Success(details),
            Err(e) => {
                log::warn!("place details for '{}' failed: {e}", ticket.place_id);
                FetchState::Error("place details are unavailable right now".to_string())
            }
        };
        true
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.state = FetchState::Idle;
    }
}

/// Convenience driver: begin, fetch, complete. All fetch/parse failures
/// resolve into `FetchState::Error`; nothing escapes.
pub async fn enrich(
    service: &mut PlaceEnrichmentService,
    client: &dyn PlaceClient,
    place_id: &str,
) {
    if let Some(ticket) = service.begin(Some(place_id)) {
        let outcome = client.fetch_details(place_id).await;
        service.complete(&ticket, outcome);
    }
}
