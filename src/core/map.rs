//! The `BusinessMap` orchestrator.
//!
//! Owns one of each component and routes domain messages between them. It is
//! the single writer of the view and the marker set; the embedding UI talks
//! to it through entity lists, selection ids and renderer events, and hears
//! back through the selection callback.

use crate::core::constants::DEFAULT_ZOOM;
use crate::core::geo::LatLng;
use crate::core::view::{MapViewController, SurfaceSize};
use crate::entity::BusinessEntity;
use crate::events::{translate, DomainMessage, RendererEvent};
use crate::location::{GeolocationProvider, UserLocationTracker};
use crate::markers::registry::{MarkerRegistry, ReconcileSummary};
use crate::places::{FetchTicket, PlaceEnrichmentService};
use crate::tiles::fallback::TileProviderManager;
use crate::Result;
use std::time::Instant;

type SelectionCallback = Box<dyn Fn(Option<&str>) + Send>;

pub struct BusinessMap {
    view: MapViewController,
    registry: MarkerRegistry,
    providers: TileProviderManager,
    enrichment: PlaceEnrichmentService,
    tracker: UserLocationTracker,
    entities: Vec<BusinessEntity>,
    selected: Option<String>,
    on_selection_change: Option<SelectionCallback>,
}

impl BusinessMap {
    /// Fails only on a zero-area surface (`MapError::MapInit`); that is the
    /// terminal error the embedding UI surfaces with a manual retry.
    pub fn new(size: SurfaceSize, now: Instant) -> Result<Self> {
        Ok(Self {
            view: MapViewController::new(size, LatLng::default_center(), now)?,
            registry: MarkerRegistry::new(),
            providers: TileProviderManager::with_default_chain(),
            enrichment: PlaceEnrichmentService::new(),
            tracker: UserLocationTracker::new(),
            entities: Vec::new(),
            selected: None,
            on_selection_change: None,
        })
    }

    pub fn with_providers(mut self, providers: TileProviderManager) -> Self {
        self.providers = providers;
        self
    }

    /// Selection changes (from marker clicks or [`select`](Self::select))
    /// are reported outward here, decoupling the map from presentation
    /// chrome.
    pub fn set_selection_callback(&mut self, callback: impl Fn(Option<&str>) + Send + 'static) {
        self.on_selection_change = Some(Box::new(callback));
    }

    /// One-shot geolocation seeding the initial center. Denial silently
    /// keeps the default center.
    pub async fn init_location(&mut self, provider: &dyn GeolocationProvider, now: Instant) {
        let position = self.tracker.locate_once(provider).await;
        self.view.set_center(position, now);
        self.view.set_zoom(DEFAULT_ZOOM);
    }

    /// New entity list from the feed; reconciles markers against it.
    pub fn set_entities(
        &mut self,
        entities: Vec<BusinessEntity>,
        now: Instant,
    ) -> Result<ReconcileSummary> {
        self.entities = entities;
        self.selected = match self.selected.take() {
            // A selection pointing at a vanished entity is dropped.
            Some(id) if self.entities.iter().any(|e| e.id == id) => Some(id),
            _ => None,
        };
        self.reconcile(now)
    }

    /// Applies a selection (or deselection). Centers the view on the
    /// selected entity and starts a detail fetch when it carries a place id;
    /// the returned ticket is what the caller hands back to
    /// [`complete_enrichment`](Self::complete_enrichment) once the fetch
    /// resolves.
    pub fn select(&mut self, id: Option<&str>, now: Instant) -> Result<Option<FetchTicket>> {
        self.selected = id.map(str::to_string);
        self.reconcile(now)?;

        let ticket = match id.and_then(|id| self.entities.iter().find(|e| e.id == id)) {
            Some(entity) => {
                self.view.focus(Some(entity.safe_position()), &[], now);
                self.enrichment.begin(entity.place_id.as_deref())
            }
            None => self.enrichment.begin(None),
        };

        if let Some(callback) = &self.on_selection_change {
            callback(self.selected.as_deref());
        }
        Ok(ticket)
    }

    /// Commits a resolved detail fetch; stale tickets are discarded.
    pub fn complete_enrichment(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<crate::places::PlaceDetails>,
    ) -> bool {
        self.enrichment.complete(ticket, outcome)
    }

    /// The renderer began requesting tiles from the active provider.
    pub fn notify_tiles_requested(&mut self, now: Instant) {
        self.providers.notify_loading(now);
    }

    /// Routes one renderer event. Marker clicks may start a detail fetch,
    /// hence the optional ticket.
    pub fn handle(&mut self, event: RendererEvent, now: Instant) -> Result<Option<FetchTicket>> {
        let key = self.providers.active_provider().key.clone();
        let Some(message) = translate(event, &key) else {
            return Ok(None);
        };
        match message {
            DomainMessage::ProviderLoaded => {
                self.providers.notify_loaded();
            }
            DomainMessage::ProviderFailed => {
                if self.providers.notify_error(now) {
                    let new_key = self.providers.active_provider().key.clone();
                    self.registry.request_style_swap(&new_key);
                }
            }
            DomainMessage::StyleReady(style_key) => {
                self.registry
                    .notify_style_ready(&style_key, &mut self.view, now)?;
            }
            DomainMessage::EntityClicked(id) => {
                return self.select(Some(&id), now);
            }
            DomainMessage::SurfaceResized(size) => {
                self.view.notify_resized(size, now);
            }
        }
        Ok(None)
    }

    /// Event-loop tick: animation/invalidation upkeep and provider stall
    /// detection. A stall-driven provider advance triggers a style swap like
    /// an explicit error does.
    pub fn tick(&mut self, now: Instant) {
        self.view.tick(now);
        if self.providers.poll(now) {
            let new_key = self.providers.active_provider().key.clone();
            self.registry.request_style_swap(&new_key);
        }
    }

    pub fn view(&self) -> &MapViewController {
        &self.view
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn providers(&self) -> &TileProviderManager {
        &self.providers
    }

    pub fn enrichment(&self) -> &PlaceEnrichmentService {
        &self.enrichment
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn user_position(&self) -> LatLng {
        self.tracker.position()
    }

    fn reconcile(&mut self, now: Instant) -> Result<ReconcileSummary> {
        let entities = self.entities.clone();
        self.registry.reconcile(
            &entities,
            self.selected.as_deref(),
            self.tracker.position(),
            &mut self.view,
            now,
        )
    }
}
