//! Marker reconciliation.
//!
//! The registry is the single owner of the imperative marker/popup set. All
//! changes flow through [`MarkerRegistry::reconcile`]; renderer callbacks
//! never write application state directly, they report entity ids through
//! the selection handler and the caller feeds a new pass in.
//!
//! A tile style swap invalidates existing marker handles in the underlying
//! renderer, so swaps are an explicit lifecycle: tear down, wait for the
//! style-ready signal, rebuild from the last reconciled inputs. Swap
//! requests are serialized through a depth-one latest-wins queue, so a
//! second swap arriving mid-rebuild can never race the first.

use crate::core::geo::LatLng;
use crate::core::view::MapViewController;
use crate::entity::BusinessEntity;
use crate::markers::popup::PopupContent;
use crate::{MapError, Result};
use fxhash::{FxHashMap, FxHashSet};
use std::time::Instant;

/// Imperative renderer-side marker object. Owned exclusively by the
/// registry; everything on it is replaced, never patched from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerHandle {
    pub position: LatLng,
    pub selected: bool,
    pub popup: PopupContent,
}

/// One record per visible business entity.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRecord {
    pub id: String,
    pub position: LatLng,
    pub selected: bool,
    pub handle: MarkerHandle,
}

/// What a reconcile pass did; `deferred` means a style swap was in flight
/// and the inputs were only cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileSummary {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    pub bounds_fitted: bool,
    pub deferred: bool,
}

type SelectionHandler = Box<dyn Fn(&str) + Send>;

#[derive(Debug, Clone)]
struct ReconcileInput {
    entities: Vec<BusinessEntity>,
    selected: Option<String>,
    user_position: LatLng,
}

enum SwapState {
    Idle,
    /// Markers are torn down; rebuilding waits for this style key. `queued`
    /// is the depth-one latest-wins slot for a follow-up swap.
    WaitingForStyle {
        key: String,
        queued: Option<String>,
    },
}

pub struct MarkerRegistry {
    markers: FxHashMap<String, MarkerRecord>,
    on_select: Option<SelectionHandler>,
    swap: SwapState,
    /// Snapshot of the last inputs, replayed after a style swap.
    last_input: Option<ReconcileInput>,
}

impl Default for MarkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self {
            markers: FxHashMap::default(),
            on_select: None,
            swap: SwapState::Idle,
            last_input: None,
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&MarkerRecord> {
        self.markers.get(id)
    }

    pub fn marker_ids(&self) -> FxHashSet<String> {
        self.markers.keys().cloned().collect()
    }

    pub fn is_swapping(&self) -> bool {
        matches!(self.swap, SwapState::WaitingForStyle { .. })
    }

    /// Marker clicks report the entity id here (bidirectional selection).
    pub fn set_selection_handler(&mut self, handler: impl Fn(&str) + Send + 'static) {
        self.on_select = Some(Box::new(handler));
    }

    /// Renderer click on a marker; forwards the id to the selection handler.
    /// Clicks on ids without a marker (e.g. arriving mid-teardown) are
    /// dropped.
    pub fn click(&self, id: &str) {
        if !self.markers.contains_key(id) {
            log::debug!("click on unknown marker '{id}' ignored");
            return;
        }
        if let Some(handler) = &self.on_select {
            handler(id);
        }
    }

    /// Synchronizes the marker set with `entities`.
    ///
    /// Removes markers whose entity left the list, creates missing ones,
    /// updates positions, selection state and popup content on the rest, and
    /// fits bounds over all entities plus the user position when nothing is
    /// selected. With a style swap in flight the inputs are only cached and
    /// replayed once the style reports ready.
    pub fn reconcile(
        &mut self,
        entities: &[BusinessEntity],
        selected_id: Option<&str>,
        user_position: LatLng,
        view: &mut MapViewController,
        now: Instant,
    ) -> Result<ReconcileSummary> {
        let input = ReconcileInput {
            entities: entities.to_vec(),
            selected: selected_id.map(str::to_string),
            user_position,
        };

        if self.is_swapping() {
            self.last_input = Some(input);
            return Ok(ReconcileSummary {
                deferred: true,
                ..Default::default()
            });
        }

        let summary = self.apply(&input, view, now)?;
        self.last_input = Some(input);
        Ok(summary)
    }

    /// The active tile style is about to change. Tears the marker set down
    /// and defers rebuilding until [`notify_style_ready`](Self::notify_style_ready);
    /// building markers against a not-yet-ready style is undefined behavior
    /// in the underlying renderer.
    pub fn request_style_swap(&mut self, style_key: &str) {
        if let SwapState::WaitingForStyle { key, queued } = &mut self.swap {
            if key.as_str() == style_key {
                return;
            }
            // Latest wins; an intermediate queued swap is dropped.
            log::debug!("style swap to '{style_key}' queued behind '{key}'");
            *queued = Some(style_key.to_string());
            return;
        }
        log::debug!(
            "style swap to '{style_key}': tearing down {} markers",
            self.markers.len()
        );
        self.markers.clear();
        self.swap = SwapState::WaitingForStyle {
            key: style_key.to_string(),
            queued: None,
        };
    }

    /// The renderer finished applying a style. Rebuilds the marker set from
    /// the last reconciled inputs, then starts the queued swap if one is
    /// waiting. Ready signals for styles no longer wanted are ignored.
    pub fn notify_style_ready(
        &mut self,
        style_key: &str,
        view: &mut MapViewController,
        now: Instant,
    ) -> Result<Option<ReconcileSummary>> {
        let queued = match &self.swap {
            SwapState::WaitingForStyle { key, queued } if key == style_key => queued.clone(),
            SwapState::WaitingForStyle { key, .. } => {
                log::debug!("style ready for '{style_key}' but waiting for '{key}', ignored");
                return Ok(None);
            }
            SwapState::Idle => {
                log::debug!("style ready for '{style_key}' with no swap in flight, ignored");
                return Ok(None);
            }
        };

        self.swap = SwapState::Idle;
        let summary = match self.last_input.clone() {
            Some(input) => Some(self.apply(&input, view, now)?),
            None => None,
        };

        if let Some(next) = queued {
            self.request_style_swap(&next);
        }
        Ok(summary)
    }

    fn apply(
        &mut self,
        input: &ReconcileInput,
        view: &mut MapViewController,
        now: Instant,
    ) -> Result<ReconcileSummary> {
        let mut summary = ReconcileSummary::default();
        let selected = input.selected.as_deref();

        let wanted: FxHashSet<&str> = input.entities.iter().map(|e| e.id.as_str()).collect();

        let stale: Vec<String> = self
            .markers
            .keys()
            .filter(|id| !wanted.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            self.markers.remove(&id);
            summary.removed += 1;
        }

        for entity in &input.entities {
            let position = entity.safe_position();
            let is_selected = selected == Some(entity.id.as_str());
            let popup = PopupContent::build(entity, &input.user_position);
            let handle = MarkerHandle {
                position,
                selected: is_selected,
                popup,
            };
            match self.markers.get_mut(&entity.id) {
                Some(record) => {
                    record.position = position;
                    record.selected = is_selected;
                    record.handle = handle;
                    summary.updated += 1;
                }
                None => {
                    self.markers.insert(
                        entity.id.clone(),
                        MarkerRecord {
                            id: entity.id.clone(),
                            position,
                            selected: is_selected,
                            handle,
                        },
                    );
                    summary.created += 1;
                }
            }
        }

        // Selection wins over bounds-fitting for this pass.
        if selected.is_none() && !input.entities.is_empty() {
            let mut points: Vec<LatLng> =
                input.entities.iter().map(BusinessEntity::safe_position).collect();
            points.push(input.user_position);
            view.focus(None, &points, now);
            summary.bounds_fitted = true;
        }

        self.check_invariant(&wanted)?;
        Ok(summary)
    }

    fn check_invariant(&self, wanted: &FxHashSet<&str>) -> Result<()> {
        let have: FxHashSet<&str> = self.markers.keys().map(String::as_str).collect();
        if have != *wanted {
            let msg = format!(
                "marker set diverged: {} markers vs {} entity ids",
                have.len(),
                wanted.len()
            );
            log::error!("{msg}");
            return Err(MapError::Reconcile(msg));
        }
        Ok(())
    }
}
