//! Renderer event translation.
//!
//! The rendering library reports raw callbacks (tile load, tile error, style
//! ready, marker click). These are mapped to domain messages here, and the
//! domain messages are the only thing the manager, registry and view ever
//! consume. Tile events carry the provider key they were fired for: events
//! from a provider the chain has already moved past are dropped at the
//! translation boundary instead of confusing the state machines.

use crate::core::view::SurfaceSize;

/// Raw callback from the rendering library.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererEvent {
    TileLoaded { provider_key: String },
    TileError { provider_key: String },
    StyleReady { style_key: String },
    MarkerClicked { entity_id: String },
    Resized { width: u32, height: u32 },
}

/// Domain-level message consumed by the map components.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainMessage {
    ProviderLoaded,
    ProviderFailed,
    StyleReady(String),
    EntityClicked(String),
    SurfaceResized(SurfaceSize),
}

/// Maps a renderer event to a domain message. `active_provider_key` is the
/// key of the provider currently at the head of the fallback chain; tile
/// events for any other provider are late callbacks and translate to
/// nothing.
pub fn translate(event: RendererEvent, active_provider_key: &str) -> Option<DomainMessage> {
    match event {
        RendererEvent::TileLoaded { provider_key } => {
            if provider_key == active_provider_key {
                Some(DomainMessage::ProviderLoaded)
            } else {
                log::debug!("late tile load from '{provider_key}' dropped");
                None
            }
        }
        RendererEvent::TileError { provider_key } => {
            if provider_key == active_provider_key {
                Some(DomainMessage::ProviderFailed)
            } else {
                log::debug!("late tile error from '{provider_key}' dropped");
                None
            }
        }
        RendererEvent::StyleReady { style_key } => Some(DomainMessage::StyleReady(style_key)),
        RendererEvent::MarkerClicked { entity_id } => {
            Some(DomainMessage::EntityClicked(entity_id))
        }
        RendererEvent::Resized { width, height } => Some(DomainMessage::SurfaceResized(
            SurfaceSize::new(width, height),
        )),
    }
}
