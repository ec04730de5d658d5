//! Tile fetching against the active provider.
//!
//! A failed fetch never surfaces a broken image: the caller always gets
//! bytes, either the tile or the embedded placeholder, plus a flag it can
//! feed into [`TileProviderManager`](crate::tiles::fallback::TileProviderManager)
//! as a load/error event.

use crate::core::geo::TileCoord;
use crate::tiles::provider::TileProvider;
use crate::Result;
use once_cell::sync::Lazy;
use reqwest::Client;

/// Shared HTTP client with a custom User-Agent so that public tile servers
/// (e.g. OpenStreetMap) don't reject the request. Building the client once
/// avoids the cost of TLS and connection pool setup for every tile.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("tokomap/0.1 (+https://github.com/example/tokomap)")
        .build()
        .expect("failed to build reqwest client")
});

/// Single-pixel neutral PNG, stretched by the renderer to the tile box when
/// the real tile could not be fetched.
pub const PLACEHOLDER_TILE_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Outcome of a tile fetch. `placeholder` doubles as the error signal for
/// the fallback manager.
#[derive(Debug, Clone)]
pub struct TileFetch {
    pub coord: TileCoord,
    pub bytes: Vec<u8>,
    pub placeholder: bool,
}

/// Fetch one tile from `provider`. Network and HTTP failures degrade to the
/// placeholder image; they never propagate as errors.
pub async fn fetch_tile(provider: &TileProvider, coord: TileCoord, retina: bool) -> TileFetch {
    if !coord.is_valid() {
        log::warn!("tile {:?} out of range for zoom {}", coord, coord.z);
        return placeholder_fetch(coord);
    }

    let url = provider.tile_url(coord, retina);
    let result: Result<Vec<u8>> = async {
        let resp = HTTP_CLIENT.get(&url).send().await?;
        let resp = resp.error_for_status()?;
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }
    .await;

    match result {
        Ok(bytes) => {
            log::debug!("tile {:?} from '{}' ({} bytes)", coord, provider.key, bytes.len());
            TileFetch {
                coord,
                bytes,
                placeholder: false,
            }
        }
        Err(e) => {
            log::warn!("tile {:?} from '{}' failed: {}", coord, provider.key, e);
            placeholder_fetch(coord)
        }
    }
}

fn placeholder_fetch(coord: TileCoord) -> TileFetch {
    TileFetch {
        coord,
        bytes: PLACEHOLDER_TILE_PNG.to_vec(),
        placeholder: true,
    }
}
