//! Tile sourcing: provider definitions, the fallback chain, and fetching.

pub mod fallback;
pub mod fetch;
pub mod provider;

pub use fallback::{ProviderStatus, TileProviderManager};
pub use fetch::{fetch_tile, TileFetch, PLACEHOLDER_TILE_PNG};
pub use provider::{default_chain, TileProvider};
