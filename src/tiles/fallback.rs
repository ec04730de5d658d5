//! Tile-provider fallback chain.
//!
//! The manager owns the per-session provider state: which provider in the
//! ordered chain is active and where it sits in the
//! `Idle -> Loading -> {Loaded | Failed}` lifecycle. Failures and stalls walk
//! the chain forward; the index never moves backward within a session, so a
//! flapping provider cannot cause oscillation.
//!
//! Time is injected (`Instant` parameters) rather than read internally; the
//! stall deadline is a plain field, not a background timer, so clearing it on
//! success or unmount is a write and a cleared deadline can never fire late.

use crate::core::constants::PROVIDER_TIMEOUT;
use crate::tiles::provider::{default_chain, TileProvider};
use crate::{MapError, Result};
use std::time::{Duration, Instant};

/// Load lifecycle of the active provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug)]
pub struct TileProviderManager {
    providers: Vec<TileProvider>,
    active: usize,
    status: ProviderStatus,
    timeout: Duration,
    /// Armed while the active provider has yet to deliver a tile.
    deadline: Option<Instant>,
    /// Human-readable transition message for the status surface.
    diagnostic: Option<String>,
    /// Set once the last provider has failed; the terminal state is sticky.
    exhausted: bool,
}

impl TileProviderManager {
    pub fn new(providers: Vec<TileProvider>, timeout: Duration) -> Result<Self> {
        if providers.is_empty() {
            return Err(MapError::MapInit("empty tile provider chain".to_string()));
        }
        Ok(Self {
            providers,
            active: 0,
            status: ProviderStatus::Idle,
            timeout,
            deadline: None,
            diagnostic: None,
            exhausted: false,
        })
    }

    /// Manager over the built-in chain with the default stall timeout.
    pub fn with_default_chain() -> Self {
        // The built-in chain is non-empty, so this cannot fail.
        Self::new(default_chain(), PROVIDER_TIMEOUT)
            .unwrap_or_else(|_| unreachable!("default chain is non-empty"))
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_provider(&self) -> &TileProvider {
        &self.providers[self.active]
    }

    pub fn attribution(&self) -> &str {
        &self.providers[self.active].attribution
    }

    pub fn status(&self) -> ProviderStatus {
        self.status
    }

    /// Last transition message, kept for the bottom-of-map status surface.
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// True once the whole chain has failed; the diagnostic stays up.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// The renderer started requesting tiles from the active provider. Arms
    /// the stall deadline on the first request after activation.
    pub fn notify_loading(&mut self, now: Instant) {
        if self.status == ProviderStatus::Idle {
            self.status = ProviderStatus::Loading;
            if self.deadline.is_none() {
                self.deadline = Some(now + self.timeout);
            }
            log::debug!("provider '{}' loading", self.active_provider().key);
        }
    }

    /// A tile from the active provider arrived. Clears the stall deadline so
    /// a later `poll` cannot advance on a stale timer.
    pub fn notify_loaded(&mut self) {
        self.status = ProviderStatus::Loaded;
        self.deadline = None;
        let msg = format!("map tiles: {}", self.active_provider().key);
        log::debug!("{msg}");
        self.diagnostic = Some(msg);
    }

    /// A tile request from the active provider failed. Returns `true` if the
    /// chain advanced to a new provider.
    pub fn notify_error(&mut self, now: Instant) -> bool {
        self.status = ProviderStatus::Failed;
        self.advance(now, "load error")
    }

    /// Stall detection: advances by exactly one step if the deadline expired
    /// without a successful load. Call this from the event loop tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline && self.status != ProviderStatus::Loaded => {
                self.status = ProviderStatus::Failed;
                self.advance(now, "stalled")
            }
            _ => false,
        }
    }

    /// Explicit session reset; the only way the index moves backward.
    pub fn reset(&mut self) {
        self.active = 0;
        self.status = ProviderStatus::Idle;
        self.deadline = None;
        self.diagnostic = None;
        self.exhausted = false;
    }

    fn advance(&mut self, now: Instant, reason: &str) -> bool {
        let failed_key = self.active_provider().key.clone();
        if self.active + 1 < self.providers.len() {
            self.active += 1;
            self.status = ProviderStatus::Idle;
            self.deadline = Some(now + self.timeout);
            let msg = format!(
                "tile provider '{}' {reason}, switching to '{}'",
                failed_key,
                self.active_provider().key
            );
            log::warn!("{msg}");
            self.diagnostic = Some(msg);
            true
        } else {
            // Last provider: stay put, surface a sticky diagnostic instead
            // of looping back through providers already known bad.
            self.status = ProviderStatus::Failed;
            self.deadline = None;
            self.exhausted = true;
            let msg = format!("tile provider '{failed_key}' {reason}; no providers left");
            log::error!("{msg}");
            self.diagnostic = Some(msg);
            false
        }
    }
}
