//! Failover behavior of the tile-provider chain under sustained failure.

use std::time::{Duration, Instant};
use tokomap::prelude::*;

fn chain(n: usize) -> Vec<TileProvider> {
    (0..n)
        .map(|i| {
            TileProvider::new(
                &format!("p{i}"),
                "https://tiles.example/{z}/{x}/{y}.png",
                "test",
            )
        })
        .collect()
}

#[test]
fn chain_of_n_reaches_terminal_index_after_n_minus_one_failures() {
    let _ = env_logger::builder().is_test(true).try_init();

    let n = 6;
    let mut manager = TileProviderManager::new(chain(n), Duration::from_secs(4)).unwrap();
    let now = Instant::now();

    for expected in 1..n {
        manager.notify_loading(now);
        manager.notify_error(now);
        assert_eq!(manager.active_index(), expected);
    }

    // Terminal state is idempotent: more failures do not move the index.
    for _ in 0..3 {
        manager.notify_error(now);
        assert_eq!(manager.active_index(), n - 1);
    }
    assert!(manager.is_exhausted());
    assert_eq!(manager.status(), ProviderStatus::Failed);
    assert!(manager.diagnostic().is_some());
}

#[test]
fn mixed_errors_and_stalls_walk_the_chain_forward_only() {
    let timeout = Duration::from_millis(500);
    let mut manager = TileProviderManager::new(chain(4), timeout).unwrap();
    let start = Instant::now();

    // p0 errors out immediately.
    manager.notify_loading(start);
    assert!(manager.notify_error(start));
    assert_eq!(manager.active_index(), 1);

    // p1 stalls: no event until past the restarted deadline.
    let stall = start + timeout;
    assert!(manager.poll(stall));
    assert_eq!(manager.active_index(), 2);

    // p2 succeeds; a much later poll must not advance on the dead timer.
    manager.notify_loading(stall);
    manager.notify_loaded();
    assert!(!manager.poll(stall + timeout * 100));
    assert_eq!(manager.active_index(), 2);
    assert_eq!(manager.status(), ProviderStatus::Loaded);
}

#[test]
fn default_chain_failover_scenario() {
    // Carto tiles all error; OSM then loads. Index ends at 1, Loaded.
    let mut manager = TileProviderManager::with_default_chain();
    let now = Instant::now();

    manager.notify_loading(now);
    manager.notify_error(now);
    assert_eq!(manager.active_provider().key, "osm");
    assert_eq!(manager.status(), ProviderStatus::Idle);

    manager.notify_loading(now);
    manager.notify_loaded();
    assert_eq!(manager.active_index(), 1);
    assert_eq!(manager.status(), ProviderStatus::Loaded);
    assert!(!manager.is_exhausted());

    // The diagnostic surface reflects the active provider.
    assert_eq!(manager.diagnostic(), Some("map tiles: osm"));
}

#[test]
fn attribution_follows_the_active_provider() {
    let mut manager = TileProviderManager::with_default_chain();
    let now = Instant::now();
    assert!(manager.attribution().contains("CARTO"));
    manager.notify_error(now);
    assert!(!manager.attribution().contains("CARTO"));
}
