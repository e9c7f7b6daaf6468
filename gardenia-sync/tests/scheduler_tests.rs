use async_trait::async_trait;
use gardenia_cache::{CacheError, CacheResult, QueryCache};
use gardenia_sync::{
    spawn_scheduler, ConnectivityMonitor, SyncConfig, SyncError, SyncHandle, Target,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time;

const TARGET_COUNT: usize = Target::ALL.len();

/// Records every invalidation call; optionally fails all of them.
#[derive(Default)]
struct RecordingCache {
    calls: Mutex<Vec<Target>>,
    fail: AtomicBool,
}

impl RecordingCache {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn failing() -> Arc<Self> {
        let cache = Self::default();
        cache.fail.store(true, Ordering::SeqCst);
        Arc::new(cache)
    }

    fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl QueryCache for RecordingCache {
    async fn invalidate(&self, target: Target) -> CacheResult<()> {
        self.calls.lock().unwrap().push(target);
        if self.fail.load(Ordering::SeqCst) {
            Err(CacheError::Backend("remote data service unreachable".into()))
        } else {
            Ok(())
        }
    }
}

/// Default timings with the startup refresh pushed out of the way, so tests
/// drive every cycle themselves.
fn quiet_config() -> SyncConfig {
    SyncConfig {
        startup_delay: Duration::from_secs(3600),
        ..SyncConfig::default()
    }
}

fn spawn(online: bool, cache: &Arc<RecordingCache>, config: SyncConfig) -> (ConnectivityMonitor, SyncHandle) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    let monitor = ConnectivityMonitor::new(online);
    let (handle, _join) = spawn_scheduler(config, cache.clone(), &monitor);
    (monitor, handle)
}

/// Waits out one refresh cycle: fan-out plus the finalize pause, with margin.
async fn settle() {
    time::sleep(Duration::from_secs(1)).await;
}

// ── perform_sync ─────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn concurrent_perform_sync_runs_one_refresh() {
    let cache = RecordingCache::new();
    let (_monitor, handle) = spawn(true, &cache, quiet_config());

    handle.perform_sync().await.unwrap();
    handle.perform_sync().await.unwrap();

    // Fan-out has run, the finalize pause has not elapsed yet.
    time::sleep(Duration::from_millis(100)).await;
    assert_eq!(cache.call_count(), TARGET_COUNT);
    assert!(handle.status().is_syncing);

    settle().await;
    assert_eq!(cache.call_count(), TARGET_COUNT);
    assert!(!handle.status().is_syncing);
}

#[tokio::test(start_paused = true)]
async fn perform_sync_offline_is_a_noop() {
    let cache = RecordingCache::new();
    let (_monitor, handle) = spawn(false, &cache, quiet_config());

    let before = handle.status();
    handle.perform_sync().await.unwrap();
    settle().await;

    assert_eq!(handle.status(), before);
    assert_eq!(cache.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn success_clears_pending_and_stamps_time() {
    let cache = RecordingCache::new();
    let (_monitor, handle) = spawn(true, &cache, quiet_config());

    handle.mark_pending_sync().await.unwrap();
    let started = chrono::Utc::now();
    handle.perform_sync().await.unwrap();
    settle().await;

    let status = handle.status();
    assert!(!status.pending_sync);
    assert!(status.sync_error.is_none());
    assert!(!status.is_syncing);
    let stamped = status.last_sync_time.expect("success should stamp last_sync_time");
    assert!(stamped >= started);
    assert_eq!(cache.call_count(), TARGET_COUNT);
}

#[tokio::test(start_paused = true)]
async fn failure_sets_error_and_retries_at_fixed_interval() {
    let cache = RecordingCache::failing();
    let (_monitor, handle) = spawn(true, &cache, quiet_config());

    handle.perform_sync().await.unwrap();
    settle().await;

    let status = handle.status();
    assert!(status.pending_sync);
    assert!(!status.is_syncing);
    let error = status.sync_error.expect("failure should set sync_error");
    assert!(error.contains("rentals"), "unexpected error text: {error}");
    assert_eq!(cache.call_count(), TARGET_COUNT);

    // Fixed-interval retry fires while still online.
    time::sleep(Duration::from_secs(6)).await;
    assert_eq!(cache.call_count(), 2 * TARGET_COUNT);

    // The next retry succeeds and clears the pending state.
    cache.set_failing(false);
    time::sleep(Duration::from_secs(6)).await;
    let status = handle.status();
    assert!(!status.pending_sync);
    assert!(status.sync_error.is_none());
    assert!(status.last_sync_time.is_some());
    assert_eq!(cache.call_count(), 3 * TARGET_COUNT);
}

#[tokio::test(start_paused = true)]
async fn retry_is_skipped_while_offline() {
    let cache = RecordingCache::failing();
    let (monitor, handle) = spawn(true, &cache, quiet_config());

    handle.perform_sync().await.unwrap();
    settle().await;
    assert_eq!(cache.call_count(), TARGET_COUNT);

    // Drop the connection before the retry fires; the fire-time guard skips.
    monitor.set_online(false);
    time::sleep(Duration::from_secs(10)).await;
    assert_eq!(cache.call_count(), TARGET_COUNT);
    assert!(handle.status().pending_sync);
}

// ── Connectivity transitions ─────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn going_offline_marks_pending_without_refreshing() {
    let cache = RecordingCache::new();
    let (monitor, handle) = spawn(true, &cache, quiet_config());

    monitor.set_online(false);
    time::sleep(Duration::from_millis(50)).await;

    let status = handle.status();
    assert!(status.pending_sync);
    assert!(!status.is_online);
    assert_eq!(cache.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn reconnect_after_outage_triggers_one_refresh() {
    let cache = RecordingCache::new();
    let (monitor, handle) = spawn(true, &cache, quiet_config());

    // A first refresh succeeds, then the connection drops long enough for
    // the snapshot to go stale.
    handle.perform_sync().await.unwrap();
    settle().await;
    assert_eq!(cache.call_count(), TARGET_COUNT);

    monitor.set_online(false);
    time::sleep(Duration::from_secs(31)).await;
    monitor.set_online(true);

    // One refresh runs within the reconnect settle delay.
    time::sleep(Duration::from_secs(2)).await;
    assert_eq!(cache.call_count(), 2 * TARGET_COUNT);
    assert!(handle.status().is_online);
    assert!(!handle.status().pending_sync);
}

#[tokio::test(start_paused = true)]
async fn reconnect_while_never_synced_triggers_refresh() {
    let cache = RecordingCache::new();
    let (monitor, handle) = spawn(false, &cache, quiet_config());

    monitor.set_online(true);
    time::sleep(Duration::from_secs(2)).await;

    assert_eq!(cache.call_count(), TARGET_COUNT);
    assert!(handle.status().last_sync_time.is_some());
}

// ── Heartbeat and startup ────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn heartbeat_refreshes_while_online() {
    let cache = RecordingCache::new();
    let (_monitor, _handle) = spawn(true, &cache, quiet_config());

    time::sleep(Duration::from_secs(301)).await;
    assert_eq!(cache.call_count(), TARGET_COUNT);
}

#[tokio::test(start_paused = true)]
async fn heartbeat_is_inert_while_offline() {
    let cache = RecordingCache::new();
    let (_monitor, handle) = spawn(false, &cache, quiet_config());

    time::sleep(Duration::from_secs(301)).await;
    assert_eq!(cache.call_count(), 0);
    assert!(handle.status().last_sync_time.is_none());
}

#[tokio::test(start_paused = true)]
async fn startup_refresh_runs_once_while_online() {
    let cache = RecordingCache::new();
    let (_monitor, handle) = spawn(true, &cache, SyncConfig::default());

    time::sleep(Duration::from_secs(4)).await;
    assert_eq!(cache.call_count(), TARGET_COUNT);
    assert!(handle.status().last_sync_time.is_some());
}

#[tokio::test(start_paused = true)]
async fn no_startup_refresh_while_offline() {
    let cache = RecordingCache::new();
    let (_monitor, handle) = spawn(false, &cache, SyncConfig::default());

    time::sleep(Duration::from_secs(4)).await;
    assert_eq!(cache.call_count(), 0);
    assert_eq!(handle.status().last_sync_time, None);
}

// ── Status surface ───────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn clear_sync_error_is_idempotent() {
    let cache = RecordingCache::new();
    let (_monitor, handle) = spawn(true, &cache, quiet_config());

    let before = handle.status();
    handle.clear_sync_error().await.unwrap();
    handle.clear_sync_error().await.unwrap();
    time::sleep(Duration::from_millis(50)).await;

    assert_eq!(handle.status(), before);
}

#[tokio::test(start_paused = true)]
async fn clear_sync_error_leaves_other_fields() {
    let cache = RecordingCache::failing();
    let (_monitor, handle) = spawn(true, &cache, quiet_config());

    handle.perform_sync().await.unwrap();
    settle().await;
    assert!(handle.status().sync_error.is_some());

    handle.clear_sync_error().await.unwrap();
    time::sleep(Duration::from_millis(50)).await;

    let status = handle.status();
    assert!(status.sync_error.is_none());
    assert!(status.pending_sync);
}

#[tokio::test(start_paused = true)]
async fn mark_pending_sync_is_idempotent() {
    let cache = RecordingCache::new();
    let (_monitor, handle) = spawn(true, &cache, quiet_config());

    handle.mark_pending_sync().await.unwrap();
    handle.mark_pending_sync().await.unwrap();
    time::sleep(Duration::from_millis(50)).await;

    assert!(handle.status().pending_sync);
    assert_eq!(cache.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn status_subscription_observes_the_refresh() {
    let cache = RecordingCache::new();
    let (_monitor, handle) = spawn(true, &cache, quiet_config());

    let mut status = handle.subscribe();
    handle.perform_sync().await.unwrap();

    status.changed().await.unwrap();
    assert!(status.borrow_and_update().is_syncing);

    status.changed().await.unwrap();
    let finished = status.borrow_and_update().clone();
    assert!(!finished.is_syncing);
    assert!(finished.last_sync_time.is_some());
}

// ── Lifecycle ────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_actor() {
    let cache = RecordingCache::new();
    let monitor = ConnectivityMonitor::default();
    let (handle, join) = spawn_scheduler(quiet_config(), cache.clone(), &monitor);

    handle.shutdown().await.unwrap();
    join.await.unwrap();

    let err = handle.perform_sync().await.unwrap_err();
    assert!(matches!(err, SyncError::SchedulerStopped));
}
