//! The refresh scheduler actor.
//!
//! A single task owns the [`SyncStatus`] snapshot and serializes every
//! mutation through one command queue. The in-flight flag on the snapshot is
//! the only mutual exclusion: commands are handled one at a time, so a
//! checked-and-set boolean is enough to guarantee at most one concurrent
//! refresh. Timers never touch state directly — they send `PerformSync` back
//! into the queue, and every guard is re-checked when the command is handled.

use crate::config::SyncConfig;
use crate::connectivity::ConnectivityMonitor;
use crate::error::{SyncError, SyncResult};
use chrono::Utc;
use futures::future::join_all;
use gardenia_cache::QueryCache;
use gardenia_types::{SyncStatus, Target};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

const COMMAND_BUFFER: usize = 32;

#[derive(Debug)]
enum Command {
    PerformSync,
    MarkPendingSync,
    ClearSyncError,
    RefreshSettled(SyncResult<()>),
    Shutdown,
}

/// Handle to a running scheduler.
///
/// Cloneable; all clones talk to the same actor. The snapshot accessors are
/// read-only — status is mutated exclusively by the actor.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    commands: mpsc::Sender<Command>,
    status: watch::Receiver<SyncStatus>,
}

impl SyncHandle {
    /// Requests one refresh cycle.
    ///
    /// A silent no-op while offline or while a refresh is already in flight;
    /// callers that need to distinguish "skipped" from "ran" should check
    /// [`SyncHandle::status`] themselves.
    pub async fn perform_sync(&self) -> SyncResult<()> {
        self.send(Command::PerformSync).await
    }

    /// Idempotently marks a refresh as pending, e.g. after a local write
    /// that must propagate.
    pub async fn mark_pending_sync(&self) -> SyncResult<()> {
        self.send(Command::MarkPendingSync).await
    }

    /// Idempotently clears the last failure description. No other field is
    /// touched.
    pub async fn clear_sync_error(&self) -> SyncResult<()> {
        self.send(Command::ClearSyncError).await
    }

    /// Stops the actor. Any refresh already in flight is not interrupted,
    /// but its outcome is discarded.
    pub async fn shutdown(&self) -> SyncResult<()> {
        self.send(Command::Shutdown).await
    }

    /// Returns the current status snapshot.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }

    /// Subscribes to status changes, for change-driven UI such as a status
    /// badge.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.clone()
    }

    async fn send(&self, command: Command) -> SyncResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SyncError::SchedulerStopped)
    }
}

/// Spawns the scheduler actor.
///
/// The snapshot starts with the monitor's current connectivity and nothing
/// else set. If the host is online, one initial refresh is scheduled after
/// the configured startup delay.
pub fn spawn_scheduler(
    config: SyncConfig,
    cache: Arc<dyn QueryCache>,
    monitor: &ConnectivityMonitor,
) -> (SyncHandle, JoinHandle<()>) {
    let (command_tx, commands) = mpsc::channel(COMMAND_BUFFER);
    let status = watch::Sender::new(SyncStatus::new(monitor.is_online()));

    let handle = SyncHandle {
        commands: command_tx.clone(),
        status: status.subscribe(),
    };

    let scheduler = SyncScheduler {
        config,
        cache,
        connectivity: monitor.subscribe(),
        connectivity_open: true,
        commands,
        command_tx,
        status,
        last_sync: None,
    };

    (handle, tokio::spawn(scheduler.run()))
}

struct SyncScheduler {
    config: SyncConfig,
    cache: Arc<dyn QueryCache>,
    connectivity: watch::Receiver<bool>,
    connectivity_open: bool,
    commands: mpsc::Receiver<Command>,
    command_tx: mpsc::Sender<Command>,
    status: watch::Sender<SyncStatus>,
    /// Monotonic stamp of the last successful refresh, for staleness checks.
    /// The wall-clock `last_sync_time` on the snapshot is display-only.
    last_sync: Option<Instant>,
}

impl SyncScheduler {
    async fn run(mut self) {
        if self.status.borrow().is_online {
            self.schedule_refresh(self.config.startup_delay);
        }

        let mut heartbeat = time::interval_at(
            Instant::now() + self.config.heartbeat_interval,
            self.config.heartbeat_interval,
        );
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    None | Some(Command::Shutdown) => break,
                    Some(command) => self.handle_command(command),
                },
                changed = self.connectivity.changed(), if self.connectivity_open => match changed {
                    Ok(()) => self.handle_connectivity_change(),
                    // Monitor dropped; keep the last known state.
                    Err(_) => self.connectivity_open = false,
                },
                _ = heartbeat.tick() => self.handle_heartbeat(),
            }
        }

        debug!("refresh scheduler stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::PerformSync => self.start_refresh(),
            Command::MarkPendingSync => self.update(|s| s.pending_sync = true),
            Command::ClearSyncError => self.update(|s| s.sync_error = None),
            Command::RefreshSettled(result) => self.finish_refresh(result),
            // Handled in the run loop.
            Command::Shutdown => {}
        }
    }

    // ── Refresh cycle ────────────────────────────────────────────

    fn start_refresh(&mut self) {
        let status = self.status.borrow().clone();
        if !status.is_online {
            debug!("skipping refresh while offline");
            return;
        }
        if status.is_syncing {
            debug!("refresh already in flight");
            return;
        }

        info!("refreshing {} targets", self.config.targets.len());
        self.update(|s| {
            s.is_syncing = true;
            s.sync_error = None;
        });

        let cache = Arc::clone(&self.cache);
        let targets = self.config.targets.clone();
        let finalize_delay = self.config.finalize_delay;
        let settled = self.command_tx.clone();
        tokio::spawn(async move {
            let result = refresh_all(cache, targets).await;
            time::sleep(finalize_delay).await;
            let _ = settled.send(Command::RefreshSettled(result)).await;
        });
    }

    fn finish_refresh(&mut self, result: SyncResult<()>) {
        match result {
            Ok(()) => {
                self.last_sync = Some(Instant::now());
                self.update(|s| {
                    s.is_syncing = false;
                    s.pending_sync = false;
                    s.last_sync_time = Some(Utc::now());
                });
                info!("refresh complete");
            }
            Err(e) => {
                warn!(
                    "refresh failed: {} (retry in {:?})",
                    e, self.config.retry_delay
                );
                self.update(|s| {
                    s.is_syncing = false;
                    s.pending_sync = true;
                    s.sync_error = Some(e.to_string());
                });
                // The guard at the refresh entry re-checks connectivity when
                // the retry fires, so an offline host skips it.
                self.schedule_refresh(self.config.retry_delay);
            }
        }
    }

    fn schedule_refresh(&self, delay: Duration) {
        let commands = self.command_tx.clone();
        tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = commands.send(Command::PerformSync).await;
        });
    }

    // ── Automatic triggers ───────────────────────────────────────

    fn handle_connectivity_change(&mut self) {
        let online = *self.connectivity.borrow_and_update();
        if online == self.status.borrow().is_online {
            return;
        }

        self.update(|s| s.is_online = online);
        if online {
            info!("connectivity restored");
            if needs_refresh(
                self.status.borrow().pending_sync,
                self.last_sync,
                self.config.stale_after,
            ) {
                self.schedule_refresh(self.config.reconnect_delay);
            }
        } else {
            info!("connectivity lost, marking refresh pending");
            self.update(|s| s.pending_sync = true);
        }
    }

    fn handle_heartbeat(&mut self) {
        let status = self.status.borrow();
        let run = status.is_online && !status.is_syncing;
        drop(status);
        if run {
            debug!("heartbeat refresh");
            self.start_refresh();
        }
    }

    fn update(&self, mutate: impl FnOnce(&mut SyncStatus)) {
        self.status.send_if_modified(|status| {
            let before = status.clone();
            mutate(status);
            *status != before
        });
    }
}

/// Whether a became-online transition warrants a refresh: something is
/// pending, no refresh has ever completed, or the last success is stale.
fn needs_refresh(pending_sync: bool, last_sync: Option<Instant>, stale_after: Duration) -> bool {
    if pending_sync {
        return true;
    }
    match last_sync {
        None => true,
        Some(at) => at.elapsed() >= stale_after,
    }
}

/// Invalidates every target concurrently and waits for all to settle. A slow
/// or failing target never blocks the others from being requested; the
/// aggregate outcome reports every failure. A panicked invalidation task is
/// folded into the failure outcome rather than lost.
async fn refresh_all(cache: Arc<dyn QueryCache>, targets: Vec<Target>) -> SyncResult<()> {
    let tasks: Vec<_> = targets
        .into_iter()
        .map(|target| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { (target, cache.invalidate(target).await) })
        })
        .collect();

    let mut failures = Vec::new();
    for joined in join_all(tasks).await {
        match joined {
            Ok((_, Ok(()))) => {}
            Ok((target, Err(e))) => {
                warn!("invalidation failed for {}: {}", target, e);
                failures.push(format!("{target}: {e}"));
            }
            Err(e) => {
                warn!("invalidation task panicked: {}", e);
                failures.push(format!("task failed: {e}"));
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(SyncError::Refresh(failures.join("; ")))
    }
}
