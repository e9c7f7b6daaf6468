//! Platform connectivity adapter.
//!
//! A thin wrapper over the host environment's online/offline signal. The
//! embedding layer drives [`ConnectivityMonitor::set_online`] from whatever
//! notification the platform provides; subscribers observe edges only, since
//! level repeats are suppressed.

use tokio::sync::watch;

/// The platform's connectivity signal as a subscribable channel.
///
/// The monitor cannot fail. Absent any platform signal, the state defaults
/// to online.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    online: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    /// Creates a monitor with the given initial state.
    #[must_use]
    pub fn new(online: bool) -> Self {
        Self {
            online: watch::Sender::new(online),
        }
    }

    /// Synchronous "am I online now" read.
    #[must_use]
    pub fn is_online(&self) -> bool {
        *self.online.borrow()
    }

    /// Records a connectivity change. Setting the current value again is a
    /// no-op; subscribers are only woken on an actual transition.
    pub fn set_online(&self, online: bool) {
        self.online.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
    }

    /// Subscribes to connectivity transitions. The current value counts as
    /// seen; the receiver wakes on the next edge.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.online.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}
