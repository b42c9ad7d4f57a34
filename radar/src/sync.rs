//! Versioned snapshot reconciliation between the telemetry feed and the renderer.
//!
//! DESIGN
//! ======
//! The feed task and the frame loop share one [`StateSynchronizer`]. Connection
//! state and the committed snapshot are published together as a single
//! `Arc<SyncView>`; every write builds a fresh view and swaps the pointer under
//! a short write lock, so a reader holding a view never sees a mix of old and
//! new entity lists. Snapshots are never merged: an accepted push replaces the
//! committed one wholesale, and anything not strictly newer is dropped.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::sync::{Arc, PoisonError, RwLock};

use telemetry::WorldSnapshot;

/// Error returned by [`StateSynchronizer::set_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("invalid connection transition {from:?} -> {to:?}")]
    InvalidTransition { from: ConnectionState, to: ConnectionState },
}

/// Telemetry channel connection state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

impl ConnectionState {
    /// Whether the lifecycle allows moving from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use ConnectionState::{Connected, Connecting, Disconnected, Reconnecting};
        self == next
            || matches!(
                (self, next),
                (Disconnected, Connecting)
                    | (Connecting | Reconnecting, Connected)
                    | (Connecting | Connected | Reconnecting, Disconnected)
                    | (Connected, Reconnecting)
            )
    }
}

/// Result of offering a snapshot to the synchronizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The snapshot is now the committed one.
    Committed { version: u32 },
    /// Not newer than what is committed; dropped.
    Stale { version: u32, committed: u32 },
}

/// Connection state plus committed snapshot, published as one unit.
#[derive(Clone, Debug, Default)]
pub struct SyncView {
    pub state: ConnectionState,
    pub snapshot: Option<Arc<WorldSnapshot>>,
}

/// Holds the single authoritative snapshot for the session.
#[derive(Debug, Default)]
pub struct StateSynchronizer {
    view: RwLock<Arc<SyncView>>,
}

impl StateSynchronizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a pushed snapshot. Commits only if its version is strictly
    /// greater than the committed one (an empty slot accepts anything).
    pub fn apply(&self, snapshot: WorldSnapshot) -> ApplyOutcome {
        let mut guard = self.view.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = &guard.snapshot {
            if snapshot.version <= current.version {
                return ApplyOutcome::Stale { version: snapshot.version, committed: current.version };
            }
        }
        let version = snapshot.version;
        let state = guard.state;
        *guard = Arc::new(SyncView { state, snapshot: Some(Arc::new(snapshot)) });
        ApplyOutcome::Committed { version }
    }

    /// Move to a new connection state. Entering `Disconnected` clears the
    /// committed snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidTransition`] for moves the lifecycle does
    /// not allow; state is left unchanged.
    pub fn set_state(&self, next: ConnectionState) -> Result<(), SyncError> {
        let mut guard = self.view.write().unwrap_or_else(PoisonError::into_inner);
        let from = guard.state;
        if !from.can_transition_to(next) {
            return Err(SyncError::InvalidTransition { from, to: next });
        }
        if from == next {
            return Ok(());
        }
        let snapshot = if next == ConnectionState::Disconnected { None } else { guard.snapshot.clone() };
        *guard = Arc::new(SyncView { state: next, snapshot });
        tracing::debug!(?from, to = ?next, "connection state changed");
        Ok(())
    }

    /// Consistent pairing of state and snapshot for one frame.
    #[must_use]
    pub fn view(&self) -> Arc<SyncView> {
        Arc::clone(&self.view.read().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.view().state
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<WorldSnapshot>> {
        self.view().snapshot.clone()
    }
}
