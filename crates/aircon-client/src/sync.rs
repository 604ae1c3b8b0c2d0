//! Sync loop bookkeeping
//!
//! A fetch starts on a timer tick, at startup, or right after an applied
//! command. Fetches are never cancelled and may overlap; whichever response
//! lands last replaces the snapshot. Each fetch gets a sequence number for
//! logging only.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// What started a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    Startup,
    Timer,
    /// Forced resync after an applied command
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Fetching,
}

/// Shared fetch counter; clones observe the same state
#[derive(Debug, Clone, Default)]
pub struct SyncLoop {
    in_flight: Arc<AtomicUsize>,
    next_seq: Arc<AtomicU64>,
}

impl SyncLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Fetching`. The returned ticket leaves it when dropped.
    pub fn begin(&self, trigger: SyncTrigger) -> FetchTicket {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let overlapping = self.in_flight.fetch_add(1, Ordering::AcqRel);
        if overlapping > 0 {
            tracing::debug!(seq, ?trigger, overlapping, "Starting overlapping fetch");
        }
        FetchTicket {
            seq,
            trigger,
            in_flight: self.in_flight.clone(),
        }
    }

    pub fn state(&self) -> SyncState {
        if self.in_flight() > 0 {
            SyncState::Fetching
        } else {
            SyncState::Idle
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// One in-flight fetch
#[derive(Debug)]
pub struct FetchTicket {
    seq: u64,
    trigger: SyncTrigger,
    in_flight: Arc<AtomicUsize>,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn trigger(&self) -> SyncTrigger {
        self.trigger
    }
}

impl Drop for FetchTicket {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
