//! Fetch and command orchestration
//!
//! A [`Session`] runs network work on whatever async runtime drives it and
//! pushes the results, in order, onto an [`EventQueue`] that the UI drains
//! once per frame.

use std::sync::{Arc, Mutex};

use aircon_core::{parse_command, CommandApplied, CommandIntent, DeviceRecord};

use crate::client::AcClient;
use crate::error::CommandFailure;
use crate::sync::{SyncLoop, SyncTrigger};

/// Something the UI should react to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A fetched snapshot, to replace the current one
    Snapshot {
        seq: u64,
        trigger: SyncTrigger,
        timestamp: Option<String>,
        records: Vec<DeviceRecord>,
    },
    /// A fetch that produced nothing; the previous snapshot stays
    FetchFailed { seq: u64, trigger: SyncTrigger },
    /// Accepted command text, echoed as the user's bubble
    Echo(String),
    /// Text matched no command; show the usage hint
    Hint,
    Applied(CommandApplied),
    Failed(CommandFailure),
}

/// Shared queue between async tasks and the frame loop
#[derive(Debug, Clone, Default)]
pub struct EventQueue(Arc<Mutex<Vec<SessionEvent>>>);

impl EventQueue {
    pub fn push(&self, event: SessionEvent) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(event);
        }
    }

    /// Take every queued event, oldest first
    pub fn drain(&self) -> Vec<SessionEvent> {
        match self.0.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    client: Arc<AcClient>,
    sync: SyncLoop,
    events: EventQueue,
}

impl Session {
    pub fn new(client: AcClient) -> Self {
        Self {
            client: Arc::new(client),
            sync: SyncLoop::new(),
            events: EventQueue::default(),
        }
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn sync_loop(&self) -> &SyncLoop {
        &self.sync
    }

    pub fn client(&self) -> &AcClient {
        &self.client
    }

    /// Fetch a snapshot and queue the result. Failures are only logged.
    pub async fn refresh(&self, trigger: SyncTrigger) {
        let ticket = self.sync.begin(trigger);
        let seq = ticket.seq();

        let event = match self.client.fetch_snapshot().await {
            Ok(snapshot) => {
                tracing::debug!(seq, ?trigger, items = snapshot.items.len(), "Fetched snapshot");
                SessionEvent::Snapshot {
                    seq,
                    trigger,
                    timestamp: snapshot.timestamp,
                    records: snapshot.items,
                }
            }
            Err(e) => {
                tracing::debug!(seq, ?trigger, error = %e, "Snapshot fetch failed");
                SessionEvent::FetchFailed { seq, trigger }
            }
        };
        self.events.push(event);
        drop(ticket);
    }

    /// Parse user text, queueing the echo or the usage hint.
    ///
    /// Returns the intent to dispatch, or `None` when nothing should be sent.
    /// Blank input queues nothing.
    pub fn prepare(&self, text: &str) -> Option<CommandIntent> {
        if text.trim().is_empty() {
            return None;
        }
        match parse_command(text) {
            Ok(intent) => {
                self.events.push(SessionEvent::Echo(text.to_string()));
                Some(intent)
            }
            Err(_) => {
                tracing::debug!(text, "Unrecognized command");
                self.events.push(SessionEvent::Hint);
                None
            }
        }
    }

    /// Send an intent. On success the acknowledgment is queued before the
    /// forced resync starts.
    pub async fn dispatch(&self, intent: CommandIntent) {
        match self.client.send_command(&intent).await {
            Ok(applied) => {
                tracing::info!(
                    device = %applied.ac_id,
                    action = %applied.action,
                    value = %applied.new_value,
                    "Command applied"
                );
                self.events.push(SessionEvent::Applied(applied));
                self.refresh(SyncTrigger::Command).await;
            }
            Err(failure) => {
                tracing::warn!(device = %intent.ac_id, detail = %failure.detail, "Command failed");
                self.events.push(SessionEvent::Failed(failure));
            }
        }
    }

    /// `prepare` followed by `dispatch`
    pub async fn submit(&self, text: &str) {
        if let Some(intent) = self.prepare(text) {
            self.dispatch(intent).await;
        }
    }
}
