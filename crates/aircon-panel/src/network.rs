//! Bridge between the async session and the frame loop
//!
//! Fetches and commands run on the tokio runtime held by [`NetworkRuntime`].
//! Their results land in the session's event queue, which is drained once per
//! frame, so every state mutation happens on the Bevy side.

use std::time::Duration;

use aircon_client::{Session, SessionEvent, SyncState, SyncTrigger};
use aircon_core::{PanelContext, USAGE_HINT};
use bevy::prelude::*;

use crate::app::{ChatLog, PanelState, Speaker};

/// Tokio runtime and session shared by the network systems
#[derive(Resource)]
pub struct NetworkRuntime {
    runtime: tokio::runtime::Runtime,
    session: Session,
    poll_interval: Duration,
}

impl NetworkRuntime {
    pub fn new(runtime: tokio::runtime::Runtime, session: Session, poll_interval_secs: u64) -> Self {
        Self {
            runtime,
            session,
            poll_interval: Duration::from_secs(poll_interval_secs),
        }
    }

    /// Start a snapshot fetch without waiting for it
    pub fn refresh(&self, trigger: SyncTrigger) {
        let session = self.session.clone();
        self.runtime.spawn(async move {
            session.refresh(trigger).await;
        });
    }

    /// Parse chat input and send it if it is a command
    pub fn submit(&self, text: &str) {
        if let Some(intent) = self.session.prepare(text) {
            let session = self.session.clone();
            self.runtime.spawn(async move {
                session.dispatch(intent).await;
            });
        }
    }

    pub fn sync_state(&self) -> SyncState {
        self.session.sync_loop().state()
    }

    pub fn backend_url(&self) -> &str {
        self.session.client().base_url()
    }
}

/// Timer for periodic snapshot fetches
#[derive(Resource)]
pub struct SyncTimer(pub Timer);

pub struct NetworkPlugin;

impl Plugin for NetworkPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, start_sync)
            .add_systems(Update, (periodic_sync, process_session_events));
    }
}

fn start_sync(mut commands: Commands, network: Res<NetworkRuntime>) {
    tracing::info!(backend = %network.backend_url(), "Starting sync loop");
    commands.insert_resource(SyncTimer(Timer::new(
        network.poll_interval,
        TimerMode::Repeating,
    )));
    network.refresh(SyncTrigger::Startup);
}

fn periodic_sync(
    time: Res<Time>,
    timer: Option<ResMut<SyncTimer>>,
    network: Res<NetworkRuntime>,
) {
    let Some(mut timer) = timer else { return };
    if timer.0.tick(time.delta()).just_finished() {
        network.refresh(SyncTrigger::Timer);
    }
}

/// Drain queued session events in arrival order
fn process_session_events(
    network: Res<NetworkRuntime>,
    mut state: ResMut<PanelState>,
    mut chat: ResMut<ChatLog>,
) {
    let events = network.session.events().drain();
    if events.is_empty() {
        return;
    }
    for event in events {
        apply_event(&mut state.0, &mut chat, event);
    }
}

/// Apply one session event to the panel state and chat
pub fn apply_event(context: &mut PanelContext, chat: &mut ChatLog, event: SessionEvent) {
    match event {
        SessionEvent::Snapshot {
            seq,
            trigger,
            timestamp,
            records,
        } => {
            let report = context.apply_snapshot(records);
            tracing::debug!(
                seq,
                ?trigger,
                ?timestamp,
                records = report.records,
                created = report.created.len(),
                "Applied snapshot"
            );
        }
        // Fetch failures stay silent; the previous snapshot remains
        SessionEvent::FetchFailed { .. } => {}
        SessionEvent::Echo(text) => chat.push(Speaker::Me, text),
        SessionEvent::Hint => chat.push(Speaker::Bot, USAGE_HINT),
        SessionEvent::Applied(applied) => chat.push(Speaker::Bot, applied.acknowledgment()),
        SessionEvent::Failed(failure) => chat.push(Speaker::Bot, failure.bubble()),
    }
}
