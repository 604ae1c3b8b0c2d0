//! Aircon Client - Backend access for the control panel
//!
//! - [`AcClient`] talks to `GET /ac` and `POST /command`
//! - [`dispatcher`] maps command responses to applied/failed outcomes
//! - [`SyncLoop`] tracks in-flight snapshot fetches
//! - [`Session`] runs fetches and commands and queues their results in order

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod session;
pub mod sync;

pub use client::AcClient;
pub use dispatcher::{failure_detail, GENERIC_FAILURE};
pub use error::{ClientError, CommandFailure};
pub use session::{EventQueue, Session, SessionEvent};
pub use sync::{FetchTicket, SyncLoop, SyncState, SyncTrigger};
