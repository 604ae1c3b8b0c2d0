//! Aircon Core - Device state, command grammar and selection for the panel
//!
//! This crate holds the stateful core of the control panel without any I/O
//! or rendering:
//! - Device records and the lenient wire model for `/ac` and `/command`
//! - The free-text command grammar
//! - Snapshot store and marker registry reconciliation
//! - Selection and marker emphasis, bundled in [`PanelContext`]
//! - Presentation math for floor separation, selection pulse and wall fading

pub mod api;
pub mod command;
pub mod context;
pub mod device;
pub mod layout;
pub mod marker;
pub mod presentation;
pub mod selection;
pub mod snapshot;
pub mod view;

pub use api::{CommandApplied, CommandRequest, CommandValue, ErrorBody, SnapshotResponse, DEFAULT_USER};
pub use command::{parse_command, Action, CommandIntent, UnrecognizedCommand, USAGE_HINT};
pub use context::{PanelContext, SyncReport};
pub use device::{DeviceId, DeviceRecord, InvalidDeviceId, Mode, PowerStatus, Reading};
pub use marker::{Appearance, LabelBorder, Marker, MarkerRegistry};
pub use presentation::{FloorSeparation, SelectionPulse, WallFace};
pub use selection::Selection;
pub use snapshot::SnapshotStore;
pub use view::{tooltip_text, DetailView, ListRow};
