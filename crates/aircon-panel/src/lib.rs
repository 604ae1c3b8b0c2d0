//! Aircon Panel - 3D building view with unit markers, detail panel and command chat
//!
//! Device state lives in [`aircon_core::PanelContext`], wrapped in the
//! [`app::PanelState`] resource. Network results arrive through the
//! [`network`] queue and are applied once per frame.

pub mod app;
pub mod building;
pub mod camera;
pub mod config;
pub mod markers;
pub mod network;
pub mod pointer;
pub mod presentation;
pub mod selection;
pub mod ui;

pub use app::run;
pub use config::{load_config, PanelConfig};
