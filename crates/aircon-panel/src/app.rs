//! Bevy application setup

use aircon_client::Session;
use aircon_core::{DeviceId, PanelContext};
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::DefaultPickingPlugins;

use crate::building::BuildingPlugin;
use crate::camera::CameraPlugin;
use crate::config::PanelConfig;
use crate::markers::MarkersPlugin;
use crate::network::{NetworkPlugin, NetworkRuntime};
use crate::pointer::PointerPlugin;
use crate::presentation::PresentationPlugin;
use crate::selection::SelectionPlugin;
use crate::ui::UiPlugin;

/// Snapshot store, marker registry and selection, shared by every system
#[derive(Debug, Default, Resource)]
pub struct PanelState(pub PanelContext);

/// User-controlled scene toggles, read once per frame
#[derive(Debug, Clone, Resource)]
pub struct SceneControls {
    pub walls_visible: bool,
    pub separation: f32,
    pub separation_max: f32,
}

impl SceneControls {
    pub fn from_config(config: &PanelConfig) -> Self {
        Self {
            walls_visible: config.scene.walls_visible,
            separation: 0.0,
            separation_max: config.scene.separation_max,
        }
    }
}

/// Device under the pointer and where the pointer is
#[derive(Debug, Clone, Default, Resource)]
pub struct HoverState {
    pub device: Option<DeviceId>,
    pub cursor: Option<Vec2>,
}

/// Who wrote a chat bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Me,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBubble {
    pub speaker: Speaker,
    pub text: String,
}

/// Command chat history and the pending input line
#[derive(Debug, Clone, Resource)]
pub struct ChatLog {
    pub bubbles: Vec<ChatBubble>,
    pub input: String,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self {
            bubbles: vec![ChatBubble {
                speaker: Speaker::Bot,
                text: "Hi! Pick a unit or type a command. Turn walls OFF to see floors clearly."
                    .to_string(),
            }],
            input: String::new(),
        }
    }
}

impl ChatLog {
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.bubbles.push(ChatBubble {
            speaker,
            text: text.into(),
        });
    }
}

/// Run the Bevy application
pub fn run(config: PanelConfig, session: Session, runtime: tokio::runtime::Runtime) -> AppExit {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.93, 0.95, 0.98)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Aircon Deck - Building AC Control".to_string(),
                ..default()
            }),
            ..default()
        }))
        // Picking must be registered before EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        .insert_resource(SceneControls::from_config(&config))
        .insert_resource(NetworkRuntime::new(runtime, session, config.backend.poll_interval_secs))
        .init_resource::<PanelState>()
        .init_resource::<HoverState>()
        .init_resource::<ChatLog>()
        .add_plugins(CameraPlugin)
        .add_plugins(BuildingPlugin)
        .add_plugins(MarkersPlugin)
        .add_plugins(SelectionPlugin)
        .add_plugins(PointerPlugin)
        .add_plugins(PresentationPlugin)
        .add_plugins(NetworkPlugin)
        .add_plugins(UiPlugin)
        .run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_opens_with_greeting() {
        let chat = ChatLog::default();
        assert_eq!(chat.bubbles.len(), 1);
        assert_eq!(chat.bubbles[0].speaker, Speaker::Bot);
        assert!(chat.input.is_empty());
    }

    #[test]
    fn test_scene_controls_from_config() {
        let mut config = PanelConfig::default();
        config.scene.walls_visible = false;
        let controls = SceneControls::from_config(&config);
        assert!(!controls.walls_visible);
        assert_eq!(controls.separation, 0.0);
        assert_eq!(controls.separation_max, 2.0);
    }
}
