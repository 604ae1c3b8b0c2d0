//! UI overlays using bevy_egui
//!
//! Unit list and scene toggles on the left, selected unit on the right, the
//! command chat along the bottom, plus marker labels and the hover tooltip
//! drawn at their screen positions.

use aircon_client::SyncState;
use aircon_core::{LabelBorder, ListRow};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::app::{ChatLog, HoverState, PanelState, SceneControls, Speaker};
use crate::camera::MainCamera;
use crate::markers::MarkerLabel;
use crate::network::NetworkRuntime;
use crate::selection::SelectDevice;

/// Tooltip offset from the pointer, in points
pub const TOOLTIP_OFFSET: egui::Vec2 = egui::vec2(14.0, 14.0);

const ACCENT: egui::Color32 = egui::Color32::from_rgb(255, 138, 42);

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Main UI system runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
        app.add_systems(EguiPrimaryContextPass, ui_system);
    }
}

pub fn sync_indicator(state: SyncState) -> &'static str {
    match state {
        SyncState::Idle => "● Idle",
        SyncState::Fetching => "● Fetching",
    }
}

pub fn label_stroke_color(border: LabelBorder) -> egui::Color32 {
    let [r, g, b, a] = border.rgba();
    let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(to_u8(r), to_u8(g), to_u8(b), to_u8(a))
}

/// One list entry; the whole row is clickable. Returns true when clicked.
fn unit_row(ui: &mut egui::Ui, row: &ListRow, is_selected: bool) -> bool {
    let fill = if is_selected {
        egui::Color32::from_rgba_unmultiplied(255, 138, 42, 40)
    } else {
        egui::Color32::TRANSPARENT
    };
    let response = egui::Frame::new()
        .fill(fill)
        .corner_radius(6.0)
        .inner_margin(egui::Margin::symmetric(6, 4))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.add(egui::Label::new(egui::RichText::new(row.id.as_str()).strong()).selectable(false));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add(egui::Label::new(egui::RichText::new(&row.pill).color(ACCENT)).selectable(false));
                });
            });
            ui.add(egui::Label::new(egui::RichText::new(&row.meta).small().weak()).selectable(false));
        })
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    response.clicked()
}

fn ui_system(
    mut contexts: EguiContexts,
    state: Res<PanelState>,
    mut controls: ResMut<SceneControls>,
    mut chat: ResMut<ChatLog>,
    hover: Res<HoverState>,
    network: Res<NetworkRuntime>,
    mut select: MessageWriter<SelectDevice>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    labels: Query<(&MarkerLabel, &GlobalTransform)>,
) {
    // Get the egui context - early return if not available
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let context = &state.0;

    egui::SidePanel::left("units_panel")
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Units");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let sync = network.sync_state();
                    let color = match sync {
                        SyncState::Idle => egui::Color32::GRAY,
                        SyncState::Fetching => ACCENT,
                    };
                    ui.label(egui::RichText::new(sync_indicator(sync)).color(color).small());
                });
            });
            ui.separator();

            ui.checkbox(&mut controls.walls_visible, "Walls");
            let max = controls.separation_max;
            ui.add(egui::Slider::new(&mut controls.separation, 0.0..=max).text("Floor separation"));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                let rows = context.list_rows();
                if rows.is_empty() {
                    ui.label(egui::RichText::new("No units reported yet").italics().weak());
                }
                for row in rows {
                    if unit_row(ui, &row, context.is_selected(&row.id)) {
                        select.write(SelectDevice(row.id.clone()));
                    }
                }

                // Markers kept from earlier snapshots
                let stale: Vec<_> = context.markers().all().filter(|m| m.is_stale()).collect();
                if !stale.is_empty() {
                    ui.separator();
                    ui.label(egui::RichText::new("Not in latest snapshot").small().weak());
                    for marker in stale {
                        let text = egui::RichText::new(marker.id().as_str()).weak();
                        if ui.selectable_label(context.is_selected(marker.id()), text).clicked() {
                            select.write(SelectDevice(marker.id().clone()));
                        }
                    }
                }
            });
        });

    egui::SidePanel::right("details_panel")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Selected unit");
            ui.separator();
            let Some(detail) = context.detail() else {
                ui.label(egui::RichText::new("Pick a unit in the building or the list").weak());
                return;
            };
            ui.label(egui::RichText::new(&detail.name).strong().size(18.0));
            ui.label(egui::RichText::new(&detail.meta).weak());
            ui.add_space(6.0);
            egui::Grid::new("detail_grid")
                .num_columns(2)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for (label, value) in [
                        ("Status", &detail.status),
                        ("Current", &detail.current_temp),
                        ("Set", &detail.set_temp),
                        ("Mode", &detail.mode),
                        ("Health", &detail.health),
                    ] {
                        ui.label(label);
                        ui.label(value);
                        ui.end_row();
                    }
                });
            ui.add_space(6.0);
            ui.label(egui::RichText::new(&detail.service).small().weak());
        });

    egui::TopBottomPanel::bottom("chat_panel")
        .resizable(true)
        .default_height(180.0)
        .show(ctx, |ui| {
            let mut send = false;
            ui.horizontal(|ui| {
                let input = ui.add(
                    egui::TextEdit::singleline(&mut chat.input)
                        .hint_text("set F3-AC1 to 21")
                        .desired_width(ui.available_width() - 64.0),
                );
                if input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    send = true;
                    input.request_focus();
                }
                if ui.button("Send").clicked() {
                    send = true;
                }
            });
            if send {
                let text = std::mem::take(&mut chat.input);
                network.submit(&text);
            }

            ui.separator();
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for bubble in &chat.bubbles {
                        let (layout, fill) = match bubble.speaker {
                            Speaker::Me => (
                                egui::Layout::right_to_left(egui::Align::TOP),
                                egui::Color32::from_rgb(255, 237, 222),
                            ),
                            Speaker::Bot => (
                                egui::Layout::left_to_right(egui::Align::TOP),
                                egui::Color32::from_rgb(236, 240, 246),
                            ),
                        };
                        ui.with_layout(layout, |ui| {
                            egui::Frame::new()
                                .fill(fill)
                                .corner_radius(8.0)
                                .inner_margin(egui::Margin::symmetric(8, 4))
                                .show(ui, |ui| {
                                    ui.label(egui::RichText::new(&bubble.text).color(egui::Color32::BLACK));
                                });
                        });
                    }
                });
        });

    // Marker labels
    if let Ok((camera, camera_transform)) = camera_query.single() {
        for (label, transform) in labels.iter() {
            let Ok(screen) = camera.world_to_viewport(camera_transform, transform.translation()) else {
                continue;
            };
            let border = context
                .markers()
                .get(&label.device_id)
                .map(|m| m.appearance().label_border)
                .unwrap_or(LabelBorder::Neutral);
            egui::Area::new(egui::Id::new(("marker_label", label.device_id.as_str())))
                .fixed_pos(egui::pos2(screen.x, screen.y))
                .pivot(egui::Align2::CENTER_CENTER)
                .order(egui::Order::Background)
                .interactable(false)
                .show(ctx, |ui| {
                    egui::Frame::group(ui.style())
                        .fill(egui::Color32::from_white_alpha(230))
                        .stroke(egui::Stroke::new(1.5, label_stroke_color(border)))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(label.device_id.as_str())
                                    .small()
                                    .color(egui::Color32::from_rgb(18, 24, 39)),
                            );
                        });
                });
        }
    }

    // Hover tooltip
    if let (Some(id), Some(cursor)) = (&hover.device, hover.cursor) {
        egui::Area::new(egui::Id::new("hover_tooltip"))
            .fixed_pos(egui::pos2(cursor.x, cursor.y) + TOOLTIP_OFFSET)
            .order(egui::Order::Tooltip)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(context.hover_text(id));
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click_at(ctx: &egui::Context, pos: egui::Pos2, row: &ListRow) -> bool {
        let mut clicked = false;
        for pressed in [None, Some(true), Some(false)] {
            let mut input = egui::RawInput {
                screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(400.0, 300.0))),
                ..Default::default()
            };
            input.events.push(egui::Event::PointerMoved(pos));
            if let Some(pressed) = pressed {
                input.events.push(egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    modifiers: egui::Modifiers::NONE,
                });
            }
            let _ = ctx.run(input, |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    clicked |= unit_row(ui, row, false);
                });
            });
        }
        clicked
    }

    #[test]
    fn test_whole_unit_row_is_clickable() {
        let row = ListRow {
            id: aircon_core::DeviceId::new("F1-AC2"),
            meta: "Floor 1 • Reception • OFF • Set 23°C".to_string(),
            pill: "25.5°C".to_string(),
        };
        let ctx = egui::Context::default();

        // Lay the row out once to find where its parts land
        let mut rect = egui::Rect::NOTHING;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let before = ui.cursor().min;
                unit_row(ui, &row, false);
                rect = egui::Rect::from_min_max(before, ui.min_rect().max);
            });
        });

        // Meta line, near the bottom left, away from the id label
        let meta = egui::pos2(rect.left() + 12.0, rect.bottom() - 6.0);
        assert!(click_at(&ctx, meta, &row));

        let outside = egui::pos2(rect.left() + 12.0, rect.bottom() + 40.0);
        assert!(!click_at(&egui::Context::default(), outside, &row));
    }

    #[test]
    fn test_sync_indicator() {
        assert_eq!(sync_indicator(SyncState::Idle), "● Idle");
        assert_eq!(sync_indicator(SyncState::Fetching), "● Fetching");
    }

    #[test]
    fn test_label_stroke_colors() {
        let accent = label_stroke_color(LabelBorder::Accent);
        let neutral = label_stroke_color(LabelBorder::Neutral);
        assert!((229..=230).contains(&accent.a()));
        assert_eq!(neutral.a(), 36);
        assert!(accent.a() > neutral.a());
    }
}
