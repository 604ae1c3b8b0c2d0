//! Per-frame animation math. Reads positions and selection, never mutates them.

use crate::layout::{BUILDING_CENTER, FLOOR_BASE_HEIGHTS};

pub const SEPARATION_EASING: f32 = 0.16;
pub const SEPARATION_MULTIPLIERS: [f32; 3] = [0.0, 1.1, 2.2];

pub const PULSE_STEP: f32 = 0.07;
pub const PULSE_BASE: f32 = 1.18;
pub const PULSE_AMPLITUDE: f32 = 0.05;

pub const WALL_BASE_OPACITY: f32 = 0.28;
pub const WALL_FADED_OPACITY: f32 = 0.06;

/// Eased floor separation driven by the slider
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloorSeparation {
    pub current: f32,
    pub target: f32,
}

impl FloorSeparation {
    /// Advance one frame toward the target
    pub fn step(&mut self) -> f32 {
        self.current += (self.target - self.current) * SEPARATION_EASING;
        self.current
    }

    /// Vertical position of each floor slab for the current separation
    pub fn slab_heights(&self) -> [f32; 3] {
        let mut heights = FLOOR_BASE_HEIGHTS;
        for (h, m) in heights.iter_mut().zip(SEPARATION_MULTIPLIERS) {
            *h += self.current * m;
        }
        heights
    }
}

/// Scale pulse of the selected marker
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectionPulse {
    pub phase: f32,
}

impl SelectionPulse {
    /// Advance the phase, then return the scale for this frame
    pub fn step(&mut self) -> f32 {
        self.phase += PULSE_STEP;
        PULSE_BASE + PULSE_AMPLITUDE * self.phase.sin()
    }
}

/// One of the four outer walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallFace {
    /// +z
    Front,
    /// -z
    Back,
    /// -x
    Left,
    /// +x
    Right,
}

impl WallFace {
    pub const ALL: [WallFace; 4] = [Self::Front, Self::Back, Self::Left, Self::Right];
}

/// The wall facing the camera, from its horizontal offset to the building center
pub fn nearest_wall(camera: [f32; 3]) -> WallFace {
    let dx = camera[0] - BUILDING_CENTER[0];
    let dz = camera[2] - BUILDING_CENTER[2];
    if dx.abs() > dz.abs() {
        if dx > 0.0 {
            WallFace::Right
        } else {
            WallFace::Left
        }
    } else if dz > 0.0 {
        WallFace::Front
    } else {
        WallFace::Back
    }
}

/// Opacity of `face` for this frame; walls stay at base opacity when no camera is given
pub fn wall_opacity(face: WallFace, camera: Option<[f32; 3]>) -> f32 {
    match camera {
        Some(c) if nearest_wall(c) == face => WALL_FADED_OPACITY,
        _ => WALL_BASE_OPACITY,
    }
}
