//! Building dimensions and marker placement (Y up, meters)

use crate::device::DeviceId;

pub const BUILDING_WIDTH: f32 = 10.5;
pub const BUILDING_DEPTH: f32 = 7.2;
pub const BUILDING_HEIGHT: f32 = 7.0;
pub const BUILDING_CENTER: [f32; 3] = [0.0, 4.2, 0.0];

/// Resting height of the three floor slabs
pub const FLOOR_BASE_HEIGHTS: [f32; 3] = [1.4, 3.7, 6.0];

/// Label anchor height above a marker root
pub const LABEL_OFFSET: f32 = 0.65;

/// Static position of a unit marker.
///
/// Height comes from the floor (anything but 1 or 2 lands on the top tier),
/// the left/right side from the id suffix and front/back from the floor.
pub fn marker_position(id: &DeviceId, floor: Option<i32>) -> [f32; 3] {
    let y = match floor {
        Some(1) => 1.9,
        Some(2) => 4.2,
        _ => 6.5,
    };
    let x = if id.is_left_unit() { -3.2 } else { 3.2 };
    let z = if floor == Some(2) { -1.2 } else { 1.2 };
    [x, y, z]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_position_tiers() {
        assert_eq!(marker_position(&DeviceId::new("F1-AC1"), Some(1)), [-3.2, 1.9, 1.2]);
        assert_eq!(marker_position(&DeviceId::new("F2-AC2"), Some(2)), [3.2, 4.2, -1.2]);
        assert_eq!(marker_position(&DeviceId::new("F3-AC1"), Some(3)), [-3.2, 6.5, 1.2]);
    }

    #[test]
    fn test_unknown_floor_uses_top_tier() {
        assert_eq!(marker_position(&DeviceId::new("F9-AC2"), None), [3.2, 6.5, 1.2]);
    }
}
