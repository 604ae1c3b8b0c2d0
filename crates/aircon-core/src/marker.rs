//! Marker registry: one persistent scene marker per device identity
//!
//! Markers are created the first time an id shows up in a snapshot and are
//! never removed. A device that stops being reported keeps its marker at the
//! last known position and is flagged stale until it reappears.

use std::collections::{HashMap, HashSet};

use crate::device::{DeviceId, DeviceRecord};
use crate::layout::marker_position;

/// Border color of a marker's text label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelBorder {
    Neutral,
    Accent,
}

impl LabelBorder {
    /// sRGB components with alpha, all in 0..=1
    pub fn rgba(self) -> [f32; 4] {
        match self {
            Self::Neutral => [18.0 / 255.0, 24.0 / 255.0, 39.0 / 255.0, 0.14],
            Self::Accent => [1.0, 138.0 / 255.0, 42.0 / 255.0, 0.9],
        }
    }
}

/// Visual emphasis of a marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub lamp_intensity: f32,
    pub ring_opacity: f32,
    pub scale: f32,
    pub label_border: LabelBorder,
}

impl Appearance {
    /// Freshly created marker, before any emphasis pass
    pub const CREATED: Self = Self {
        lamp_intensity: 1.8,
        ring_opacity: 0.18,
        scale: 1.0,
        label_border: LabelBorder::Neutral,
    };

    pub const INACTIVE: Self = Self {
        lamp_intensity: 1.6,
        ring_opacity: 0.16,
        scale: 1.0,
        label_border: LabelBorder::Neutral,
    };

    pub const ACTIVE: Self = Self {
        lamp_intensity: 2.2,
        ring_opacity: 0.28,
        scale: 1.18,
        label_border: LabelBorder::Accent,
    };

    pub fn is_active(&self) -> bool {
        *self == Self::ACTIVE
    }
}

/// The persistent visual representation of one device
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    id: DeviceId,
    floor: Option<i32>,
    position: [f32; 3],
    appearance: Appearance,
    stale: bool,
}

impl Marker {
    fn new(id: DeviceId, floor: Option<i32>) -> Self {
        let position = marker_position(&id, floor);
        Self {
            id,
            floor,
            position,
            appearance: Appearance::CREATED,
            stale: false,
        }
    }

    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    /// Floor captured when the marker was created
    pub fn floor(&self) -> Option<i32> {
        self.floor
    }

    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    /// True when the latest snapshot did not report this device
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

/// Owns every marker; the only place markers are constructed
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    markers: Vec<Marker>,
    index: HashMap<DeviceId, usize>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the marker for `id`, creating it on first sight.
    ///
    /// The floor only matters at creation; later calls never move a marker.
    pub fn ensure(&mut self, id: &DeviceId, floor: Option<i32>) -> &Marker {
        let i = match self.index.get(id) {
            Some(&i) => i,
            None => {
                let i = self.markers.len();
                self.markers.push(Marker::new(id.clone(), floor));
                self.index.insert(id.clone(), i);
                tracing::debug!(device = %id, ?floor, "Created marker");
                i
            }
        };
        &self.markers[i]
    }

    /// Ensure a marker for every record and refresh stale flags.
    ///
    /// Never removes markers. Returns the ids whose markers were created.
    pub fn reconcile(&mut self, records: &[DeviceRecord]) -> Vec<DeviceId> {
        let mut created = Vec::new();
        for record in records {
            if record.ac_id.is_empty() {
                tracing::warn!(room = %record.room, "Snapshot record without ac_id, no marker");
                continue;
            }
            if !self.index.contains_key(&record.ac_id) {
                created.push(record.ac_id.clone());
            }
            self.ensure(&record.ac_id, record.floor_level());
        }

        let reported: HashSet<&DeviceId> = records.iter().map(|r| &r.ac_id).collect();
        for marker in &mut self.markers {
            marker.stale = !reported.contains(&marker.id);
        }
        created
    }

    /// Full emphasis pass: the selected marker is active, every other one inactive
    pub fn apply_emphasis(&mut self, selected: Option<&DeviceId>) {
        for marker in &mut self.markers {
            marker.appearance = if Some(&marker.id) == selected {
                Appearance::ACTIVE
            } else {
                Appearance::INACTIVE
            };
        }
    }

    pub fn get(&self, id: &DeviceId) -> Option<&Marker> {
        self.index.get(id).map(|&i| &self.markers[i])
    }

    /// Markers in creation order
    pub fn all(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn active_count(&self) -> usize {
        self.markers.iter().filter(|m| m.appearance.is_active()).count()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
