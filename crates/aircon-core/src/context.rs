//! Panel context: the snapshot store, marker registry, selection and detail
//! panel contents, owned together and passed explicitly to whoever mutates them.

use crate::device::{DeviceId, DeviceRecord};
use crate::marker::MarkerRegistry;
use crate::selection::Selection;
use crate::snapshot::SnapshotStore;
use crate::view::{tooltip_text, DetailView, ListRow};

/// Result of applying one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Devices seen for the first time
    pub created: Vec<DeviceId>,
    pub records: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PanelContext {
    snapshot: SnapshotStore,
    markers: MarkerRegistry,
    selection: Selection,
    detail: Option<DetailView>,
}

impl PanelContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot, reconcile markers and refresh the selection.
    pub fn apply_snapshot(&mut self, records: Vec<DeviceRecord>) -> SyncReport {
        self.snapshot.replace(records);
        let created = self.markers.reconcile(self.snapshot.all());

        if let Some(id) = self.selection.get().cloned() {
            self.publish_detail(&id);
            self.markers.apply_emphasis(Some(&id));
        }

        SyncReport {
            created,
            records: self.snapshot.len(),
        }
    }

    /// Select a device and return the point the camera should orbit.
    ///
    /// Selecting an id without a record keeps the detail panel as it was.
    pub fn select(&mut self, id: DeviceId) -> Option<[f32; 3]> {
        tracing::debug!(device = %id, "Selecting device");
        self.selection.set(id.clone());
        self.publish_detail(&id);
        self.markers.apply_emphasis(Some(&id));
        self.markers.get(&id).map(|m| m.position())
    }

    fn publish_detail(&mut self, id: &DeviceId) {
        if let Some(record) = self.snapshot.get(id) {
            self.detail = Some(DetailView::from_record(record));
        }
    }

    pub fn selected(&self) -> Option<&DeviceId> {
        self.selection.get()
    }

    pub fn is_selected(&self, id: &DeviceId) -> bool {
        self.selection.is_selected(id)
    }

    /// Last published detail panel contents
    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn snapshot(&self) -> &SnapshotStore {
        &self.snapshot
    }

    pub fn markers(&self) -> &MarkerRegistry {
        &self.markers
    }

    /// Device list in snapshot order
    pub fn list_rows(&self) -> Vec<ListRow> {
        self.snapshot.all().iter().map(ListRow::from_record).collect()
    }

    pub fn hover_text(&self, id: &DeviceId) -> String {
        tooltip_text(id, self.snapshot.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{PowerStatus, Reading};
    use crate::marker::Appearance;

    fn record(id: &str, floor: i32, temp: f64) -> DeviceRecord {
        DeviceRecord {
            ac_id: DeviceId::new(id),
            floor: Reading::from(floor),
            current_temp: Reading::from(temp),
            status: PowerStatus::On,
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_snapshot_creates_markers() {
        let mut ctx = PanelContext::new();
        let report = ctx.apply_snapshot(vec![record("F1-AC1", 1, 22.0), record("F2-AC1", 2, 23.0)]);
        assert_eq!(report.created.len(), 2);
        assert_eq!(report.records, 2);
        assert_eq!(ctx.markers().len(), 2);
        assert_eq!(ctx.list_rows().len(), 2);
    }

    #[test]
    fn test_dropped_device_keeps_marker() {
        let mut ctx = PanelContext::new();
        ctx.apply_snapshot(vec![record("F1-AC1", 1, 22.0), record("F2-AC1", 2, 23.0)]);
        let report = ctx.apply_snapshot(vec![record("F1-AC1", 1, 22.0)]);
        assert!(report.created.is_empty());
        assert!(ctx.markers().get(&DeviceId::new("F2-AC1")).is_some());
        assert_eq!(ctx.list_rows().len(), 1);
    }

    #[test]
    fn test_select_publishes_detail_and_focus() {
        let mut ctx = PanelContext::new();
        ctx.apply_snapshot(vec![record("F1-AC1", 1, 22.0), record("F2-AC1", 2, 23.0)]);

        let focus = ctx.select(DeviceId::new("F2-AC1"));
        assert_eq!(focus, Some([-3.2, 4.2, -1.2]));
        assert_eq!(ctx.detail().unwrap().name, "F2-AC1");
        assert_eq!(ctx.markers().active_count(), 1);
        assert_eq!(
            ctx.markers().get(&DeviceId::new("F1-AC1")).unwrap().appearance(),
            Appearance::INACTIVE
        );
    }

    #[test]
    fn test_resync_refreshes_selected_detail() {
        let mut ctx = PanelContext::new();
        ctx.apply_snapshot(vec![record("F1-AC1", 1, 22.0)]);
        ctx.select(DeviceId::new("F1-AC1"));
        assert_eq!(ctx.detail().unwrap().current_temp, "22");

        ctx.apply_snapshot(vec![record("F1-AC1", 1, 25.5)]);
        assert_eq!(ctx.detail().unwrap().current_temp, "25.5");
        assert_eq!(ctx.markers().active_count(), 1);
    }

    #[test]
    fn test_stale_selection_keeps_last_detail() {
        let mut ctx = PanelContext::new();
        ctx.apply_snapshot(vec![record("F1-AC1", 1, 22.0), record("F2-AC1", 2, 23.0)]);
        ctx.select(DeviceId::new("F2-AC1"));

        ctx.apply_snapshot(vec![record("F1-AC1", 1, 22.0)]);
        assert!(ctx.is_selected(&DeviceId::new("F2-AC1")));
        let detail = ctx.detail().unwrap();
        assert_eq!(detail.name, "F2-AC1");
        assert_eq!(detail.current_temp, "23");
        assert!(ctx.markers().get(&DeviceId::new("F2-AC1")).unwrap().appearance().is_active());
    }

    #[test]
    fn test_select_unknown_id_keeps_previous_detail() {
        let mut ctx = PanelContext::new();
        ctx.apply_snapshot(vec![record("F1-AC1", 1, 22.0)]);
        ctx.select(DeviceId::new("F1-AC1"));

        let focus = ctx.select(DeviceId::new("F3-AC2"));
        assert_eq!(focus, None);
        assert_eq!(ctx.selected(), Some(&DeviceId::new("F3-AC2")));
        assert_eq!(ctx.detail().unwrap().name, "F1-AC1");
        assert_eq!(ctx.markers().active_count(), 0);
    }

    #[test]
    fn test_hover_text_for_unknown_id_is_bare() {
        let mut ctx = PanelContext::new();
        ctx.apply_snapshot(vec![record("F1-AC1", 1, 22.0)]);
        assert_eq!(ctx.hover_text(&DeviceId::new("F1-AC1")), "F1-AC1 • ON • 22°C (set °C)");
        assert_eq!(ctx.hover_text(&DeviceId::new("F2-AC2")), "F2-AC2");
    }
}
