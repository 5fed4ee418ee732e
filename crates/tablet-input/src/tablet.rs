//! Per-tablet state and user settings.

use std::collections::HashMap;

use crate::device::{PadId, TabletHandle, TabletId};
use crate::geometry::Point;
use crate::transform::ActiveArea;

/// User-facing settings for one tablet.
///
/// The active area is given in millimetres and normalized against the
/// tablet's physical size when applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabletSettings {
    /// Drive the cursor with relative deltas instead of absolute warps.
    pub relative_input: bool,
    pub active_area_position: Point,
    /// Zero on either axis means "whole tablet".
    pub active_area_size: Point,
}

/// Settings for every tablet, with per-device overrides keyed by the
/// device's diagnostic name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsProfile {
    pub default: TabletSettings,
    pub devices: HashMap<String, TabletSettings>,
}

impl SettingsProfile {
    #[must_use]
    pub fn for_device(&self, name: Option<&str>) -> &TabletSettings {
        name.and_then(|n| self.devices.get(n))
            .unwrap_or(&self.default)
    }
}

/// A connected tablet.
#[derive(Debug, Clone)]
pub struct Tablet {
    id: TabletId,
    name: Option<String>,
    physical_size: Option<Point>,
    pub(crate) relative_input: bool,
    pub(crate) active_area: ActiveArea,
    pub(crate) pads: Vec<PadId>,
}

impl Tablet {
    #[must_use]
    pub fn new(handle: &TabletHandle, name: Option<String>) -> Self {
        Self {
            id: handle.id,
            name,
            physical_size: handle.physical_size,
            relative_input: false,
            active_area: ActiveArea::default(),
            pads: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> TabletId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub const fn relative_input(&self) -> bool {
        self.relative_input
    }

    #[must_use]
    pub const fn active_area(&self) -> &ActiveArea {
        &self.active_area
    }

    /// Pads attached to this tablet.
    #[must_use]
    pub fn pads(&self) -> &[PadId] {
        &self.pads
    }

    pub(crate) fn apply(&mut self, settings: &TabletSettings) {
        self.relative_input = settings.relative_input;
        self.active_area = ActiveArea::from_millimetres(
            settings.active_area_position,
            settings.active_area_size,
            self.physical_size,
        );
        tracing::debug!(
            tablet = %self.id,
            name = ?self.name,
            relative = self.relative_input,
            area = ?self.active_area,
            "Tablet settings applied"
        );
    }

    pub(crate) fn link_pad(&mut self, pad: PadId) {
        if !self.pads.contains(&pad) {
            self.pads.push(pad);
        }
    }

    pub(crate) fn unlink_pad(&mut self, pad: PadId) {
        self.pads.retain(|&p| p != pad);
    }
}
