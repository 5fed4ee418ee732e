//! Hardware events consumed by the [`TabletManager`](crate::TabletManager).
//!
//! Events are plain data so they can be produced by a backend or read back
//! from a recorded trace.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::device::{DeviceId, PadHandle, PadId, SurfaceId, TabletHandle, TabletId, ToolHandle};
use crate::geometry::Point;

bitflags! {
    /// Axes carried by an [`AxisEvent`].
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct AxisFlags: u32 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const DISTANCE = 1 << 2;
        const PRESSURE = 1 << 3;
        const TILT_X = 1 << 4;
        const TILT_Y = 1 << 5;
        const ROTATION = 1 << 6;
        const SLIDER = 1 << 7;
        const WHEEL = 1 << 8;
    }
}

impl AxisFlags {
    pub const POSITION: Self = Self::X.union(Self::Y);
    pub const TILT: Self = Self::TILT_X.union(Self::TILT_Y);
}

/// Tool axis update. Only the axes flagged in `updated` are meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisEvent {
    pub tablet: TabletId,
    pub tool: ToolHandle,
    pub updated: AxisFlags,
    /// Absolute position in normalized tablet space.
    pub position: Point,
    /// Relative motion since the previous event.
    pub delta: Point,
    pub pressure: f64,
    pub distance: f64,
    pub rotation: f64,
    pub slider: f64,
    pub wheel_delta: f64,
    pub tilt: Point,
    pub time_ms: u32,
}

impl AxisEvent {
    /// Position with unflagged axes replaced by `NaN`.
    #[must_use]
    pub fn flagged_position(&self) -> Point {
        Point::new(
            if self.updated.contains(AxisFlags::X) {
                self.position.x
            } else {
                f64::NAN
            },
            if self.updated.contains(AxisFlags::Y) {
                self.position.y
            } else {
                f64::NAN
            },
        )
    }

    /// Delta with unflagged axes zeroed.
    #[must_use]
    pub fn flagged_delta(&self) -> Point {
        Point::new(
            if self.updated.contains(AxisFlags::X) {
                self.delta.x
            } else {
                0.0
            },
            if self.updated.contains(AxisFlags::Y) {
                self.delta.y
            } else {
                0.0
            },
        )
        .nan_to_zero()
    }
}

/// Tip contact change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TipEvent {
    pub tablet: TabletId,
    pub tool: ToolHandle,
    pub position: Point,
    pub down: bool,
    pub time_ms: u32,
}

/// Tool button (stylus side buttons).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonEvent {
    pub tablet: TabletId,
    pub tool: ToolHandle,
    pub button: u32,
    pub pressed: bool,
    pub time_ms: u32,
}

/// Tool entering or leaving detection range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityEvent {
    pub tablet: TabletId,
    pub tool: ToolHandle,
    pub in_proximity: bool,
    pub time_ms: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadButtonEvent {
    pub pad: PadId,
    pub button: u32,
    /// Mode of the pad's mode group at the time of the press.
    pub mode: u32,
    pub pressed: bool,
    pub time_ms: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadRingEvent {
    pub pad: PadId,
    pub ring: u32,
    /// Angle in degrees, or `-1` when the finger lifted.
    pub position: f64,
    /// Source is a finger (as opposed to unknown).
    pub finger: bool,
    pub time_ms: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadStripEvent {
    pub pad: PadId,
    pub strip: u32,
    /// Normalized position, or `-1` when the finger lifted.
    pub position: f64,
    pub finger: bool,
    pub time_ms: u32,
}

/// A pad being grouped with a tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PadAttachEvent {
    pub pad: PadId,
    pub tool: ToolHandle,
}

/// Everything the manager reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TabletEvent {
    TabletAdded(TabletHandle),
    PadAdded(PadHandle),
    ToolAxis(AxisEvent),
    ToolTip(TipEvent),
    ToolButton(ButtonEvent),
    ToolProximity(ProximityEvent),
    PadButton(PadButtonEvent),
    PadRing(PadRingEvent),
    PadStrip(PadStripEvent),
    PadAttach(PadAttachEvent),
    /// The device layer's destroy signal for a hardware handle.
    Removed { device: DeviceId },
    /// The seat destroyed a surface that tools may still reference.
    SurfaceDestroyed { surface: SurfaceId },
}
