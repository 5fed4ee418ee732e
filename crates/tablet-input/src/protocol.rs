//! Collaborators the tablet code talks to.
//!
//! None of these are implemented here for production use: the compositor
//! supplies the tablet protocol implementation, its pointer subsystem and
//! its surface tree. [`crate::sim`] and [`crate::record`] provide in-memory
//! versions for tests and trace replay.

use serde::{Deserialize, Serialize};

use crate::device::{PadId, SurfaceId, TabletId, ToolId, WindowId};
use crate::geometry::{Point, Rect};

/// Pad identity plus the state its signals are tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadTag {
    pub pad: PadId,
    /// Mode group index. One group per pad is modelled, so this is 0.
    pub group: u32,
    pub mode: u32,
    /// Tool the pad is grouped with, if it still exists.
    pub tool: Option<ToolId>,
}

/// Outgoing tablet protocol signals.
///
/// Calls are fire-and-forget; the protocol layer decides which client
/// resources receive them.
pub trait TabletProtocol {
    fn proximity_in(&mut self, tool: ToolId, tablet: TabletId, surface: SurfaceId);
    fn proximity_out(&mut self, tool: ToolId);
    /// Surface-local motion.
    fn motion(&mut self, tool: ToolId, local: Point);
    fn down(&mut self, tool: ToolId);
    fn up(&mut self, tool: ToolId);
    fn button_tool(&mut self, tool: ToolId, button: u32, pressed: bool);
    fn pressure(&mut self, tool: ToolId, pressure: f64);
    fn distance(&mut self, tool: ToolId, distance: f64);
    fn rotation(&mut self, tool: ToolId, degrees: f64);
    fn slider(&mut self, tool: ToolId, position: f64);
    fn wheel(&mut self, tool: ToolId, delta: f64);
    fn tilt(&mut self, tool: ToolId, tilt: Point);

    fn mode(&mut self, pad: PadTag, time_ms: u32);
    fn button_pad(&mut self, pad: PadTag, button: u32, time_ms: u32, pressed: bool);
    fn ring(&mut self, pad: PadTag, ring: u32, position: f64, finger: bool, time_ms: u32);
    fn strip(&mut self, pad: PadTag, strip: u32, position: f64, finger: bool, time_ms: u32);
}

/// The seat's pointer: one cursor, one pointer focus.
pub trait PointerSubsystem {
    /// Move the cursor by a relative delta.
    fn move_by(&mut self, delta: Point);

    /// Warp the cursor to a normalized position on the area `tablet` is
    /// mapped to. `NaN` axes keep their current coordinate.
    fn warp_absolute(&mut self, position: Point, tablet: TabletId);

    fn attach_tablet(&mut self, tablet: TabletId);
    fn detach_tablet(&mut self, tablet: TabletId);

    /// Cursor position in global logical coordinates.
    fn cursor_position(&self) -> Point;

    /// Surface currently holding pointer focus.
    fn pointer_focus(&self) -> Option<SurfaceId>;

    /// Re-run pointer focus for the current cursor position without moving.
    fn simulate_motion(&mut self);

    /// Generic input refocus, as done on first contact.
    fn refocus(&mut self);
}

/// Read-only queries against the compositor's surface tree.
pub trait SurfaceModel {
    /// Global bounding box of a mapped surface.
    fn surface_box(&self, surface: SurfaceId) -> Option<Rect>;

    fn surface_window(&self, surface: SurfaceId) -> Option<WindowId>;

    /// Whether a pointer constraint (lock or confine) is active on the surface.
    fn has_constraint(&self, surface: SurfaceId) -> bool;

    /// Logical size of a window.
    fn window_size(&self, window: WindowId) -> Point;

    /// Server-side scale applied to an X11 window. `None` for native windows.
    fn x11_scale(&self, window: WindowId) -> Option<f64>;
}

/// Pointer and surface model together, as the seat provides them.
pub trait SeatContext: PointerSubsystem + SurfaceModel {}

impl<T: PointerSubsystem + SurfaceModel> SeatContext for T {}

/// Borrowed collaborators for one dispatch call.
pub struct InputContext<'a> {
    pub protocol: &'a mut dyn TabletProtocol,
    pub seat: &'a mut dyn SeatContext,
}

impl<'a> InputContext<'a> {
    pub fn new(protocol: &'a mut dyn TabletProtocol, seat: &'a mut dyn SeatContext) -> Self {
        Self { protocol, seat }
    }
}
