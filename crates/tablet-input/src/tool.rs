//! Per-tool state.

use crate::device::{SurfaceId, TabletId, ToolHandle, ToolId, ToolKind};
use crate::geometry::Point;

/// Everything the compositor remembers about one physical tool.
///
/// `down` implies `active`: the dispatcher only sets `down` on an active
/// tool and clears it whenever the tool leaves proximity.
#[derive(Debug, Clone)]
pub struct Tool {
    id: ToolId,
    kind: ToolKind,
    name: Option<String>,
    /// Surface receiving this tool's signals. Not owned; may go stale.
    pub(crate) focus: Option<SurfaceId>,
    /// Tablet the tool was last reported on.
    pub(crate) tablet: Option<TabletId>,
    /// Last absolute position in normalized tablet space.
    pub(crate) absolute_pos: Point,
    pub(crate) tilt: Point,
    pub(crate) pressure: f64,
    pub(crate) distance: f64,
    pub(crate) rotation: f64,
    pub(crate) slider: f64,
    pub(crate) wheel: f64,
    pub(crate) active: bool,
    pub(crate) down: bool,
    buttons_down: Vec<u32>,
}

impl Tool {
    #[must_use]
    pub fn new(handle: &ToolHandle, name: Option<String>) -> Self {
        Self {
            id: handle.id,
            kind: handle.kind,
            name,
            focus: None,
            tablet: None,
            absolute_pos: Point::ZERO,
            tilt: Point::ZERO,
            pressure: 0.0,
            distance: 0.0,
            rotation: 0.0,
            slider: 0.0,
            wheel: 0.0,
            active: false,
            down: false,
            buttons_down: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> ToolId {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> ToolKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub const fn focus(&self) -> Option<SurfaceId> {
        self.focus
    }

    #[must_use]
    pub const fn tablet(&self) -> Option<TabletId> {
        self.tablet
    }

    #[must_use]
    pub const fn absolute_pos(&self) -> Point {
        self.absolute_pos
    }

    #[must_use]
    pub const fn tilt(&self) -> Point {
        self.tilt
    }

    #[must_use]
    pub const fn pressure(&self) -> f64 {
        self.pressure
    }

    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    #[must_use]
    pub const fn rotation(&self) -> f64 {
        self.rotation
    }

    #[must_use]
    pub const fn slider(&self) -> f64 {
        self.slider
    }

    #[must_use]
    pub const fn wheel(&self) -> f64 {
        self.wheel
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn is_down(&self) -> bool {
        self.down
    }

    /// Pressed buttons in the order they went down.
    #[must_use]
    pub fn buttons_down(&self) -> &[u32] {
        &self.buttons_down
    }

    /// Update the stored absolute position, skipping `NaN` axes.
    pub(crate) fn set_absolute(&mut self, pos: Point) {
        if !pos.x.is_nan() {
            self.absolute_pos.x = pos.x;
        }
        if !pos.y.is_nan() {
            self.absolute_pos.y = pos.y;
        }
    }

    /// Record a button press. Repeated presses keep a single entry.
    pub(crate) fn press_button(&mut self, button: u32) {
        if !self.buttons_down.contains(&button) {
            self.buttons_down.push(button);
        }
    }

    /// Forget a button press. Unknown ids are ignored.
    pub(crate) fn release_button(&mut self, button: u32) {
        self.buttons_down.retain(|&b| b != button);
    }

    /// Drop all press state once the tool has left proximity.
    pub(crate) fn leave_proximity(&mut self) {
        self.active = false;
        self.down = false;
        self.buttons_down.clear();
    }
}
