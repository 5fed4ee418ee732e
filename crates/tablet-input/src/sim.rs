//! In-memory seat: one output, a stack of rectangular surfaces and a cursor.
//!
//! Implements [`PointerSubsystem`] and [`SurfaceModel`] closely enough to
//! drive the tablet code without a compositor. Pointer focus is the topmost
//! mapped surface under the cursor. A constrained focus surface locks the
//! cursor in place and pins focus, as a pointer lock would.

use serde::{Deserialize, Serialize};

use crate::device::{SurfaceId, TabletId, WindowId};
use crate::geometry::{Point, Rect};
use crate::protocol::{PointerSubsystem, SurfaceModel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimWindow {
    pub id: WindowId,
    /// Logical size.
    pub size: Point,
    /// Set for X11 windows.
    #[serde(default)]
    pub x11_scale: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSurface {
    pub id: SurfaceId,
    /// Global bounding box.
    pub rect: Rect,
    #[serde(default)]
    pub window: Option<SimWindow>,
    /// Pointer constraint active on this surface.
    #[serde(default)]
    pub constrained: bool,
    /// Unmapped surfaces have no bounding box and are never hit.
    #[serde(default = "mapped_default")]
    pub mapped: bool,
}

const fn mapped_default() -> bool {
    true
}

impl SimSurface {
    #[must_use]
    pub fn new(id: u64, rect: Rect) -> Self {
        Self {
            id: SurfaceId(id),
            rect,
            window: None,
            constrained: false,
            mapped: true,
        }
    }
}

/// Initial layout of a simulated seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Output area that absolute tablet positions map onto.
    pub output: Rect,
    pub cursor: Point,
    /// Bottom to top.
    pub surfaces: Vec<SimSurface>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            output: Rect::new(0.0, 0.0, 1920.0, 1080.0),
            cursor: Point::ZERO,
            surfaces: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimSeat {
    output: Rect,
    cursor: Point,
    surfaces: Vec<SimSurface>,
    focus: Option<SurfaceId>,
    attached: Vec<TabletId>,
    refocus_count: usize,
}

impl SimSeat {
    #[must_use]
    pub fn new(scene: Scene) -> Self {
        let mut seat = Self {
            output: scene.output,
            cursor: scene.output.clamp(scene.cursor),
            surfaces: scene.surfaces,
            focus: None,
            attached: Vec::new(),
            refocus_count: 0,
        };
        seat.focus = seat.surface_at(seat.cursor);
        seat
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut SimSurface> {
        self.surfaces.iter_mut().find(|s| s.id == id)
    }

    /// Drop a surface; focus on it is lost.
    pub fn remove_surface(&mut self, id: SurfaceId) {
        self.surfaces.retain(|s| s.id != id);
        if self.focus == Some(id) {
            self.focus = None;
        }
    }

    /// Override pointer focus directly.
    pub fn set_focus(&mut self, focus: Option<SurfaceId>) {
        self.focus = focus;
    }

    #[must_use]
    pub fn attached_tablets(&self) -> &[TabletId] {
        &self.attached
    }

    /// Number of generic refocus requests seen.
    #[must_use]
    pub const fn refocus_count(&self) -> usize {
        self.refocus_count
    }

    fn surface(&self, id: SurfaceId) -> Option<&SimSurface> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    fn surface_at(&self, p: Point) -> Option<SurfaceId> {
        self.surfaces
            .iter()
            .rev()
            .find(|s| s.mapped && s.rect.contains(p))
            .map(|s| s.id)
    }

    fn window(&self, id: WindowId) -> Option<&SimWindow> {
        self.surfaces
            .iter()
            .filter_map(|s| s.window.as_ref())
            .find(|w| w.id == id)
    }

    /// Cursor is locked while the focused surface holds a constraint.
    fn locked(&self) -> bool {
        self.focus
            .and_then(|id| self.surface(id))
            .is_some_and(|s| s.constrained)
    }

    fn update_focus(&mut self) {
        if !self.locked() {
            self.focus = self.surface_at(self.cursor);
        }
    }
}

impl PointerSubsystem for SimSeat {
    fn move_by(&mut self, delta: Point) {
        if self.locked() {
            return;
        }
        self.cursor = self.output.clamp(self.cursor + delta.nan_to_zero());
    }

    fn warp_absolute(&mut self, position: Point, _tablet: TabletId) {
        if self.locked() {
            return;
        }
        let mut target = self.cursor;
        if !position.x.is_nan() {
            target.x = self.output.x + position.x * self.output.w;
        }
        if !position.y.is_nan() {
            target.y = self.output.y + position.y * self.output.h;
        }
        self.cursor = self.output.clamp(target);
    }

    fn attach_tablet(&mut self, tablet: TabletId) {
        if !self.attached.contains(&tablet) {
            self.attached.push(tablet);
        }
    }

    fn detach_tablet(&mut self, tablet: TabletId) {
        self.attached.retain(|&t| t != tablet);
    }

    fn cursor_position(&self) -> Point {
        self.cursor
    }

    fn pointer_focus(&self) -> Option<SurfaceId> {
        self.focus
    }

    fn simulate_motion(&mut self) {
        self.update_focus();
    }

    fn refocus(&mut self) {
        self.refocus_count += 1;
        self.update_focus();
    }
}

impl SurfaceModel for SimSeat {
    fn surface_box(&self, surface: SurfaceId) -> Option<Rect> {
        self.surface(surface).filter(|s| s.mapped).map(|s| s.rect)
    }

    fn surface_window(&self, surface: SurfaceId) -> Option<WindowId> {
        self.surface(surface)?.window.as_ref().map(|w| w.id)
    }

    fn has_constraint(&self, surface: SurfaceId) -> bool {
        self.surface(surface).is_some_and(|s| s.constrained)
    }

    fn window_size(&self, window: WindowId) -> Point {
        self.window(window).map_or(Point::ZERO, |w| w.size)
    }

    fn x11_scale(&self, window: WindowId) -> Option<f64> {
        self.window(window)?.x11_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat() -> SimSeat {
        SimSeat::new(Scene {
            output: Rect::new(0.0, 0.0, 1000.0, 1000.0),
            cursor: Point::new(50.0, 50.0),
            surfaces: vec![
                SimSurface::new(1, Rect::new(0.0, 0.0, 500.0, 500.0)),
                SimSurface::new(2, Rect::new(100.0, 100.0, 200.0, 200.0)),
            ],
        })
    }

    #[test]
    fn initial_focus_follows_cursor() {
        assert_eq!(seat().pointer_focus(), Some(SurfaceId(1)));
    }

    #[test]
    fn topmost_surface_wins() {
        let mut seat = seat();
        seat.warp_absolute(Point::new(0.25, 0.25), TabletId(1));
        seat.simulate_motion();
        assert_eq!(seat.cursor_position(), Point::new(250.0, 250.0));
        assert_eq!(seat.pointer_focus(), Some(SurfaceId(2)));
    }

    #[test]
    fn warp_keeps_nan_axes() {
        let mut seat = seat();
        seat.warp_absolute(Point::new(f64::NAN, 0.5), TabletId(1));
        assert_eq!(seat.cursor_position(), Point::new(50.0, 500.0));
    }

    #[test]
    fn constraint_locks_cursor_and_focus() {
        let mut seat = seat();
        if let Some(surface) = seat.surface_mut(SurfaceId(1)) {
            surface.constrained = true;
        }
        seat.move_by(Point::new(700.0, 700.0));
        seat.simulate_motion();
        assert_eq!(seat.cursor_position(), Point::new(50.0, 50.0));
        assert_eq!(seat.pointer_focus(), Some(SurfaceId(1)));
    }

    #[test]
    fn warp_to_far_edge_stays_on_full_output_surface() {
        let mut seat = SimSeat::new(Scene {
            output: Rect::new(0.0, 0.0, 1000.0, 1000.0),
            cursor: Point::ZERO,
            surfaces: vec![SimSurface::new(1, Rect::new(0.0, 0.0, 1000.0, 1000.0))],
        });
        seat.warp_absolute(Point::new(1.0, 1.0), TabletId(1));
        seat.simulate_motion();
        assert_eq!(seat.pointer_focus(), Some(SurfaceId(1)));

        seat.move_by(Point::new(50.0, 50.0));
        seat.simulate_motion();
        assert_eq!(seat.pointer_focus(), Some(SurfaceId(1)));
    }

    #[test]
    fn nan_output_does_not_panic() {
        let seat = SimSeat::new(Scene {
            output: Rect::new(f64::NAN, 0.0, 10.0, 10.0),
            ..Scene::default()
        });
        assert_eq!(seat.cursor_position().y, 0.0);
    }

    #[test]
    fn unmapped_surface_has_no_box() {
        let mut seat = seat();
        if let Some(surface) = seat.surface_mut(SurfaceId(2)) {
            surface.mapped = false;
        }
        assert!(seat.surface_box(SurfaceId(2)).is_none());
        assert!(seat.surface_box(SurfaceId(1)).is_some());
    }
}
