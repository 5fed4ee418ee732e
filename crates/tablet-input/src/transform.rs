//! Active-area mapping of absolute tablet coordinates.
//!
//! A tablet can be restricted to a sub-rectangle of its surface. Raw
//! absolute positions inside that rectangle are stretched back onto the
//! full `[0, 1]` range before the pointer subsystem maps them onto outputs.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// A normalized sub-rectangle of tablet space, stored as its two corners.
///
/// The default value is empty, which disables the mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveArea {
    pub min: Point,
    pub max: Point,
}

impl ActiveArea {
    #[must_use]
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Build from an origin + size rectangle in normalized units.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            min: rect.origin(),
            max: rect.origin() + rect.size(),
        }
    }

    /// Build from a position and size given in millimetres.
    ///
    /// Without a usable physical size the area cannot be normalized and the
    /// result is empty.
    #[must_use]
    pub fn from_millimetres(position: Point, size: Point, physical: Option<Point>) -> Self {
        if size.x <= 0.0 || size.y <= 0.0 {
            return Self::default();
        }
        let Some(physical) = physical.filter(|p| p.x > 0.0 && p.y > 0.0) else {
            tracing::warn!(
                ?position,
                ?size,
                "Active area configured but tablet reports no physical size, ignoring"
            );
            return Self::default();
        };

        Self {
            min: Point::new(position.x / physical.x, position.y / physical.y),
            max: Point::new(
                (position.x + size.x) / physical.x,
                (position.y + size.y) / physical.y,
            ),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }
}

/// Map a raw absolute position into the active area.
///
/// Each axis is renormalized independently. `NaN` axes pass through
/// untouched, so callers keep treating them as "not updated".
#[must_use]
pub fn transform_to_active_area(pos: Point, area: &ActiveArea) -> Point {
    if area.is_empty() {
        return pos;
    }

    let mut out = pos;
    if !pos.x.is_nan() {
        out.x = (pos.x - area.min.x) / (area.max.x - area.min.x);
    }
    if !pos.y.is_nan() {
        out.y = (pos.y - area.min.y) / (area.max.y - area.min.y);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_area_is_identity() {
        let area = ActiveArea::default();
        let p = Point::new(0.25, 0.75);
        assert_eq!(transform_to_active_area(p, &area), p);

        let nan = transform_to_active_area(Point::unset(), &area);
        assert!(nan.x.is_nan());
        assert!(nan.y.is_nan());
    }

    #[test]
    fn area_renormalizes_each_axis() {
        let area = ActiveArea::from_rect(Rect::new(0.0, 0.0, 10.0, 20.0));
        let out = transform_to_active_area(Point::new(5.0, 10.0), &area);
        assert_eq!(out, Point::new(0.5, 0.5));
    }

    #[test]
    fn offset_area() {
        let area = ActiveArea::new(Point::new(0.25, 0.5), Point::new(0.75, 1.0));
        let out = transform_to_active_area(Point::new(0.5, 0.75), &area);
        assert!((out.x - 0.5).abs() < f64::EPSILON);
        assert!((out.y - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn nan_axis_passes_through() {
        let area = ActiveArea::from_rect(Rect::new(0.0, 0.0, 10.0, 20.0));
        let out = transform_to_active_area(Point::new(f64::NAN, 10.0), &area);
        assert!(out.x.is_nan());
        assert_eq!(out.y, 0.5);
    }

    #[test]
    fn millimetre_area() {
        let area = ActiveArea::from_millimetres(
            Point::new(50.0, 25.0),
            Point::new(100.0, 50.0),
            Some(Point::new(200.0, 100.0)),
        );
        assert_eq!(area.min, Point::new(0.25, 0.25));
        assert_eq!(area.max, Point::new(0.75, 0.75));
    }

    #[test]
    fn millimetre_area_without_physical_size_is_empty() {
        let area = ActiveArea::from_millimetres(Point::ZERO, Point::new(100.0, 50.0), None);
        assert!(area.is_empty());

        let zero_size = ActiveArea::from_millimetres(
            Point::ZERO,
            Point::ZERO,
            Some(Point::new(200.0, 100.0)),
        );
        assert!(zero_size.is_empty());
    }
}
