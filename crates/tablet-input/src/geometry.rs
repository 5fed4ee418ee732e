//! Points and rectangles.
//!
//! All values are `f64`. Positions in tablet space are normalized to
//! `[0, 1]` per axis; positions in the global layout are logical pixels.
//! `NaN` in a tablet-space axis means "not updated by this event".

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A 2D point or vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both axes set to `NaN`.
    #[must_use]
    pub const fn unset() -> Self {
        Self {
            x: f64::NAN,
            y: f64::NAN,
        }
    }

    /// Replace `NaN` axes with zero. Used for relative deltas where a
    /// missing axis means "no movement".
    #[must_use]
    pub fn nan_to_zero(self) -> Self {
        Self {
            x: if self.x.is_nan() { 0.0 } else { self.x },
            y: if self.y.is_nan() { 0.0 } else { self.y },
        }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise scale.
    #[must_use]
    pub fn scale(self, by: Self) -> Self {
        Self {
            x: self.x * by.x,
            y: self.y * by.y,
        }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// An axis-aligned rectangle: origin plus size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub const fn size(&self) -> Point {
        Point::new(self.w, self.h)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.origin().is_finite() && self.size().is_finite()
    }

    /// `true` if either dimension is zero or negative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Half-open containment test (`[x, x + w)`).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.w && p.y < self.y + self.h
    }

    /// Clamp a point into the rectangle.
    ///
    /// The far edge is excluded like in [`Rect::contains`], so a clamped
    /// point on a non-empty rectangle is always contained. `NaN` never
    /// panics: a `NaN` coordinate lands on the near edge, a `NaN` origin
    /// leaves the axis unclamped and a `NaN` size counts as zero.
    #[must_use]
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            clamp_axis(p.x, self.x, self.w),
            clamp_axis(p.y, self.y, self.h),
        )
    }
}

fn clamp_axis(v: f64, start: f64, len: f64) -> f64 {
    let end = start + len.max(0.0);
    // Largest value still below `end`, without going under `start`.
    let last = (end - end.abs().max(1.0) * f64::EPSILON).max(start);
    v.max(start).min(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 2.0);
        assert_eq!(a - b, Point::new(2.0, 2.0));
        assert_eq!(a + b, Point::new(4.0, 6.0));
        assert_eq!(a * 2.0, Point::new(6.0, 8.0));
        assert_eq!(a.scale(b), Point::new(3.0, 8.0));
    }

    #[test]
    fn nan_to_zero_only_touches_nan_axes() {
        let p = Point::new(f64::NAN, 5.0).nan_to_zero();
        assert_eq!(p, Point::new(0.0, 5.0));
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(109.9, 59.9)));
        assert!(!r.contains(Point::new(110.0, 30.0)));
        assert!(!r.contains(Point::new(9.9, 30.0)));
    }

    #[test]
    fn rect_clamp_and_empty() {
        let r = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let p = r.clamp(Point::new(-5.0, 2000.0));
        assert_eq!(p.x, 0.0);
        assert!(p.y < 1080.0 && p.y > 1079.99);
        assert_eq!(r.clamp(Point::new(5.0, 7.0)), Point::new(5.0, 7.0));
        assert!(!r.is_empty());
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn clamped_far_edge_is_contained() {
        let r = Rect::new(-100.0, 50.0, 1000.0, 1000.0);
        let p = r.clamp(Point::new(900.0, 1050.0));
        assert!(r.contains(p));
        assert!(r.contains(r.clamp(Point::new(1e9, 1e9))));
    }

    #[test]
    fn finiteness() {
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).is_finite());
        assert!(!Rect::new(0.0, f64::INFINITY, 10.0, 10.0).is_finite());
        assert!(!Point::new(f64::NAN, 1.0).is_finite());
    }

    #[test]
    fn clamp_tolerates_nan() {
        let r = Rect::new(f64::NAN, 0.0, 10.0, f64::NAN);
        let p = r.clamp(Point::new(3.0, 4.0));
        assert_eq!(p.x, 3.0);
        assert_eq!(p.y, 0.0);

        let p = Rect::new(0.0, 0.0, 10.0, 10.0).clamp(Point::new(f64::NAN, 20.0));
        assert_eq!(p.x, 0.0);
        assert!(p.y < 10.0);
    }
}
