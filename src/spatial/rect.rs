//! Axis-aligned integer rectangles for hit-boxes and attack-boxes

use serde::{Deserialize, Serialize};

use crate::core::types::{Size, Vec2};

/// Axis-aligned rectangle in whole pixels; `x`/`y` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rect of `size` centered on the rounded `center`
    ///
    /// Half extents use integer division, so odd sizes lean up-left.
    pub fn centered(center: Vec2, size: Size) -> Self {
        Self {
            x: center.x.round() as i32 - size.w / 2,
            y: center.y.round() as i32 - size.h / 2,
            w: size.w,
            h: size.h,
        }
    }

    /// Rect from fractional coordinates, truncating toward zero
    pub fn from_f32(x: f32, y: f32, w: i32, h: i32) -> Self {
        Self { x: x as i32, y: y as i32, w, h }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Strict overlap test; touching edges do not collide
    pub fn collides(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Point containment, right/bottom edges exclusive
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether `other` lies entirely inside `self`
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Index of the first rect in `others` that collides with `self`
    pub fn collide_list<'a>(&self, others: impl IntoIterator<Item = &'a Rect>) -> Option<usize> {
        others.into_iter().position(|r| self.collides(r))
    }

    /// Grow by `margin` on every side
    pub fn inflate(&self, margin: i32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            w: self.w + 2 * margin,
            h: self.h + 2 * margin,
        }
    }

    /// Overlap of two rects, if any
    pub fn clip(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > x && bottom > y {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }
}
