//! In-memory surface with a background layer
//!
//! Used by the headless runner and by tests that need to observe what the
//! simulation drew or erased.

use crate::render::colors::{Color, BLACK};
use crate::render::Surface;
use crate::spatial::rect::Rect;

/// Pixel buffer plus the background it is restored from
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    background: Vec<Color>,
}

impl FrameBuffer {
    /// Surface filled with a uniform background color
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![background; len],
            background: vec![background; len],
        }
    }

    /// Black surface
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(width, height, BLACK)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn background_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.background[i])
    }

    /// Number of pixels currently showing `color`
    pub fn count(&self, color: Color) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Whether every pixel of `rect` (clipped to the surface) matches the background
    pub fn is_clear(&self, rect: Rect) -> bool {
        let Some(area) = self.bounds().clip(&rect) else {
            return true;
        };
        (area.y..area.bottom()).all(|y| {
            (area.x..area.right()).all(|x| self.pixel(x, y) == self.background_pixel(x, y))
        })
    }
}

impl Surface for FrameBuffer {
    fn blit_background(&mut self, dest: (i32, i32), src: Rect) {
        for dy in 0..src.h.max(0) {
            for dx in 0..src.w.max(0) {
                let (Some(from), Some(to)) = (
                    self.index(src.x + dx, src.y + dy),
                    self.index(dest.0 + dx, dest.1 + dy),
                ) else {
                    continue;
                };
                self.pixels[to] = self.background[from];
            }
        }
    }

    fn fill_rect(&mut self, color: Color, rect: Rect) {
        let Some(area) = self.bounds().clip(&rect) else {
            return;
        };
        for y in area.y..area.bottom() {
            let row = y as usize * self.width as usize;
            for x in area.x..area.right() {
                self.pixels[row + x as usize] = color;
            }
        }
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::colors::{AGGRO, WHITE};

    #[test]
    fn test_fill_then_erase() {
        let mut fb = FrameBuffer::blank(50, 50);
        let rect = Rect::new(10, 10, 5, 5);

        fb.fill_rect(WHITE, rect);
        assert_eq!(fb.count(WHITE), 25);
        assert!(!fb.is_clear(rect));

        fb.erase(rect);
        assert_eq!(fb.count(WHITE), 0);
        assert!(fb.is_clear(rect));
    }

    #[test]
    fn test_fill_clips_to_bounds() {
        let mut fb = FrameBuffer::blank(10, 10);
        fb.fill_rect(AGGRO, Rect::new(-5, -5, 10, 10));
        assert_eq!(fb.count(AGGRO), 25);
        assert_eq!(fb.pixel(0, 0), Some(AGGRO));
        assert_eq!(fb.pixel(5, 5), Some(BLACK));
    }

    #[test]
    fn test_bounds() {
        let fb = FrameBuffer::blank(800, 600);
        assert_eq!(fb.bounds(), Rect::new(0, 0, 800, 600));
    }
}
