//! Drawing surface abstraction
//!
//! The simulation never owns pixels. It draws entity footprints and swing
//! overlays through [`Surface`] and erases them by copying the background
//! layer back over the old region.

pub mod colors;
pub mod framebuffer;

pub use colors::Color;
pub use framebuffer::FrameBuffer;

use crate::spatial::rect::Rect;

/// Drawable target the simulation renders into
pub trait Surface {
    /// Copy the `src` region of the background layer to `dest` (top-left)
    fn blit_background(&mut self, dest: (i32, i32), src: Rect);

    /// Fill `rect` with a solid color
    fn fill_rect(&mut self, color: Color, rect: Rect);

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Whole play area as a rect anchored at the origin
    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width() as i32, self.height() as i32)
    }

    /// Restore the background under `rect`
    fn erase(&mut self, rect: Rect) {
        self.blit_background((rect.x, rect.y), rect);
    }
}
