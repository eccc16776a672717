//! Integer screen-space geometry

pub mod rect;

pub use rect::Rect;
