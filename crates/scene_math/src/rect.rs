//! 2D rectangle values

use core::fmt;

use crate::format_float;
use crate::vector::Vec2;

/// Axis-aligned 2D rectangle given by its corner and size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x:{}, y:{}, width:{}, height:{})",
            format_float(self.x),
            format_float(self.y),
            format_float(self.width),
            format_float(self.height)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_display() {
        let r = Rect::new(0.0, 10.0, 100.0, 50.0);
        assert_eq!(r.to_string(), "(x:0.0, y:10.0, width:100.0, height:50.0)");
        assert_eq!(r.size(), Vec2::new(100.0, 50.0));
    }
}
