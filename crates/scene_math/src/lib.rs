//! # scene_math - Scene Value Math
//!
//! The small set of math values a scene property can carry, together with the
//! compact textual forms the dump writes for them:
//! - `Vec2` / `Vec3` / `Vec4` render as `(x, y, z)`
//! - `Mat4` renders row-major inside `【 】`
//! - `Color` renders as `(r, g, b, a)`
//! - `Aabb` renders as `Center: (..), Extents: (..)`
//!
//! Floats always print with a decimal point so `1` and `1.0` never collide in
//! array compression.

pub mod vector;
pub mod matrix;
pub mod color;
pub mod rect;
pub mod bounds;

pub use vector::*;
pub use matrix::*;
pub use color::*;
pub use rect::*;
pub use bounds::*;

/// Format a float the way every value in a dump is written.
///
/// Uses the shortest round-tripping representation but keeps a trailing
/// `.0` for integral values.
#[inline]
pub fn format_float(value: f32) -> String {
    format!("{:?}", value)
}

/// Same as [`format_float`] for double precision values
#[inline]
pub fn format_double(value: f64) -> String {
    format!("{:?}", value)
}

pub mod prelude {
    pub use crate::vector::{Vec2, Vec3, Vec4};
    pub use crate::matrix::Mat4;
    pub use crate::color::Color;
    pub use crate::rect::Rect;
    pub use crate::bounds::Aabb;
    pub use crate::{format_float, format_double};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float_keeps_decimal_point() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_double(42.0), "42.0");
    }
}
