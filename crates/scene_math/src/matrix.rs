//! 4x4 matrix values
//!
//! Storage is column-major like the engine math library; rendering is
//! row-major because that is how a reader expects to see a matrix.

use core::fmt;

use crate::format_float;
use crate::vector::{Vec3, Vec4};

/// 4x4 matrix (column-major)
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[[f32; 4]; 4]", into = "[[f32; 4]; 4]"))]
pub struct Mat4 {
    pub cols: [Vec4; 4],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO, Vec4::ZERO, Vec4::ZERO, Vec4::ZERO],
    };

    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self { cols: [c0, c1, c2, c3] }
    }

    /// Build from row-major data
    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let mut cols = [Vec4::ZERO; 4];
        for (c, col) in cols.iter_mut().enumerate() {
            *col = Vec4::new(rows[0][c], rows[1][c], rows[2][c], rows[3][c]);
        }
        Self { cols }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, translation.extend(1.0))
    }

    /// Element at `row`, `col`
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.cols[col].to_array()[row]
    }

    /// One row of the matrix
    pub fn row(&self, row: usize) -> [f32; 4] {
        [self.get(row, 0), self.get(row, 1), self.get(row, 2), self.get(row, 3)]
    }

    /// All rows, top to bottom
    pub fn to_rows(&self) -> [[f32; 4]; 4] {
        [self.row(0), self.row(1), self.row(2), self.row(3)]
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[[f32; 4]; 4]> for Mat4 {
    fn from(rows: [[f32; 4]; 4]) -> Self {
        Self::from_rows(rows)
    }
}

impl From<Mat4> for [[f32; 4]; 4] {
    fn from(m: Mat4) -> Self {
        m.to_rows()
    }
}

impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("【")?;
        for r in 0..4 {
            let row = self.row(r);
            write!(
                f,
                "[{}, {}, {}, {}]",
                format_float(row[0]),
                format_float(row[1]),
                format_float(row[2]),
                format_float(row[3])
            )?;
            if r < 3 {
                f.write_str(" , ")?;
            }
        }
        f.write_str(" 】")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_round_trip_column_storage() {
        let rows = [
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ];
        let m = Mat4::from_rows(rows);
        assert_eq!(m.get(0, 3), 4.0);
        assert_eq!(m.get(3, 0), 13.0);
        assert_eq!(m.cols[1], Vec4::new(2.0, 6.0, 10.0, 14.0));
        assert_eq!(m.to_rows(), rows);
    }

    #[test]
    fn test_translation_lands_in_last_column() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.row(0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(m.row(2), [0.0, 0.0, 1.0, 3.0]);
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(
            Mat4::IDENTITY.to_string(),
            "【[1.0, 0.0, 0.0, 0.0] , [0.0, 1.0, 0.0, 0.0] , [0.0, 0.0, 1.0, 0.0] , [0.0, 0.0, 0.0, 1.0] 】"
        );
    }
}
