//! Affine transforms for placing symbols
//!
//! Symbols are positioned with a single SVG `matrix(a b c d e f)` attribute.
//! The matrix is composed from translate, rotate and scale steps; each step
//! post-multiplies, so steps apply to the symbol in reverse call order.
//!
//! ## Rotation Convention
//!
//! Rotation is in radians and follows the SVG convention (Y-axis pointing
//! down, positive angles turn clockwise on screen):
//!
//! ```text
//! [cos  -sin] [x]
//! [sin   cos] [y]
//! ```

use crate::geojson::Position;

use super::svg::format_number;

/// A 2D affine transform in SVG matrix order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Check if this is effectively a no-op
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// `self × other`
    pub fn multiply(self, other: Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn translate(self, tx: f64, ty: f64) -> Affine {
        self.multiply(Affine {
            e: tx,
            f: ty,
            ..Affine::identity()
        })
    }

    pub fn rotate(self, radians: f64) -> Affine {
        if radians == 0.0 {
            return self;
        }
        let (sin_a, cos_a) = radians.sin_cos();
        self.multiply(Affine {
            a: cos_a,
            b: sin_a,
            c: -sin_a,
            d: cos_a,
            e: 0.0,
            f: 0.0,
        })
    }

    pub fn scale(self, sx: f64, sy: f64) -> Affine {
        self.multiply(Affine {
            a: sx,
            d: sy,
            ..Affine::identity()
        })
    }

    /// Transform a point
    pub fn transform_point(&self, p: Position) -> Position {
        Position::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// SVG `transform` attribute value
    pub fn to_svg(&self) -> String {
        let values: Vec<String> = self.to_array().iter().map(|v| format_number(*v)).collect();
        format!("matrix({})", values.join(" "))
    }
}

/// Placement of a symbol of size `width`×`height` centered on `center`,
/// rotated by `rotation` radians and scaled by `scale` around that center
pub fn symbol_transform(
    center: Position,
    rotation: f64,
    scale: f64,
    width: f64,
    height: f64,
) -> Affine {
    Affine::identity()
        .translate(center.x, center.y)
        .rotate(rotation)
        .scale(scale, scale)
        .translate(-center.x, -center.y)
        .translate(-width / 2.0, -height / 2.0)
}
