//! Bounding box accumulation
//!
//! Every render pass carries two of these: one for the whole document and one
//! for the feature currently being drawn. Both start out empty and grow in
//! place as coordinates are visited.

use serde::{Deserialize, Serialize};

use crate::geojson::Position;

/// An axis-aligned box stored as `[min_x, min_y, max_x, max_y]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The identity box `[inf, inf, -inf, -inf]`
    ///
    /// The first call to [`BBox::extend`] turns it into a degenerate point box.
    pub fn empty() -> Self {
        Self::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        )
    }

    /// True until at least one point has been folded in
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Grow the box to include a point
    pub fn extend(&mut self, point: Position) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    /// Grow the box to include both corners of another box
    ///
    /// Folding in an empty box leaves this one untouched.
    pub fn extend_box(&mut self, other: &BBox) {
        if other.is_empty() {
            return;
        }
        self.extend(other.min());
        self.extend(other.max());
    }

    /// Inflate (or, with a negative amount, deflate) all four edges
    pub fn pad(&mut self, amount: f64) {
        self.min_x -= amount;
        self.min_y -= amount;
        self.max_x += amount;
        self.max_y += amount;
    }

    pub fn min(&self) -> Position {
        Position::new(self.min_x, self.min_y)
    }

    pub fn max(&self) -> Position {
        Position::new(self.max_x, self.max_y)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Read a GeoJSON `bbox` member of any dimension
    ///
    /// A box of `2n` ordinates lists all minima, then all maxima; only the
    /// first two axes are kept. Odd or short arrays give `None`.
    pub fn from_ordinates(ordinates: &[f64]) -> Option<Self> {
        let len = ordinates.len();
        if len < 4 || len % 2 != 0 {
            return None;
        }
        let half = len / 2;
        Some(Self::new(
            ordinates[0],
            ordinates[1],
            ordinates[half],
            ordinates[half + 1],
        ))
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// Format as an SVG `viewBox` value: `min_x min_y width height`
    pub fn to_view_box(&self) -> String {
        format!(
            "{} {} {} {}",
            self.min_x,
            self.min_y,
            self.width(),
            self.height()
        )
    }
}

impl Default for BBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<[f64; 4]> for BBox {
    fn from(b: [f64; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }
}

impl From<BBox> for [f64; 4] {
    fn from(b: BBox) -> Self {
        b.to_array()
    }
}
