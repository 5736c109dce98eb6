//! Shared fixtures: seeded random geometries with their expected path data
//! and bounds

#![allow(dead_code)]

use geojson_svg::{BBox, Feature, Geometry, Position, Properties};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

pub const ICON: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="448.98045206828 282.02753516689 9.000837604508 6.001465988832"><metadata>icon</metadata><path d="M449 283h8v4h-8z"/></svg>"#;

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn properties(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        other => panic!("properties must be an object, got {}", other),
    }
}

/// Round to `decimals` places, normalizing negative zero
pub fn round(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor + 0.0
}

fn random_position(rng: &mut StdRng) -> Position {
    Position::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0))
}

fn round_position(p: Position, decimals: i32) -> Position {
    Position::new(round(p.x, decimals), round(p.y, decimals))
}

fn ring_path(ring: &[Position], closed: bool) -> String {
    let mut d = String::new();
    for (i, p) in ring.iter().enumerate() {
        d.push_str(&format!("{}{} {}", if i == 0 { "M" } else { "L" }, p.x, p.y));
    }
    if closed {
        d.push('Z');
    }
    d
}

fn bounds_of<'a>(positions: impl IntoIterator<Item = &'a Position>) -> BBox {
    let mut bbox = BBox::empty();
    for p in positions {
        bbox.extend(*p);
    }
    bbox
}

/// A randomly generated geometry that knows its own path and bounds
pub trait RandomGeometry: Sized {
    fn generate(rng: &mut StdRng) -> Self;

    /// Round every coordinate so rendered numbers are predictable
    fn round(self, decimals: i32) -> Self;

    fn geometry(&self) -> Geometry;

    /// Bounds of the raw coordinates
    fn bbox(&self) -> BBox;

    /// Expected path data, for line and polygon geometries
    fn path(&self) -> Option<String> {
        None
    }

    fn feature(&self, props: Value) -> Feature {
        Feature::new(self.geometry(), properties(props))
    }
}

#[derive(Debug, Clone)]
pub struct RandomPoint {
    pub position: Position,
}

impl RandomGeometry for RandomPoint {
    fn generate(rng: &mut StdRng) -> Self {
        Self {
            position: random_position(rng),
        }
    }

    fn round(self, decimals: i32) -> Self {
        Self {
            position: round_position(self.position, decimals),
        }
    }

    fn geometry(&self) -> Geometry {
        Geometry::Point {
            coordinates: self.position,
        }
    }

    fn bbox(&self) -> BBox {
        bounds_of([&self.position])
    }
}

#[derive(Debug, Clone)]
pub struct RandomLineString {
    pub positions: Vec<Position>,
}

impl RandomGeometry for RandomLineString {
    fn generate(rng: &mut StdRng) -> Self {
        let count = rng.gen_range(2..8);
        Self {
            positions: (0..count).map(|_| random_position(rng)).collect(),
        }
    }

    fn round(self, decimals: i32) -> Self {
        Self {
            positions: self
                .positions
                .into_iter()
                .map(|p| round_position(p, decimals))
                .collect(),
        }
    }

    fn geometry(&self) -> Geometry {
        Geometry::LineString {
            coordinates: self.positions.clone(),
        }
    }

    fn bbox(&self) -> BBox {
        bounds_of(&self.positions)
    }

    fn path(&self) -> Option<String> {
        Some(ring_path(&self.positions, false))
    }
}

#[derive(Debug, Clone)]
pub struct RandomPolygon {
    pub rings: Vec<Vec<Position>>,
}

impl RandomGeometry for RandomPolygon {
    fn generate(rng: &mut StdRng) -> Self {
        let ring_count = rng.gen_range(1..3);
        let rings = (0..ring_count)
            .map(|_| {
                let count = rng.gen_range(3..7);
                let mut ring: Vec<Position> = (0..count).map(|_| random_position(rng)).collect();
                ring.push(ring[0]);
                ring
            })
            .collect();
        Self { rings }
    }

    fn round(self, decimals: i32) -> Self {
        Self {
            rings: self
                .rings
                .into_iter()
                .map(|ring| ring.into_iter().map(|p| round_position(p, decimals)).collect())
                .collect(),
        }
    }

    fn geometry(&self) -> Geometry {
        Geometry::Polygon {
            coordinates: self.rings.clone(),
        }
    }

    fn bbox(&self) -> BBox {
        bounds_of(self.rings.iter().flatten())
    }

    fn path(&self) -> Option<String> {
        Some(
            self.rings
                .iter()
                .map(|ring| ring_path(ring, true))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

/// A polygon carrying a text label
#[derive(Debug, Clone)]
pub struct RandomTextbox {
    pub polygon: RandomPolygon,
    pub text: String,
}

impl RandomGeometry for RandomTextbox {
    fn generate(rng: &mut StdRng) -> Self {
        let length = rng.gen_range(1..200);
        Self {
            polygon: RandomPolygon::generate(rng),
            text: (0..length).map(|_| rng.gen_range('a'..='z')).collect(),
        }
    }

    fn round(self, decimals: i32) -> Self {
        Self {
            polygon: self.polygon.round(decimals),
            text: self.text,
        }
    }

    fn geometry(&self) -> Geometry {
        self.polygon.geometry()
    }

    fn bbox(&self) -> BBox {
        self.polygon.bbox()
    }

    fn path(&self) -> Option<String> {
        self.polygon.path()
    }
}

/// A point drawn with [`ICON`]
#[derive(Debug, Clone)]
pub struct RandomSymbol {
    pub point: RandomPoint,
    pub rotation: f64,
    pub scale: f64,
}

impl RandomGeometry for RandomSymbol {
    fn generate(rng: &mut StdRng) -> Self {
        Self {
            point: RandomPoint::generate(rng),
            rotation: rng.gen_range(0.0..std::f64::consts::TAU),
            scale: rng.gen_range(0.5..3.0),
        }
    }

    fn round(self, decimals: i32) -> Self {
        Self {
            point: self.point.round(decimals),
            rotation: round(self.rotation, decimals),
            scale: round(self.scale, decimals),
        }
    }

    fn geometry(&self) -> Geometry {
        self.point.geometry()
    }

    /// Bounds of the symbol at its declared size
    fn bbox(&self) -> BBox {
        let (w, h) = (9.000837604508, 6.001465988832);
        let p = self.point.position;
        BBox::new(p.x - w / 2.0, p.y - h / 2.0, p.x + w / 2.0, p.y + h / 2.0)
    }
}

#[derive(Debug, Clone)]
pub struct RandomMultiPoint {
    pub points: Vec<RandomPoint>,
}

impl RandomGeometry for RandomMultiPoint {
    fn generate(rng: &mut StdRng) -> Self {
        let count = rng.gen_range(1..6);
        Self {
            points: (0..count).map(|_| RandomPoint::generate(rng)).collect(),
        }
    }

    fn round(self, decimals: i32) -> Self {
        Self {
            points: self.points.into_iter().map(|p| p.round(decimals)).collect(),
        }
    }

    fn geometry(&self) -> Geometry {
        Geometry::MultiPoint {
            coordinates: self.points.iter().map(|p| p.position).collect(),
        }
    }

    fn bbox(&self) -> BBox {
        bounds_of(self.points.iter().map(|p| &p.position))
    }
}

/// A point, a line and a polygon in one collection
#[derive(Debug, Clone)]
pub struct RandomGeometryCollection {
    pub point: RandomPoint,
    pub line: RandomLineString,
    pub polygon: RandomPolygon,
}

impl RandomGeometry for RandomGeometryCollection {
    fn generate(rng: &mut StdRng) -> Self {
        Self {
            point: RandomPoint::generate(rng),
            line: RandomLineString::generate(rng),
            polygon: RandomPolygon::generate(rng),
        }
    }

    fn round(self, decimals: i32) -> Self {
        Self {
            point: self.point.round(decimals),
            line: self.line.round(decimals),
            polygon: self.polygon.round(decimals),
        }
    }

    fn geometry(&self) -> Geometry {
        Geometry::GeometryCollection {
            geometries: vec![
                self.point.geometry(),
                self.line.geometry(),
                self.polygon.geometry(),
            ],
        }
    }

    fn bbox(&self) -> BBox {
        let mut bbox = self.point.bbox();
        bbox.extend_box(&self.line.bbox());
        bbox.extend_box(&self.polygon.bbox());
        bbox
    }
}
