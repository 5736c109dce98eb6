//! Path building for line and polygon geometries
//!
//! Converts nested coordinate arrays into SVG path `d` attribute strings,
//! growing the running and feature bounding boxes with every visited vertex.

use crate::bbox::BBox;
use crate::geojson::{Feature, Geometry, Position};

use super::svg::format_number;

/// Path data for geometries without any coordinates
pub const EMPTY_PATH: &str = "M0 0";

/// Coordinates of a line or polygon geometry at any nesting depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rings<'a> {
    /// A single ring or line string
    Line(&'a [Position]),
    /// A polygon's rings or a multi line string
    Lines(&'a [Vec<Position>]),
    /// A multi polygon
    Polygons(&'a [Vec<Vec<Position>>]),
}

impl<'a> Rings<'a> {
    /// Path coordinates of a line or polygon geometry
    pub fn of(geometry: &'a Geometry) -> Option<Rings<'a>> {
        match geometry {
            Geometry::LineString { coordinates } => Some(Rings::Line(coordinates)),
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                Some(Rings::Lines(coordinates))
            }
            Geometry::MultiPolygon { coordinates } => Some(Rings::Polygons(coordinates)),
            _ => None,
        }
    }
}

/// Build path data for `coordinates`
///
/// Every ring becomes `M x y` followed by `L x y` per vertex, plus `Z` when
/// `closed`; rings are separated by a space. Coordinates without any vertex
/// produce [`EMPTY_PATH`].
pub fn coordinates_to_path(
    coordinates: Rings<'_>,
    closed: bool,
    bbox: &mut BBox,
    feature_bounds: &mut BBox,
) -> String {
    let path = match coordinates {
        Rings::Line(ring) => ring_to_path(ring, closed, bbox, feature_bounds),
        Rings::Lines(rings) => rings
            .iter()
            .map(|ring| coordinates_to_path(Rings::Line(ring), closed, bbox, feature_bounds))
            .collect::<Vec<_>>()
            .join(" "),
        Rings::Polygons(polygons) => polygons
            .iter()
            .map(|rings| coordinates_to_path(Rings::Lines(rings), closed, bbox, feature_bounds))
            .collect::<Vec<_>>()
            .join(" "),
    };

    if path.is_empty() {
        EMPTY_PATH.to_string()
    } else {
        path
    }
}

fn ring_to_path(ring: &[Position], closed: bool, bbox: &mut BBox, feature_bounds: &mut BBox) -> String {
    if ring.is_empty() {
        return String::new();
    }

    let mut d = String::new();
    for (i, p) in ring.iter().enumerate() {
        d.push(if i == 0 { 'M' } else { 'L' });
        d.push_str(&format_number(p.x));
        d.push(' ');
        d.push_str(&format_number(p.y));
        bbox.extend(*p);
        feature_bounds.extend(*p);
    }
    if closed {
        d.push('Z');
    }
    d
}

/// Replaces the built-in path builder for features of one type
///
/// A decorator receives the same inputs as [`coordinates_to_path`] and is
/// responsible for growing both bounding boxes itself.
pub trait PathDecorator {
    fn decorate(
        &self,
        feature: &Feature,
        coordinates: Rings<'_>,
        closed: bool,
        bbox: &mut BBox,
        feature_bounds: &mut BBox,
    ) -> String;
}

/// Adapter running a closure as a [`PathDecorator`]
pub struct FnDecorator<F>(pub F);

impl<F> PathDecorator for FnDecorator<F>
where
    F: Fn(&Feature, Rings<'_>, bool, &mut BBox, &mut BBox) -> String,
{
    fn decorate(
        &self,
        feature: &Feature,
        coordinates: Rings<'_>,
        closed: bool,
        bbox: &mut BBox,
        feature_bounds: &mut BBox,
    ) -> String {
        (self.0)(feature, coordinates, closed, bbox, feature_bounds)
    }
}
