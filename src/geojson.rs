//! GeoJSON input model
//!
//! Only the parts of GeoJSON the renderer needs are modelled: the seven
//! geometry kinds, features with an open property map, and collections with
//! an optional declared `bbox`. Geometry types this module does not know are
//! kept as [`Geometry::Unknown`] so the renderer can skip them.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::bbox::BBox;
use crate::error::InputError;

/// Open property map of a feature
pub type Properties = serde_json::Map<String, Value>;

/// A coordinate pair; extra ordinates (altitude, measures) are dropped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(ordinates: Vec<f64>) -> Result<Self, Self::Error> {
        match ordinates.as_slice() {
            [x, y, ..] => Ok(Self::new(*x, *y)),
            _ => Err(format!(
                "a position needs at least two ordinates, found {}",
                ordinates.len()
            )),
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.x, p.y]
    }
}

impl From<[f64; 2]> for Position {
    fn from(p: [f64; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
    /// Any geometry type outside the GeoJSON core set
    #[serde(other)]
    Unknown,
}

impl Geometry {
    /// The GeoJSON `type` name, also the default style-table key
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
            Geometry::Unknown => "Unknown",
        }
    }

    /// Apply `f` to every position in the geometry, in place
    pub fn map_positions<F: FnMut(Position) -> Position>(&mut self, f: &mut F) {
        fn ring<F: FnMut(Position) -> Position>(ring: &mut [Position], f: &mut F) {
            for p in ring.iter_mut() {
                *p = f(*p);
            }
        }

        match self {
            Geometry::Point { coordinates } => *coordinates = f(*coordinates),
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                ring(coordinates, f)
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter_mut().for_each(|r| ring(r, f))
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter_mut()
                .flatten()
                .for_each(|r| ring(r, f)),
            Geometry::GeometryCollection { geometries } => {
                geometries.iter_mut().for_each(|g| g.map_positions(f))
            }
            Geometry::Unknown => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self {
            id: None,
            geometry: Some(geometry),
            properties,
        }
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key).filter(|v| !v.is_null())
    }

    /// Geometry type name, or `None` for a feature without geometry
    pub fn geometry_type(&self) -> Option<&'static str> {
        self.geometry.as_ref().map(Geometry::type_name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Declared extent of the data, used as the viewBox when present
    #[serde(default, deserialize_with = "declared_bbox")]
    pub bbox: Option<BBox>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            bbox: None,
        }
    }

    /// Reproject every coordinate, including the declared bbox corners
    pub fn map_positions<F: FnMut(Position) -> Position>(&mut self, f: &mut F) {
        for feature in &mut self.features {
            if let Some(geometry) = feature.geometry.as_mut() {
                geometry.map_positions(f);
            }
        }
        if let Some(declared) = self.bbox.as_mut() {
            let mut projected = BBox::empty();
            projected.extend(f(declared.min()));
            projected.extend(f(declared.max()));
            *declared = projected;
        }
    }
}

impl From<Feature> for FeatureCollection {
    fn from(feature: Feature) -> Self {
        Self::new(vec![feature])
    }
}

/// Top-level renderer input: a single feature or a collection
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Feature(Feature),
    FeatureCollection(FeatureCollection),
}

impl GeoJson {
    /// Classify a parsed JSON document by its top-level `type`
    ///
    /// Anything other than `Feature` or `FeatureCollection` is rejected before
    /// the rest of the document is looked at.
    pub fn from_value(value: Value) -> Result<Self, InputError> {
        let kind = value.get("type").and_then(Value::as_str).map(str::to_owned);
        match kind.as_deref() {
            Some("FeatureCollection") => Ok(GeoJson::FeatureCollection(
                serde_json::from_value(value).map_err(InputError::Shape)?,
            )),
            Some("Feature") => Ok(GeoJson::Feature(
                serde_json::from_value(value).map_err(InputError::Shape)?,
            )),
            _ => Err(InputError::InvalidType {
                found: kind.unwrap_or_else(|| "<missing>".to_string()),
            }),
        }
    }

    /// Wrap a bare feature into a one-element collection
    pub fn into_collection(self) -> FeatureCollection {
        match self {
            GeoJson::Feature(feature) => feature.into(),
            GeoJson::FeatureCollection(collection) => collection,
        }
    }
}

impl FromStr for GeoJson {
    type Err = InputError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(source).map_err(InputError::Json)?;
        Self::from_value(value)
    }
}

impl From<Feature> for GeoJson {
    fn from(feature: Feature) -> Self {
        GeoJson::Feature(feature)
    }
}

impl From<FeatureCollection> for GeoJson {
    fn from(collection: FeatureCollection) -> Self {
        GeoJson::FeatureCollection(collection)
    }
}

/// A declared bbox that cannot be read is dropped, not rejected
fn declared_bbox<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<BBox>, D::Error> {
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let bbox = serde_json::from_value::<Vec<f64>>(value.clone())
        .ok()
        .and_then(|ordinates| BBox::from_ordinates(&ordinates));
    if bbox.is_none() {
        warn!(bbox = %value, "ignoring malformed collection bbox");
    }
    Ok(bbox)
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Properties, D::Error> {
    Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feature_is_wrapped() {
        let input: GeoJson = r#"{"type":"Feature","properties":null,"geometry":{"type":"Point","coordinates":[1,2,3]}}"#
            .parse()
            .unwrap();
        let collection = input.into_collection();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(
            collection.features[0].geometry,
            Some(Geometry::Point {
                coordinates: Position::new(1.0, 2.0)
            })
        );
        assert!(collection.features[0].properties.is_empty());
    }

    #[test]
    fn test_rejects_other_top_level_types() {
        let err = GeoJson::from_value(json!({"type": "Point", "coordinates": [0, 0]})).unwrap_err();
        assert!(matches!(err, InputError::InvalidType { ref found } if found == "Point"));

        let err = GeoJson::from_value(json!({"some": "rubbish"})).unwrap_err();
        assert!(err.to_string().contains("<missing>"));
    }

    #[test]
    fn test_unknown_geometry_is_kept() {
        let input = GeoJson::from_value(json!({
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "Circle", "center": [0, 0], "radius": 4}
        }))
        .unwrap();
        let collection = input.into_collection();
        assert_eq!(collection.features[0].geometry, Some(Geometry::Unknown));
    }

    #[test]
    fn test_short_position_is_shape_error() {
        let err = GeoJson::from_value(json!({
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "Point", "coordinates": [1]}
        }))
        .unwrap_err();
        assert!(matches!(err, InputError::Shape(_)));
    }

    #[test]
    fn test_declared_bbox_shapes() {
        let parse = |bbox: Value| {
            GeoJson::from_value(json!({"type": "FeatureCollection", "bbox": bbox, "features": []}))
                .unwrap()
                .into_collection()
                .bbox
        };
        assert_eq!(parse(json!([0, 0, 0, 10, 10, 5])), Some(BBox::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(parse(json!([1, 2, 3])), None);
        assert_eq!(parse(json!("everywhere")), None);
        assert_eq!(parse(Value::Null), None);
    }

    #[test]
    fn test_map_positions_covers_declared_bbox() {
        let mut collection = GeoJson::from_value(json!({
            "type": "FeatureCollection",
            "bbox": [0, 0, 10, 10],
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "MultiPolygon", "coordinates": [[[[0, 0], [10, 10], [0, 10], [0, 0]]]]}
            }]
        }))
        .unwrap()
        .into_collection();

        collection.map_positions(&mut |p| Position::new(p.x * 2.0, -p.y));

        assert_eq!(collection.bbox, Some(BBox::new(0.0, -10.0, 20.0, 0.0)));
        match &collection.features[0].geometry {
            Some(Geometry::MultiPolygon { coordinates }) => {
                assert_eq!(coordinates[0][0][1], Position::new(20.0, -10.0));
            }
            other => panic!("expected MultiPolygon, got {:?}", other),
        }
    }
}
