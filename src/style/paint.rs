//! Turning a resolved style into SVG paint attributes
//!
//! Stroke attributes are emitted when the style has a `stroke` or a
//! `weight`, fill attributes when it has a `fill`. A stroked feature's
//! bounds grow by its weight so wide strokes stay inside the viewBox, and a
//! `direction` adds an arrow marker.

use std::fmt;

use crate::bbox::BBox;
use crate::renderer::svg::{attr_value, escape_xml};
use crate::renderer::symbol::{Arrow, Defs};

use super::Style;

/// Ordered SVG presentation attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaintAttributes(Vec<(&'static str, String)>);

impl PaintAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.0.push((name, value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(n, v)| (*n, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Renders as ` name="value"` pairs, each preceded by a space
impl fmt::Display for PaintAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.0 {
            write!(f, r#" {}="{}""#, name, escape_xml(value))?;
        }
        Ok(())
    }
}

/// Compute paint attributes for a style
///
/// May grow `feature_bounds` by the stroke weight (folding it into `bbox`)
/// and may register an arrow marker in `defs`.
pub fn resolve_paint(
    style: &Style,
    geometry_type: Option<&str>,
    defs: &mut Defs,
    bbox: &mut BBox,
    feature_bounds: &mut BBox,
) -> PaintAttributes {
    let mut attrs = PaintAttributes::new();

    if style.truthy("stroke").is_some() || style.weight().is_some() {
        if let Some(stroke) = style.text("stroke").or_else(|| style.text("color")) {
            attrs.push("stroke", stroke);
        }
        if let Some(opacity) = style.get("opacity") {
            attrs.push("stroke-opacity", attr_value(opacity));
        }
        if let Some(weight) = style.get("weight") {
            attrs.push("stroke-width", attr_value(weight));
        }
        attrs.push(
            "stroke-linecap",
            style.text("lineCap").unwrap_or_else(|| "round".to_string()),
        );
        attrs.push(
            "stroke-linejoin",
            style.text("lineJoin").unwrap_or_else(|| "round".to_string()),
        );
        if let Some(dash_array) = style.text("dashArray") {
            attrs.push("stroke-dasharray", dash_array);
        }
        if let Some(dash_offset) = style.text("dashOffset") {
            attrs.push("stroke-dashoffset", dash_offset);
        }

        if let Some(weight) = style.weight() {
            feature_bounds.pad(weight);
            bbox.extend_box(feature_bounds);
        }

        if let Some(arrow) = Arrow::from_style(style) {
            let id = defs.arrow(&arrow);
            attrs.push(arrow.marker_attribute(), format!("url(#{})", id));
        }
    } else {
        attrs.push("stroke", "none");
    }

    if let Some(fill) = style.text("fill") {
        attrs.push("fill", fill);
        if let Some(opacity) = style.text("fillOpacity").or_else(|| style.text("opacity")) {
            attrs.push("fill-opacity", opacity);
        }
        let fill_rule = style.text("fillRule").unwrap_or_else(|| {
            if geometry_type == Some("MultiPolygon") {
                "nonzero".to_string()
            } else {
                "evenodd".to_string()
            }
        });
        attrs.push("fill-rule", fill_rule);
    } else {
        attrs.push("fill", "none");
    }

    attrs
}
