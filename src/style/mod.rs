//! Style resolution
//!
//! A [`Style`] is an open attribute map, the same shape as feature
//! properties. Styles are picked from a [`StyleTable`] by geometry type or by
//! a type-selector value, merged under the feature's own properties, and
//! finally turned into SVG paint attributes by [`paint::resolve_paint`].

pub mod paint;
pub mod table;

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::bbox::BBox;
use crate::geojson::{Feature, Properties};
use crate::renderer::svg::{attr_value, format_number};

pub use paint::{resolve_paint, PaintAttributes};
pub use table::StyleTable;

/// A set of paint and text attributes keyed by their property names
/// (`weight`, `stroke`, `fill`, `fontSize`, `className`, ...)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Style(Properties);

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_properties(properties: Properties) -> Self {
        Self(properties)
    }

    /// Builder-style setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Overlay `overrides` on top of this style; overriding keys win
    pub fn merged(&self, overrides: &Properties) -> Style {
        let mut merged = self.0.clone();
        merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        Style(merged)
    }

    pub fn properties(&self) -> &Properties {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw value, treating `null` as absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Value only if it is truthy: not `null`, `false`, `0`, NaN or `""`
    pub fn truthy(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| is_truthy(v))
    }

    /// Truthy value rendered as an attribute string
    pub fn text(&self, key: &str) -> Option<String> {
        self.truthy(key).map(attr_value)
    }

    /// Truthy numeric value; numeric strings are accepted
    pub fn number(&self, key: &str) -> Option<f64> {
        let n = match self.truthy(key)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        (n != 0.0 && !n.is_nan()).then_some(n)
    }

    pub fn weight(&self) -> Option<f64> {
        self.number("weight")
    }

    pub fn radius(&self) -> Option<f64> {
        self.number("radius")
    }

    pub fn font_size(&self) -> Option<f64> {
        self.number("fontSize")
    }

    pub fn line_height(&self) -> Option<f64> {
        self.number("lineHeight")
    }

    pub fn class_name(&self) -> Option<String> {
        self.text("className")
    }

    /// `"{base} {className}"`, trimmed when there is no class name
    pub fn class_list(&self, base: &str) -> String {
        match self.class_name() {
            Some(class) => format!("{} {}", base, class).trim().to_string(),
            None => base.to_string(),
        }
    }
}

impl From<Properties> for Style {
    fn from(properties: Properties) -> Self {
        Self(properties)
    }
}

/// JavaScript-style truthiness, which the style cascade is defined in terms of
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a type-selector value as a registry key
pub fn selector_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_f64().map(format_number),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Callback computing the whole style of a feature from the running and
/// feature bounding boxes
pub type StyleFn = dyn Fn(&Feature, &BBox, &BBox) -> Style;

/// Callback picking a base style for a feature from the style table
pub type SelectorFn = dyn Fn(&Feature, &StyleTable) -> Style;

/// Where paint styles come from
pub enum StyleSource {
    /// Per-type styles merged under feature properties
    Table(StyleTable),
    /// Full override: the function's result is used verbatim
    Function(Box<StyleFn>),
}

impl StyleSource {
    pub fn table(&self) -> Option<&StyleTable> {
        match self {
            StyleSource::Table(table) => Some(table),
            StyleSource::Function(_) => None,
        }
    }
}

impl Default for StyleSource {
    fn default() -> Self {
        StyleSource::Table(StyleTable::default())
    }
}

impl fmt::Debug for StyleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleSource::Table(table) => f.debug_tuple("Table").field(table).finish(),
            StyleSource::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// How a feature's "type" is determined for style, plugin and decorator lookup
pub enum TypeSelector {
    /// Read the type from this feature property
    ByProperty(String),
    /// Compute the base style directly
    BySelectorFunction(Box<SelectorFn>),
}

impl TypeSelector {
    pub fn property(name: impl Into<String>) -> Self {
        TypeSelector::ByProperty(name.into())
    }

    pub fn function(f: impl Fn(&Feature, &StyleTable) -> Style + 'static) -> Self {
        TypeSelector::BySelectorFunction(Box::new(f))
    }

    /// Name of the selecting property, if selection is property based
    pub fn property_name(&self) -> Option<&str> {
        match self {
            TypeSelector::ByProperty(name) => Some(name),
            TypeSelector::BySelectorFunction(_) => None,
        }
    }

    /// The feature's type value, if selection is property based and the
    /// property is set
    pub fn feature_type(&self, feature: &Feature) -> Option<String> {
        let name = self.property_name()?;
        feature.property(name).and_then(selector_key)
    }
}

impl From<&str> for TypeSelector {
    fn from(name: &str) -> Self {
        TypeSelector::property(name)
    }
}

impl From<String> for TypeSelector {
    fn from(name: String) -> Self {
        TypeSelector::property(name)
    }
}

impl fmt::Debug for TypeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSelector::ByProperty(name) => f.debug_tuple("ByProperty").field(name).finish(),
            TypeSelector::BySelectorFunction(_) => f.write_str("BySelectorFunction(..)"),
        }
    }
}

/// Pick the base style for a feature
///
/// With a selector function its result is returned as is. With a property
/// selector the property value is the table key; without a selector the
/// geometry type is. Missing entries resolve to an empty style.
pub fn select_style(
    feature: &Feature,
    source: &StyleSource,
    selector: Option<&TypeSelector>,
) -> Style {
    let empty = StyleTable::empty();
    let table = source.table().unwrap_or(&empty);

    let key = match selector {
        Some(TypeSelector::BySelectorFunction(select)) => return select(feature, table),
        Some(TypeSelector::ByProperty(_)) => selector.and_then(|s| s.feature_type(feature)),
        None => feature.geometry_type().map(str::to_string),
    };

    key.and_then(|k| table.get(&k).cloned()).unwrap_or_default()
}

/// Resolve the complete style of a feature
///
/// A function style source overrides everything; otherwise the selected
/// base style is merged under the feature's properties.
pub fn feature_style(
    feature: &Feature,
    source: &StyleSource,
    selector: Option<&TypeSelector>,
    bbox: &BBox,
    feature_bounds: &BBox,
) -> Style {
    match source {
        StyleSource::Function(style) => style(feature, bbox, feature_bounds),
        StyleSource::Table(_) => {
            select_style(feature, source, selector).merged(&feature.properties)
        }
    }
}
