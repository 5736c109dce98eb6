//! Shared SVG definitions: symbols and arrow markers
//!
//! Point features typed as symbols reference an SVG `<symbol>` through
//! `<use>`, and directed strokes reference an arrow `<marker>`. Both live in
//! the document's `<defs>` block, registered once per distinct definition.

use std::sync::OnceLock;

use base64::Engine as _;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::style::Style;

use super::svg::format_number;

/// Prefix of symbol definition ids
pub const SYMBOL_ID_PREFIX: &str = "feature-symbol-";

const SVG_DATA_URI: &str = "data:image/svg+xml;base64,";

/// Errors that can occur while reading a symbol source
#[derive(Debug, Error)]
pub enum SymbolError {
    /// Base64 payload of a data URI could not be decoded
    #[error("invalid base64 in symbol data URI: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded data URI is not UTF-8 text
    #[error("symbol data URI is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, PartialEq)]
struct Definition {
    id: String,
    markup: String,
}

/// Collected `<defs>` entries in registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defs {
    entries: Vec<Definition>,
}

impl Defs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Definition markup in registration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.markup.as_str())
    }

    /// Whether a definition with exactly this id exists
    pub fn contains_id(&self, id: &str) -> bool {
        self.entries.iter().any(|d| d.id == id)
    }

    /// Register a definition unless identical markup is already present.
    /// Returns whether it was added.
    pub fn push_unique(&mut self, id: impl Into<String>, markup: impl Into<String>) -> bool {
        let markup = markup.into();
        if self.entries.iter().any(|d| d.markup == markup) {
            return false;
        }
        self.entries.push(Definition {
            id: id.into(),
            markup,
        });
        true
    }

    /// Register a `<symbol>` for an SVG source and return its id
    ///
    /// The source is cleaned of its outer `<svg>` element, XML prologue and
    /// `<metadata>`; the id is derived from the cleaned content and the
    /// viewBox, so identical symbols share one id.
    pub fn symbol(&mut self, source: &str, view_box: &[f64; 4]) -> String {
        let content = clean_symbol_source(source);
        let view_box = view_box
            .iter()
            .map(|v| format_number(*v))
            .collect::<Vec<_>>()
            .join(" ");
        let id = symbol_id(&content, &view_box);
        let markup = format!(
            r#"<symbol id="{}" viewBox="{}">{}</symbol>"#,
            id, view_box, content
        );
        self.push_unique(id.clone(), markup);
        id
    }

    /// Register an arrow `<marker>` and return its id
    pub fn arrow(&mut self, arrow: &Arrow) -> String {
        let id = arrow.id();
        if !self.contains_id(&id) {
            let markup = arrow.to_marker(&id);
            self.entries.push(Definition {
                id: id.clone(),
                markup,
            });
        }
        id
    }
}

/// Symbol reference taken from a feature's `symbol` property
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// SVG markup of the symbol
    pub source: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Symbol {
    /// Read a `{src, width, height}` object
    ///
    /// Returns `Ok(None)` when there is no usable `src`. A `src` of the form
    /// `data:image/svg+xml;base64,...` is decoded.
    pub fn from_value(value: Option<&Value>) -> Result<Option<Symbol>, SymbolError> {
        let Some(Value::Object(symbol)) = value else {
            return Ok(None);
        };
        let Some(src) = symbol.get("src").and_then(Value::as_str) else {
            return Ok(None);
        };
        if src.trim().is_empty() {
            return Ok(None);
        }

        let dimensions = Style::from_properties(symbol.clone());
        Ok(Some(Symbol {
            source: decode_source(src)?,
            width: dimensions.number("width"),
            height: dimensions.number("height"),
        }))
    }

    /// `viewBox` declared in the source, if any
    pub fn view_box(&self) -> Option<[f64; 4]> {
        parse_view_box(&self.source)
    }
}

fn decode_source(src: &str) -> Result<String, SymbolError> {
    match src.trim().strip_prefix(SVG_DATA_URI) {
        Some(payload) => {
            let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
            Ok(String::from_utf8(bytes)?)
        }
        None => Ok(src.to_string()),
    }
}

/// Extract a four-number `viewBox` attribute from SVG markup
pub fn parse_view_box(svg: &str) -> Option<[f64; 4]> {
    static RE: OnceLock<Regex> = OnceLock::new();

    let re = RE.get_or_init(|| {
        Regex::new(r#"view[Bb]ox=["']([^"']+)["']"#).expect("view box pattern is valid")
    });
    let raw = re.captures(svg)?.get(1)?.as_str();
    let values: Vec<f64> = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;

    values.try_into().ok()
}

/// Strip the outer `<svg>` tags, XML declaration, DOCTYPE and metadata
pub fn clean_symbol_source(source: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();

    let re = RE.get_or_init(|| {
        Regex::new(
            r"(?s)<\?xml.*?\?>|<!DOCTYPE[^\[>]*(\[.*?\])?\s*>|<metadata[^>]*>.*?</metadata>|</?svg[^>]*>",
        )
        .expect("symbol cleanup pattern is valid")
    });
    re.replace_all(source.trim(), "").trim().to_string()
}

/// Symbol id derived from the cleaned content and its viewBox
pub fn symbol_id(content: &str, view_box: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(view_box.as_bytes());
    hasher.update(b"\n");
    hasher.update(content.as_bytes());
    let hash = hasher.finalize().to_hex();
    format!("{}{}", SYMBOL_ID_PREFIX, &hash.as_str()[..16])
}

/// An arrowhead marker for a directed stroke
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    /// Marker width along the line
    pub length: f64,
    /// Marker height across the line
    pub thickness: f64,
    /// Text of the `direction` value, part of the marker id
    pub direction: String,
    /// Head at the line's end; only a numeric `1` does this
    pub forward: bool,
}

impl Arrow {
    /// Arrow for a style with a truthy `direction`
    ///
    /// `arrowLength` defaults to twenty times the stroke weight and
    /// `arrowThickness` to ten times.
    pub fn from_style(style: &Style) -> Option<Arrow> {
        let direction = style.truthy("direction")?;
        let forward = matches!(direction, Value::Number(n) if n.as_f64() == Some(1.0));
        let weight = style.weight().unwrap_or(0.0);
        Some(Arrow {
            length: style.number("arrowLength").unwrap_or(weight * 20.0),
            thickness: style.number("arrowThickness").unwrap_or(weight * 10.0),
            direction: super::svg::attr_value(direction),
            forward,
        })
    }

    pub fn points_forward(&self) -> bool {
        self.forward
    }

    /// Marker attribute referencing this arrow
    pub fn marker_attribute(&self) -> &'static str {
        if self.points_forward() {
            "marker-end"
        } else {
            "marker-start"
        }
    }

    /// `arrow-{thickness}-{length}-{direction}` with dots removed
    pub fn id(&self) -> String {
        format!(
            "arrow-{}-{}-{}",
            format_number(self.thickness),
            format_number(self.length),
            self.direction
        )
        .replace('.', "")
    }

    fn to_marker(&self, id: &str) -> String {
        let len = format_number(self.length);
        let w = format_number(self.thickness);
        let half = format_number(self.thickness / 2.0);
        let (d, ref_x) = if self.points_forward() {
            (format!("M 0 0 L 0 {} L {} {} Z", w, len, half), len.clone())
        } else {
            (
                format!("M {} 0 L {} {} L 0 {} Z", len, len, w, half),
                "0".to_string(),
            )
        };
        format!(
            r#"<marker id="{id}" markerWidth="{len}" markerHeight="{w}" orient="auto" refX="{ref_x}" refY="{half}"><path id="path-{id}" class="arrow-path" d="{d}" /></marker>"#,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ICON: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="448.98045206828 282.02753516689 9.000837604508 6.001465988832"><metadata>made by hand</metadata><path d="M449 283h8v4h-8z"/></svg>"#;

    #[test]
    fn test_parse_view_box() {
        assert_eq!(
            parse_view_box(ICON),
            Some([448.98045206828, 282.02753516689, 9.000837604508, 6.001465988832])
        );
        assert_eq!(parse_view_box("<svg viewbox='0,0,10,20'/>"), Some([0.0, 0.0, 10.0, 20.0]));
        assert_eq!(parse_view_box("<svg/>"), None);
        assert_eq!(parse_view_box(r#"<svg viewBox="0 0 10"/>"#), None);
    }

    #[test]
    fn test_clean_symbol_source() {
        assert_eq!(clean_symbol_source(ICON), r#"<path d="M449 283h8v4h-8z"/>"#);
    }

    #[test]
    fn test_symbol_registered_once() {
        let mut defs = Defs::new();
        let a = defs.symbol(ICON, &[0.0, 0.0, 9.0, 6.0]);
        let b = defs.symbol(ICON, &[0.0, 0.0, 9.0, 6.0]);
        assert_eq!(a, b);
        assert!(a.starts_with(SYMBOL_ID_PREFIX));
        assert_eq!(defs.len(), 1);
        let markup = defs.iter().next().unwrap();
        assert!(markup.starts_with(&format!(r#"<symbol id="{}" viewBox="0 0 9 6">"#, a)));
    }

    #[test]
    fn test_symbol_view_box_is_part_of_id() {
        let bare = r#"<svg><circle r="1"/></svg>"#;
        let mut defs = Defs::new();
        let a = defs.symbol(bare, &[1.0, 1.0, 1.0, 1.0]);
        let b = defs.symbol(bare, &[5.0, 5.0, 5.0, 5.0]);
        assert_ne!(a, b);
        assert_eq!(defs.len(), 2);
        assert_eq!(defs.symbol(bare, &[1.0, 1.0, 1.0, 1.0]), a);
        assert_eq!(defs.len(), 2);
    }

    #[test]
    fn test_symbol_from_data_uri() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(ICON);
        let value = json!({"src": format!("{}{}", SVG_DATA_URI, encoded), "width": 12});
        let symbol = Symbol::from_value(Some(&value)).unwrap().unwrap();
        assert_eq!(symbol.source, ICON);
        assert_eq!(symbol.width, Some(12.0));
        assert_eq!(symbol.height, None);
    }

    #[test]
    fn test_symbol_without_src() {
        assert_eq!(Symbol::from_value(Some(&json!({"width": 3}))).unwrap(), None);
        assert_eq!(Symbol::from_value(None).unwrap(), None);
    }

    #[test]
    fn test_symbol_bad_data_uri() {
        let value = json!({"src": "data:image/svg+xml;base64,@@@"});
        assert!(matches!(
            Symbol::from_value(Some(&value)),
            Err(SymbolError::Base64(_))
        ));
    }

    #[test]
    fn test_arrow_marker() {
        let style = Style::new().with("weight", 0.5).with("direction", 1);
        let arrow = Arrow::from_style(&style).unwrap();
        assert_eq!(arrow.id(), "arrow-5-10-1");
        assert_eq!(arrow.marker_attribute(), "marker-end");

        let mut defs = Defs::new();
        let id = defs.arrow(&arrow);
        defs.arrow(&arrow);
        assert_eq!(defs.len(), 1);
        assert_eq!(
            defs.iter().next().unwrap(),
            format!(
                r#"<marker id="{id}" markerWidth="10" markerHeight="5" orient="auto" refX="10" refY="2.5"><path id="path-{id}" class="arrow-path" d="M 0 0 L 0 5 L 10 2.5 Z" /></marker>"#
            )
        );
    }

    #[test]
    fn test_arrow_pointing_backwards() {
        let style = Style::new()
            .with("direction", -1)
            .with("arrowLength", 8)
            .with("arrowThickness", 4);
        let arrow = Arrow::from_style(&style).unwrap();
        assert_eq!(arrow.marker_attribute(), "marker-start");
        let mut defs = Defs::new();
        defs.arrow(&arrow);
        assert!(defs
            .iter()
            .next()
            .unwrap()
            .contains(r#"refX="0" refY="2"><path id="path-arrow-4-8--1" class="arrow-path" d="M 8 0 L 8 4 L 0 2 Z" />"#));
    }

    #[test]
    fn test_only_numeric_one_points_forward() {
        let forward = Arrow::from_style(&Style::new().with("direction", 1.0)).unwrap();
        assert!(forward.points_forward());
        for direction in [json!("1"), json!(2), json!(true)] {
            let arrow = Arrow::from_style(&Style::new().with("direction", direction.clone())).unwrap();
            assert_eq!(arrow.marker_attribute(), "marker-start", "{}", direction);
        }
    }

    #[test]
    fn test_no_arrow_without_direction() {
        assert_eq!(Arrow::from_style(&Style::new().with("weight", 1)), None);
    }
}
