//! GeoJSON to SVG - render GeoJSON features as static SVG documents
//!
//! This library turns a GeoJSON `Feature` or `FeatureCollection` into a
//! self-contained SVG string. Geometries become paths, circles and groups,
//! feature properties resolve into paint styles, text boxes are wrapped with
//! font metrics, and point symbols are placed through shared `<defs>`.
//!
//! # Example
//!
//! ```rust
//! use geojson_svg::render;
//!
//! let svg = render(r#"{
//!     "type": "Feature",
//!     "geometry": {"type": "LineString", "coordinates": [[0, 0], [10, 10]]},
//!     "properties": {"stroke": "red"}
//! }"#).unwrap();
//! assert!(svg.contains(r#"class="linestring""#));
//! ```

pub mod bbox;
pub mod error;
pub mod geojson;
pub mod renderer;
pub mod style;
pub mod text;

pub use bbox::BBox;
pub use error::{ConfigError, InputError, RenderError};
pub use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Position, Properties};
pub use renderer::{PathDecorator, PluginRenderer, RenderContext, Renderer, Rings, SvgConfig};
pub use style::{Style, StyleTable, TypeSelector};
pub use text::{FontMetrics, FontTable, GlyphMetrics};

/// Render GeoJSON text with the default renderer
///
/// # Example
///
/// ```rust
/// use geojson_svg::render;
///
/// let svg = render(r#"{
///     "type": "FeatureCollection",
///     "features": [{
///         "type": "Feature",
///         "geometry": {"type": "Point", "coordinates": [20, 20]},
///         "properties": {"radius": 10, "weight": 5, "stroke": "red", "fill": "blue"}
///     }]
/// }"#).unwrap();
///
/// assert!(svg.starts_with(r#"<svg viewBox="5 5 30 30""#));
/// assert!(svg.contains("<circle"));
/// ```
pub fn render(source: &str) -> Result<String, RenderError> {
    Renderer::new().render_str(source)
}

/// Render GeoJSON text with a configured renderer
///
/// # Example
///
/// ```rust
/// use geojson_svg::{render_with, Renderer, SvgConfig};
///
/// let renderer = Renderer::new()
///     .with_type("kind")
///     .with_svg_config(SvgConfig::new().with_standalone(true));
///
/// let svg = render_with(r#"{
///     "type": "Feature",
///     "geometry": {"type": "Point", "coordinates": [0, 0]},
///     "properties": {"kind": "textbox", "text": "Hello"}
/// }"#, &renderer).unwrap();
/// assert!(svg.starts_with("<?xml"));
/// assert!(svg.contains(r#"class="textbox""#));
/// ```
pub fn render_with(source: &str, renderer: &Renderer) -> Result<String, RenderError> {
    renderer.render_str(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_feature() {
        let svg = render(
            r#"{"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 0]]]}, "properties": {}}"#,
        )
        .unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(r#"class="polygon""#));
        assert!(svg.ends_with("</g></svg>"));
    }

    #[test]
    fn test_render_invalid_json() {
        let err = render("{not json").unwrap_err();
        assert!(matches!(err, RenderError::Input(InputError::Json(_))));
    }

    #[test]
    fn test_render_wrong_top_level_type() {
        let err = render(r#"{"type": "Polygon", "coordinates": []}"#).unwrap_err();
        assert!(err.to_string().contains("FeatureCollection or a Feature"));
    }
}
