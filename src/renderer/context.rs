//! Per-render mutable state

use crate::bbox::BBox;
use crate::geojson::Position;
use crate::style::PaintAttributes;

use super::svg::{build_document, escape_xml, format_number};
use super::symbol::Defs;
use super::SvgConfig;

/// State of one `render` call: the document bounding box, the shared
/// definitions and the emitted markup fragments, in input order
#[derive(Debug, Default)]
pub struct RenderContext {
    /// Bounds of everything rendered so far
    pub bbox: BBox,
    /// Symbols and markers referenced by fragments
    pub defs: Defs,
    fragments: Vec<String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a markup fragment
    pub fn push(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn start_group(&mut self, class: &str) {
        self.push(format!(r#"<g class="{}">"#, escape_xml(class)));
    }

    pub fn end_group(&mut self) {
        self.push("</g>");
    }

    pub fn add_path(&mut self, class: &str, d: &str, paint: &PaintAttributes) {
        self.push(format!(
            r#"<path class="{}" d="{}"{}/>"#,
            escape_xml(class),
            d,
            paint
        ));
    }

    pub fn add_circle(&mut self, class: &str, center: Position, radius: f64, paint: &PaintAttributes) {
        self.push(format!(
            r#"<circle class="{}" cx="{}" cy="{}" r="{}"{} />"#,
            escape_xml(class),
            format_number(center.x),
            format_number(center.y),
            format_number(radius),
            paint
        ));
    }

    /// Wrap the collected fragments into the final document
    pub fn finish(self, view_box: &BBox, config: &SvgConfig) -> String {
        build_document(view_box, &self.defs, &self.fragments, config)
    }
}
