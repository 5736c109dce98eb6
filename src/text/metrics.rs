//! Font metric tables
//!
//! Text is measured without a font rasterizer: each known font family has a
//! table of `{size, avg_glyph_width, line_height}` samples, and sizes between
//! samples are interpolated. Tables load from TOML or from the JSON format
//! used by browser-side measuring scripts:
//!
//! ```json
//! {"fontFamily": "Verdana", "values": [{"size": 12, "avgGlyphWidth": 7.5, "lineHeight": 14.6}]}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Average glyph width of an unknown font, as a fraction of its size
pub const FALLBACK_WIDTH_DIVISOR: f64 = 1.946;
/// Line height of an unknown font, as a multiple of its size
pub const FALLBACK_LINE_HEIGHT_FACTOR: f64 = 1.01567;

/// Measurements of one font family at one size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphMetrics {
    pub size: f64,
    #[serde(alias = "avgGlyphWidth", alias = "avg")]
    pub avg_glyph_width: f64,
    #[serde(alias = "lineHeight", alias = "height")]
    pub line_height: f64,
}

impl GlyphMetrics {
    /// Ratio-based estimate for fonts without a table
    pub fn estimate(size: f64) -> Self {
        Self {
            size,
            avg_glyph_width: size / FALLBACK_WIDTH_DIVISOR,
            line_height: size * FALLBACK_LINE_HEIGHT_FACTOR,
        }
    }

    /// These metrics scaled proportionally to another size
    pub fn scaled_to(&self, size: f64) -> Self {
        let ratio = size / self.size;
        Self {
            size,
            avg_glyph_width: self.avg_glyph_width * ratio,
            line_height: self.line_height * ratio,
        }
    }

    /// Linear interpolation between two samples at `size`
    pub fn interpolate(lower: &Self, upper: &Self, size: f64) -> Self {
        let t = (size - lower.size) / (upper.size - lower.size);
        Self {
            size,
            avg_glyph_width: lower.avg_glyph_width
                + (upper.avg_glyph_width - lower.avg_glyph_width) * t,
            line_height: lower.line_height + (upper.line_height - lower.line_height) * t,
        }
    }
}

/// Metric samples of one font family, ascending by size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    #[serde(alias = "fontFamily")]
    pub family: String,
    values: Vec<GlyphMetrics>,
}

impl FontMetrics {
    pub fn new(family: impl Into<String>, values: Vec<GlyphMetrics>) -> Self {
        let mut font = Self {
            family: family.into(),
            values,
        };
        font.sort();
        font
    }

    pub fn values(&self) -> &[GlyphMetrics] {
        &self.values
    }

    fn sort(&mut self) {
        self.values.sort_by(|a, b| a.size.total_cmp(&b.size));
    }

    /// Merge another sample set in; samples of equal size are replaced
    fn merge(&mut self, values: Vec<GlyphMetrics>) {
        for value in values {
            self.values.retain(|v| v.size != value.size);
            self.values.push(value);
        }
        self.sort();
    }

    /// Metrics at `size`: the exact sample, an interpolation between the
    /// neighbouring samples, or the single nearest sample scaled
    pub fn metrics_for(&self, size: f64) -> GlyphMetrics {
        let mut lower = None;
        let mut upper = None;
        for value in &self.values {
            if value.size == size {
                return *value;
            }
            if value.size < size {
                lower = Some(value);
            } else {
                upper = Some(value);
                break;
            }
        }

        match (lower, upper) {
            (Some(lower), Some(upper)) => GlyphMetrics::interpolate(lower, upper, size),
            (Some(nearest), None) | (None, Some(nearest)) => nearest.scaled_to(size),
            (None, None) => GlyphMetrics::estimate(size),
        }
    }
}

/// On-disk font table layouts
#[derive(Deserialize)]
#[serde(untagged)]
enum FontDocument {
    Table { fonts: Vec<FontMetrics> },
    List(Vec<FontMetrics>),
    Single(FontMetrics),
}

impl FontDocument {
    fn into_fonts(self) -> Vec<FontMetrics> {
        match self {
            FontDocument::Table { fonts } | FontDocument::List(fonts) => fonts,
            FontDocument::Single(font) => vec![font],
        }
    }
}

/// Font metrics for every known family
#[derive(Debug, Clone, PartialEq)]
pub struct FontTable {
    fonts: Vec<FontMetrics>,
}

/// Built-in metrics for the common web font stacks
const DEFAULT_FONTS: &str = include_str!("fonts.toml");

impl FontTable {
    /// A table without any families; every lookup falls back to estimates
    pub fn empty() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parse a table from TOML (`[[fonts]]` entries)
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let document: FontDocument = toml::from_str(content)?;
        Ok(Self::empty().with_fonts(document.into_fonts()))
    }

    /// Parse a table from JSON: one font object, an array of them, or
    /// `{"fonts": [...]}`
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let document: FontDocument = serde_json::from_str(content)?;
        Ok(Self::empty().with_fonts(document.into_fonts()))
    }

    /// Load a table from a `.json` or `.toml` file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Add a family, merging into an existing family of the same name
    pub fn register(&mut self, font: FontMetrics) {
        match self.fonts.iter_mut().find(|f| f.family == font.family) {
            Some(existing) => existing.merge(font.values),
            None => self.fonts.push(FontMetrics::new(font.family, font.values)),
        }
    }

    pub fn with_font(mut self, font: FontMetrics) -> Self {
        self.register(font);
        self
    }

    pub fn with_fonts(mut self, fonts: impl IntoIterator<Item = FontMetrics>) -> Self {
        for font in fonts {
            self.register(font);
        }
        self
    }

    /// Merge every family of `other` into this table
    pub fn merge(&mut self, other: FontTable) {
        for font in other.fonts {
            self.register(font);
        }
    }

    pub fn get(&self, family: &str) -> Option<&FontMetrics> {
        self.fonts.iter().find(|f| f.family == family)
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.fonts.iter().map(|f| f.family.as_str())
    }

    /// Metrics for `family` at `size`, estimated when the family is unknown
    pub fn lookup(&self, family: &str, size: f64) -> GlyphMetrics {
        match self.get(family) {
            Some(font) => font.metrics_for(size),
            None => GlyphMetrics::estimate(size),
        }
    }
}

impl Default for FontTable {
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_FONTS).expect("Default font table should be valid TOML")
    }
}
