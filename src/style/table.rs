//! Style tables: named styles keyed by geometry type or type-selector value
//!
//! Tables are written in TOML. Each `[styles.<key>]` section holds the
//! attributes of one style:
//!
//! ```toml
//! [metadata]
//! name = "coastline"
//!
//! [styles.LineString]
//! weight = 2
//! stroke = "#1565c0"
//! dashArray = [4, 2]
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

use super::Style;

#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    /// Optional name for the table
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    styles: HashMap<String, Style>,
}

/// TOML structure for deserializing style tables
#[derive(Deserialize)]
struct TomlStyleTable {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    styles: HashMap<String, Style>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Built-in styles for the GeoJSON geometry types and text boxes
const DEFAULT_STYLES: &str = r##"
[metadata]
name = "default"
description = "Thin dark strokes, filled points"

[styles.Polygon]
weight = 0.25
color = "#333333"
opacity = 0.75

[styles.MultiPolygon]
weight = 0.25
color = "#333333"
opacity = 0.75

[styles.LineString]
weight = 0.25
color = "#333333"
opacity = 0.75

[styles.MultiLineString]
weight = 0.25
color = "#333333"
opacity = 0.75

[styles.Point]
radius = 3
stroke = "#333333"
weight = 0.25
color = "#333333"
fill = "#000000"

[styles.MultiPoint]
radius = 3
stroke = "#333333"
weight = 0.25
color = "#333333"
fill = "#000000"

[styles.textbox]
fontFamily = "Helvetica, Arial, sans-serif"
fontColor = "#333333"
weight = 0
color = "#333333"

[styles.GeometryCollection]
"##;

impl StyleTable {
    /// A table with no styles at all
    pub fn empty() -> Self {
        Self {
            name: None,
            description: None,
            styles: HashMap::new(),
        }
    }

    /// Load a style table from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        content.parse()
    }

    pub fn get(&self, key: &str) -> Option<&Style> {
        self.styles.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, style: Style) {
        self.styles.insert(key.into(), style);
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, style: Style) -> Self {
        self.insert(key, style);
        self
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Overlay this table on `base`, replacing whole entries per key
    pub fn merged_over(self, base: &StyleTable) -> StyleTable {
        let mut styles = base.styles.clone();
        styles.extend(self.styles);
        StyleTable {
            name: self.name.or_else(|| base.name.clone()),
            description: self.description.or_else(|| base.description.clone()),
            styles,
        }
    }
}

impl FromStr for StyleTable {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let parsed: TomlStyleTable = toml::from_str(content)?;

        Ok(StyleTable {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            styles: parsed.styles,
        })
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        DEFAULT_STYLES
            .parse()
            .expect("Default style table should be valid TOML")
    }
}
