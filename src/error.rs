//! Error types for input parsing and renderer configuration

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Errors raised while reading GeoJSON input
#[derive(Error, Debug)]
pub enum InputError {
    /// The input is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(serde_json::Error),

    /// The top-level `type` is neither `Feature` nor `FeatureCollection`
    #[error("input has to be a FeatureCollection or a Feature, found `{found}`")]
    InvalidType { found: String },

    /// The document has the right top-level type but a malformed body
    #[error("malformed GeoJSON: {0}")]
    Shape(serde_json::Error),
}

impl InputError {
    /// Byte offset of the error in `source`, when the parser reported one
    pub fn offset(&self, source: &str) -> Option<usize> {
        let InputError::Json(err) = self else {
            return None;
        };
        if err.line() == 0 {
            return None;
        }
        let line_start: usize = source
            .split_inclusive('\n')
            .take(err.line() - 1)
            .map(str::len)
            .sum();
        Some((line_start + err.column().saturating_sub(1)).min(source.len()))
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let offset = self.offset(source).unwrap_or(0);
        let span = offset..(offset + 1).min(source.len()).max(offset);
        let mut buf = Vec::new();

        let written = Report::build(ReportKind::Error, filename, offset)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(self.label())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }

    fn label(&self) -> String {
        match self {
            InputError::Json(err) => format!("{:?} error here", err.classify()),
            InputError::InvalidType { .. } => {
                "expected `\"type\": \"Feature\"` or `\"type\": \"FeatureCollection\"`".to_string()
            }
            InputError::Shape(_) => "in this document".to_string(),
        }
    }
}

/// Errors raised while configuring a renderer
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An extent whose minimum lies beyond its maximum
    #[error("invalid extent [{}, {}, {}, {}]: minimum exceeds maximum", .0[0], .0[1], .0[2], .0[3])]
    InvalidExtent([f64; 4]),
}

impl ConfigError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can occur anywhere in the render pipeline
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
