//! Text measurement and layout for text-box features

pub mod layout;
pub mod metrics;

pub use layout::{layout_text, render_text_content, TextContent, TextLine};
pub use metrics::{FontMetrics, FontTable, GlyphMetrics};

/// Font size used when a text box sets none
pub const DEFAULT_FONT_SIZE: f64 = 10.0;
