//! Text layout into positioned `<tspan>` lines

use serde_json::Value;

use crate::bbox::BBox;
use crate::renderer::svg::{attr_value, escape_xml, format_number};
use crate::style::Style;

use super::metrics::FontTable;

/// Share of the line height the first line is lifted by when text is
/// anchored on a single point
pub const POINT_ANCHOR_LIFT: f64 = 0.68;

/// Text content of a feature
#[derive(Debug, Clone, PartialEq)]
pub enum TextContent {
    /// One string, reflowed to the available width
    Single(String),
    /// Lines already broken by the caller
    Lines(Vec<String>),
}

impl TextContent {
    /// Read a `text` property: strings and scalars are single texts, arrays
    /// are pre-split lines
    pub fn from_value(value: &Value) -> Option<TextContent> {
        match value {
            Value::Null => None,
            Value::Array(items) => Some(TextContent::Lines(items.iter().map(attr_value).collect())),
            other => Some(TextContent::Single(attr_value(other))),
        }
    }
}

/// One positioned line of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Vertical offset from the previous line
    pub dy: f64,
    pub x: f64,
    pub content: String,
}

impl TextLine {
    pub fn to_tspan(&self) -> String {
        format!(
            r#"<tspan dy="{}" x="{}">{}</tspan>"#,
            format_number(self.dy),
            format_number(self.x),
            escape_xml(&self.content)
        )
    }
}

/// Lay out text inside `bounds`
///
/// Pre-split lines with a `lineHeight` style are stacked as given, left
/// aligned on the bounds. Anything else is joined into one string and
/// wrapped greedily, one glyph at a time, using the font's average glyph
/// width against the bounds' width.
pub fn layout_text(
    text: &TextContent,
    font_size: f64,
    font_family: &str,
    bounds: &BBox,
    style: &Style,
    fonts: &FontTable,
) -> Vec<TextLine> {
    let joined = match (text, style.line_height()) {
        (TextContent::Lines(lines), Some(line_height)) => {
            return lines
                .iter()
                .map(|line| TextLine {
                    dy: line_height,
                    x: bounds.min_x,
                    content: line.clone(),
                })
                .collect();
        }
        (TextContent::Lines(lines), None) => lines.join(","),
        (TextContent::Single(text), _) => text.clone(),
    };

    let metrics = fonts.lookup(font_family, font_size);
    wrap_text(
        &joined,
        bounds,
        metrics.avg_glyph_width,
        metrics.line_height,
    )
}

fn wrap_text(text: &str, bounds: &BBox, glyph_width: f64, line_height: f64) -> Vec<TextLine> {
    let width = bounds.width();
    let anchored_on_point = width == 0.0;
    let x = if anchored_on_point {
        bounds.min_x - glyph_width / 2.0
    } else {
        bounds.min_x
    };

    let total = text.chars().count();
    let mut lines: Vec<TextLine> = Vec::new();
    let mut current = String::new();
    let mut line_length = 0.0;

    for (i, ch) in text.chars().enumerate() {
        if i == 0 || line_length + glyph_width > width {
            current.clear();
            line_length = 0.0;
        }
        current.push(ch);
        line_length += glyph_width;

        if i + 1 == total || line_length + glyph_width > width {
            let dy = if lines.is_empty() && anchored_on_point {
                line_height - POINT_ANCHOR_LIFT * line_height
            } else {
                line_height
            };
            lines.push(TextLine {
                dy,
                x,
                content: std::mem::take(&mut current),
            });
        }
    }

    lines
}

/// Lay out text and render the lines as `<tspan>` markup
pub fn render_text_content(
    text: &TextContent,
    font_size: f64,
    font_family: &str,
    bounds: &BBox,
    style: &Style,
    fonts: &FontTable,
) -> String {
    layout_text(text, font_size, font_family, bounds, style, fonts)
        .iter()
        .map(TextLine::to_tspan)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SERIF: &str = "Helvetica, Arial, serif";

    fn single(text: &str) -> TextContent {
        TextContent::Single(text.to_string())
    }

    fn lines(text: &TextContent, bounds: BBox, style: &Style) -> Vec<TextLine> {
        layout_text(text, 12.0, SERIF, &bounds, style, &FontTable::default())
    }

    #[test]
    fn test_reflow_to_width() {
        let result = lines(
            &single("Multiline text,with line breaks"),
            BBox::new(0.0, 0.0, 100.0, 100.0),
            &Style::new(),
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].content, "Multiline text,w");
        assert_eq!(result[1].content, "ith line breaks");
        assert_eq!(result[0].dy, 12.0 * 1.01567);
        assert_eq!(result[0].x, 0.0);
    }

    #[test]
    fn test_long_text_line_count_is_stable() {
        let text = single(&"a".repeat(399));
        let bounds = BBox::new(0.0, 0.0, 100.0, 100.0);
        let first = lines(&text, bounds, &Style::new());
        let second = lines(&text, bounds, &Style::new());
        assert_eq!(first.len(), 25);
        assert_eq!(first, second);
        assert!(first[..24].iter().all(|l| l.content.len() == 16));
        assert_eq!(first[24].content.len(), 15);
    }

    #[test]
    fn test_pre_split_lines_with_line_height() {
        let text = TextContent::from_value(&json!(["first", "second"])).unwrap();
        let style = Style::new().with("lineHeight", 18);
        let result = lines(&text, BBox::new(5.0, 0.0, 6.0, 1.0), &style);
        assert_eq!(
            result,
            vec![
                TextLine { dy: 18.0, x: 5.0, content: "first".to_string() },
                TextLine { dy: 18.0, x: 5.0, content: "second".to_string() },
            ]
        );
    }

    #[test]
    fn test_pre_split_lines_without_line_height_are_joined() {
        let text = TextContent::from_value(&json!(["ab", "cd"])).unwrap();
        let result = lines(&text, BBox::new(0.0, 0.0, 100.0, 10.0), &Style::new());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].content, "ab,cd");
    }

    #[test]
    fn test_point_anchor_centers_text() {
        let result = lines(&single("abc"), BBox::new(10.0, 10.0, 10.0, 10.0), &Style::new());
        let glyph = 12.0 / 1.946;
        let height = 12.0 * 1.01567;
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].x, 10.0 - glyph / 2.0);
        assert_eq!(result[0].dy, height - 0.68 * height);
        assert_eq!(result[1].dy, height);
        assert_eq!(result[2].dy, height);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(lines(&single(""), BBox::new(0.0, 0.0, 100.0, 100.0), &Style::new()).is_empty());
        assert_eq!(TextContent::from_value(&Value::Null), None);
    }

    #[test]
    fn test_tspans_are_escaped() {
        let markup = render_text_content(
            &single("a<b"),
            12.0,
            SERIF,
            &BBox::new(0.0, 0.0, 100.0, 100.0),
            &Style::new(),
            &FontTable::default(),
        );
        assert_eq!(
            markup,
            format!(
                r#"<tspan dy="{}" x="0">a&lt;b</tspan>"#,
                format_number(12.0 * 1.01567)
            )
        );
    }
}
