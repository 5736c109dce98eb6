//! SVG document assembly and attribute formatting

use serde_json::Value;

use crate::bbox::BBox;

use super::symbol::Defs;
use super::SvgConfig;

pub const XMLNS: &str = "http://www.w3.org/2000/svg";
pub const XLINK: &str = "http://www.w3.org/1999/xlink";
pub const VERSION: &str = "1.2";

/// Wrap rendered fragments into a complete SVG document
///
/// Layout is `<svg ...>`, then `<defs>` when any definitions were collected,
/// then a single `<g>` holding the fragments in render order.
pub fn build_document(
    view_box: &BBox,
    defs: &Defs,
    fragments: &[String],
    config: &SvgConfig,
) -> String {
    let nl = config.line_break();
    let mut svg = String::new();

    if config.standalone {
        svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        svg.push_str(nl);
    }

    svg.push_str(&format!(
        r#"<svg viewBox="{}" xmlns="{}" xmlns:xlink="{}" version="{}">"#,
        view_box_attr(view_box),
        XMLNS,
        XLINK,
        VERSION
    ));
    svg.push_str(nl);

    if !defs.is_empty() {
        svg.push_str("<defs>");
        svg.push_str(nl);
        for def in defs.iter() {
            svg.push_str(def);
            svg.push_str(nl);
        }
        svg.push_str("</defs>");
        svg.push_str(nl);
    }

    svg.push_str("<g>");
    svg.push_str(nl);
    for fragment in fragments {
        svg.push_str(fragment);
        svg.push_str(nl);
    }
    svg.push_str("</g></svg>");

    svg
}

/// `viewBox` value for a box; an empty box (nothing rendered) becomes `0 0 0 0`
fn view_box_attr(view_box: &BBox) -> String {
    if view_box.is_empty() {
        "0 0 0 0".to_string()
    } else {
        view_box.to_view_box()
    }
}

/// Shortest round-trip decimal form, without a trailing `.0` or negative zero
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

/// Attribute text for a property value; arrays are comma-joined
pub fn attr_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(attr_value).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Escape special XML characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(9.000837604508), "9.000837604508");
    }

    #[test]
    fn test_attr_value() {
        assert_eq!(attr_value(&json!([2, 2])), "2,2");
        assert_eq!(attr_value(&json!(18.5)), "18.5");
        assert_eq!(attr_value(&json!(5.0)), "5");
        assert_eq!(attr_value(&json!("red")), "red");
    }

    #[test]
    fn test_document_without_defs() {
        let doc = build_document(
            &BBox::new(0.0, 0.0, 10.0, 20.0),
            &Defs::new(),
            &["<path/>".to_string()],
            &SvgConfig::default(),
        );
        assert_eq!(
            doc,
            format!(
                r#"<svg viewBox="0 0 10 20" xmlns="{}" xmlns:xlink="{}" version="1.2"><g><path/></g></svg>"#,
                XMLNS, XLINK
            )
        );
    }

    #[test]
    fn test_document_with_defs_and_declaration() {
        let mut defs = Defs::new();
        defs.push_unique("a", "<marker id=\"a\"/>");
        let config = SvgConfig::new().with_standalone(true).with_pretty_print(true);
        let doc = build_document(&BBox::new(0.0, 0.0, 1.0, 1.0), &defs, &[], &config);
        assert!(doc.starts_with("<?xml"));
        assert!(doc.contains("<defs>\n<marker id=\"a\"/>\n</defs>"));
        assert!(doc.ends_with("<g>\n</g></svg>"));
    }

    #[test]
    fn test_empty_view_box() {
        let doc = build_document(&BBox::empty(), &Defs::new(), &[], &SvgConfig::default());
        assert!(doc.contains(r#"viewBox="0 0 0 0""#));
    }
}
