//! Per-geometry feature rendering

use std::borrow::Cow;

use serde_json::Value;
use tracing::{trace, warn};

use crate::bbox::BBox;
use crate::geojson::{Feature, Geometry, Position};
use crate::style::{feature_style, resolve_paint, select_style, selector_key, PaintAttributes, Style};
use crate::text::{render_text_content, TextContent, DEFAULT_FONT_SIZE};

use super::context::RenderContext;
use super::path::{coordinates_to_path, Rings};
use super::svg::{escape_xml, format_number};
use super::symbol::Symbol;
use super::transform::symbol_transform;
use super::Renderer;

/// Type value of features rendered as text boxes
pub const TEXTBOX: &str = "textbox";
/// Type value of point features rendered as symbols
pub const SYMBOL: &str = "symbol";

/// Radius of points without one
const DEFAULT_RADIUS: f64 = 1.0;

impl Renderer {
    /// Render one feature into `ctx` and return its bounds
    ///
    /// The feature transform runs first, then a plugin registered for the
    /// feature's type takes over if there is one; otherwise the geometry
    /// decides. Features without a known geometry are skipped.
    pub fn render_feature(&self, feature: &Feature, ctx: &mut RenderContext) -> BBox {
        let mut feature_bounds = BBox::empty();
        let feature = match &self.transform {
            Some(transform) => Cow::Owned(transform(feature.clone())),
            None => Cow::Borrowed(feature),
        };

        if let Some(kind) = self.feature_type(&feature) {
            if let Some(plugin) = self.plugins.get(&kind) {
                trace!(kind = %kind, "rendering feature with plugin");
                plugin.render(self, &feature, ctx, &mut feature_bounds);
                return feature_bounds;
            }
        }

        let Some(geometry) = &feature.geometry else {
            trace!("skipping feature without geometry");
            return feature_bounds;
        };

        match geometry {
            Geometry::Polygon { .. } | Geometry::MultiPolygon { .. } => {
                if let Some(rings) = Rings::of(geometry) {
                    self.polygon(&feature, rings, ctx, &mut feature_bounds);
                }
            }
            Geometry::LineString { .. } | Geometry::MultiLineString { .. } => {
                if let Some(rings) = Rings::of(geometry) {
                    self.line_string(&feature, rings, ctx, &mut feature_bounds);
                }
            }
            Geometry::Point { coordinates } => {
                self.point(&feature, *coordinates, ctx, &mut feature_bounds);
            }
            Geometry::MultiPoint { coordinates } => {
                self.multi_point(&feature, coordinates, ctx);
            }
            Geometry::GeometryCollection { geometries } => {
                self.geometry_collection(&feature, geometries, ctx);
            }
            Geometry::Unknown => trace!("skipping feature with unsupported geometry type"),
        }

        feature_bounds
    }

    /// The feature's type value under the configured property selector
    pub fn feature_type(&self, feature: &Feature) -> Option<String> {
        self.type_selector.as_ref()?.feature_type(feature)
    }

    /// Selected base style merged under the feature's properties
    pub fn base_style(&self, feature: &Feature) -> Style {
        select_style(feature, &self.styles, self.type_selector.as_ref()).merged(&feature.properties)
    }

    /// Paint attributes of a feature at the current render state
    pub fn paint(
        &self,
        feature: &Feature,
        ctx: &mut RenderContext,
        feature_bounds: &mut BBox,
    ) -> PaintAttributes {
        let style = feature_style(
            feature,
            &self.styles,
            self.type_selector.as_ref(),
            &ctx.bbox,
            feature_bounds,
        );
        resolve_paint(
            &style,
            feature.geometry_type(),
            &mut ctx.defs,
            &mut ctx.bbox,
            feature_bounds,
        )
    }

    /// Path data for a feature, through its type's decorator if one exists
    fn path(
        &self,
        feature: &Feature,
        rings: Rings<'_>,
        closed: bool,
        ctx: &mut RenderContext,
        feature_bounds: &mut BBox,
    ) -> String {
        let kind = self.feature_type(feature);
        let d = match kind.as_deref().and_then(|kind| self.decorators.get(kind)) {
            Some(decorator) => {
                trace!(kind = kind.as_deref(), "building path with decorator");
                decorator.decorate(feature, rings, closed, &mut ctx.bbox, feature_bounds)
            }
            None => coordinates_to_path(rings, closed, &mut ctx.bbox, feature_bounds),
        };
        d.trim().to_string()
    }

    fn polygon(
        &self,
        feature: &Feature,
        rings: Rings<'_>,
        ctx: &mut RenderContext,
        feature_bounds: &mut BBox,
    ) {
        let d = self.path(feature, rings, true, ctx, feature_bounds);
        let class = self.base_style(feature).class_list("polygon");
        let paint = self.paint(feature, ctx, feature_bounds);
        ctx.add_path(&class, &d, &paint);

        if self.feature_type(feature).as_deref() == Some(TEXTBOX) {
            self.text(feature, ctx, feature_bounds);
        }
    }

    fn line_string(
        &self,
        feature: &Feature,
        rings: Rings<'_>,
        ctx: &mut RenderContext,
        feature_bounds: &mut BBox,
    ) {
        let d = self.path(feature, rings, false, ctx, feature_bounds);
        let class = self.base_style(feature).class_list("linestring");
        let paint = self.paint(feature, ctx, feature_bounds);
        ctx.add_path(&class, &d, &paint);
    }

    fn point(
        &self,
        feature: &Feature,
        position: Position,
        ctx: &mut RenderContext,
        feature_bounds: &mut BBox,
    ) {
        let kind = self.feature_type(feature);
        if kind.as_deref() == Some(SYMBOL) {
            self.symbol(feature, position, ctx, feature_bounds);
            return;
        }

        ctx.bbox.extend(position);
        feature_bounds.extend(position);

        let style = self.base_style(feature);
        let radius = style.radius().unwrap_or(DEFAULT_RADIUS);
        if kind.as_deref() == Some(TEXTBOX) {
            self.text(feature, ctx, feature_bounds);
        } else {
            let paint = self.paint(feature, ctx, feature_bounds);
            ctx.add_circle(&style.class_list("point"), position, radius, &paint);
        }

        feature_bounds.pad(radius);
        ctx.bbox.extend_box(feature_bounds);
    }

    /// A point drawn as a `<use>` of its `symbol` property
    ///
    /// Points without a usable symbol source fall back to a plain circle.
    fn symbol(
        &self,
        feature: &Feature,
        position: Position,
        ctx: &mut RenderContext,
        feature_bounds: &mut BBox,
    ) {
        ctx.bbox.extend(position);
        feature_bounds.extend(position);

        let symbol = match Symbol::from_value(feature.property("symbol")) {
            Ok(symbol) => symbol,
            Err(err) => {
                warn!(error = %err, "cannot read symbol source, drawing a circle instead");
                None
            }
        };
        let style = self.base_style(feature);

        let Some(symbol) = symbol else {
            let radius = style.radius().unwrap_or(DEFAULT_RADIUS);
            let paint = self.paint(feature, ctx, feature_bounds);
            ctx.add_circle(&style.class_list("point"), position, radius, &paint);
            return;
        };

        let view_box = symbol.view_box().unwrap_or_else(|| feature_bounds.to_array());
        let id = ctx.defs.symbol(&symbol.source, &view_box);
        let width = symbol.width.unwrap_or(view_box[2]);
        let height = symbol.height.unwrap_or(view_box[3]);

        let symbol_bounds = BBox::new(
            position.x - width / 2.0,
            position.y - height / 2.0,
            position.x + width / 2.0,
            position.y + height / 2.0,
        );
        feature_bounds.extend_box(&symbol_bounds);
        ctx.bbox.extend_box(&symbol_bounds);

        let transform = symbol_transform(
            position,
            style.number("rotation").unwrap_or(0.0),
            style.number("scale").unwrap_or(1.0),
            width,
            height,
        );
        let paint = self.paint(feature, ctx, feature_bounds);
        ctx.push(format!(
            r##"<use xlink:href="#{}" transform="{}" width="{}" height="{}" x="{}" y="{}" class="{}"{}/>"##,
            escape_xml(&id),
            transform.to_svg(),
            format_number(width),
            format_number(height),
            format_number(position.x),
            format_number(position.y),
            escape_xml(&style.class_list(SYMBOL)),
            paint
        ));
    }

    /// Text box label laid out inside the feature bounds
    fn text(&self, feature: &Feature, ctx: &mut RenderContext, feature_bounds: &BBox) {
        if feature_bounds.is_empty() {
            warn!("text box without coordinates has no anchor, skipping label");
            return;
        }
        let style = self.base_style(feature);
        let font_size = style.font_size().unwrap_or(DEFAULT_FONT_SIZE);
        let font_family = style.text("fontFamily").unwrap_or_default();
        let fill = style
            .text("fontColor")
            .or_else(|| style.text("color"))
            .unwrap_or_default();

        let content = style
            .get("text")
            .and_then(TextContent::from_value)
            .map(|text| {
                render_text_content(
                    &text,
                    font_size,
                    &font_family,
                    feature_bounds,
                    &style,
                    &self.fonts,
                )
            })
            .unwrap_or_default();

        let family = if font_family.is_empty() {
            String::new()
        } else {
            let family = font_family.replace('"', "'");
            format!(
                r#"font-family="{}" "#,
                family.trim().replace('&', "&amp;").replace('<', "&lt;")
            )
        };
        ctx.push(format!(
            r#"<text {}class="{}" font-size="{}" fill="{}" x="{}" y="{}">{}</text>"#,
            family,
            escape_xml(&style.class_list(TEXTBOX)),
            format_number(font_size),
            escape_xml(&fill),
            format_number(feature_bounds.min_x),
            format_number(feature_bounds.min_y),
            content
        ));
    }

    /// Each position rendered as its own point, grouped
    fn multi_point(&self, feature: &Feature, positions: &[Position], ctx: &mut RenderContext) {
        ctx.start_group(&self.base_style(feature).class_list("multipoint"));
        for position in positions {
            let member = Feature {
                id: feature.id.clone(),
                geometry: Some(Geometry::Point {
                    coordinates: *position,
                }),
                properties: feature.properties.clone(),
            };
            let mut member_bounds = BBox::empty();
            self.point(&member, *position, ctx, &mut member_bounds);
        }
        ctx.end_group();
    }

    /// Each member geometry rendered as its own feature, grouped
    ///
    /// Members inherit the collection's properties plus `collectionIndex`.
    /// With a property type selector, `geometriesTypes[i]` becomes the
    /// member's type, and `styles[type]` is merged into its properties.
    fn geometry_collection(&self, feature: &Feature, geometries: &[Geometry], ctx: &mut RenderContext) {
        ctx.start_group(&self.base_style(feature).class_list("geometrycollection"));

        let types = feature.property("geometriesTypes").and_then(Value::as_array);
        let type_styles = feature.property("styles").and_then(Value::as_object);
        let type_property = self.type_selector.as_ref().and_then(|s| s.property_name());

        for (index, geometry) in geometries.iter().enumerate() {
            let mut properties = feature.properties.clone();
            properties.insert("collectionIndex".to_string(), Value::from(index));

            let member_type = types
                .and_then(|types| types.get(index))
                .filter(|kind| !kind.is_null());
            if let Some(name) = type_property {
                match member_type {
                    Some(kind) => properties.insert(name.to_string(), kind.clone()),
                    None => properties.remove(name),
                };
            }

            let overrides = member_type
                .and_then(selector_key)
                .and_then(|kind| type_styles.and_then(|styles| styles.get(&kind)))
                .and_then(Value::as_object);
            if let Some(overrides) = overrides {
                properties.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
            }

            let member = Feature {
                id: feature.id.clone(),
                geometry: Some(geometry.clone()),
                properties,
            };
            self.render_feature(&member, ctx);
        }

        ctx.end_group();
    }
}
