//! SVG renderer for GeoJSON features
//!
//! A [`Renderer`] is configured once through its `with_*` builder methods and
//! can then render any number of inputs. Every call to [`Renderer::render`]
//! threads a fresh [`RenderContext`] through the feature renderers, so
//! renders never share bounding boxes or definitions.

pub mod config;
pub mod context;
mod feature;
pub mod path;
pub mod registry;
pub mod svg;
pub mod symbol;
pub mod transform;

use std::fmt;

use tracing::debug;

use crate::bbox::BBox;
use crate::error::{ConfigError, RenderError};
use crate::geojson::{Feature, GeoJson, Position};
use crate::style::{Style, StyleSource, StyleTable, TypeSelector};
use crate::text::{FontMetrics, FontTable};

pub use config::SvgConfig;
pub use context::RenderContext;
pub use path::{coordinates_to_path, FnDecorator, PathDecorator, Rings};
pub use registry::Registry;
pub use symbol::Defs;

/// Coordinate projection applied to the input before rendering
pub type ProjectionFn = dyn Fn(Position) -> Position;

/// Callback replacing each feature before it is dispatched
pub type FeatureTransform = dyn Fn(Feature) -> Feature;

/// Renders features of one type in place of the built-in geometry handling
///
/// A plugin is responsible for everything the built-in renderers do: pushing
/// markup to the context and growing `ctx.bbox` and `feature_bounds`.
pub trait PluginRenderer {
    fn render(
        &self,
        renderer: &Renderer,
        feature: &Feature,
        ctx: &mut RenderContext,
        feature_bounds: &mut BBox,
    );
}

/// Adapter running a closure as a [`PluginRenderer`]
pub struct FnPlugin<F>(pub F);

impl<F> PluginRenderer for FnPlugin<F>
where
    F: Fn(&Renderer, &Feature, &mut RenderContext, &mut BBox),
{
    fn render(
        &self,
        renderer: &Renderer,
        feature: &Feature,
        ctx: &mut RenderContext,
        feature_bounds: &mut BBox,
    ) {
        (self.0)(renderer, feature, ctx, feature_bounds)
    }
}

/// GeoJSON to SVG renderer
pub struct Renderer {
    styles: StyleSource,
    extent: Option<BBox>,
    projection: Option<Box<ProjectionFn>>,
    type_selector: Option<TypeSelector>,
    transform: Option<Box<FeatureTransform>>,
    fonts: FontTable,
    plugins: Registry<dyn PluginRenderer>,
    decorators: Registry<dyn PathDecorator>,
    config: SvgConfig,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            styles: StyleSource::default(),
            extent: None,
            projection: None,
            type_selector: None,
            transform: None,
            fonts: FontTable::default(),
            plugins: Registry::new(),
            decorators: Registry::new(),
            config: SvgConfig::default(),
        }
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("styles", &self.styles)
            .field("extent", &self.extent)
            .field("projection", &self.projection.is_some())
            .field("type_selector", &self.type_selector)
            .field("transform", &self.transform.is_some())
            .field("fonts", &self.fonts.families().collect::<Vec<_>>())
            .field("plugins", &self.plugins)
            .field("decorators", &self.decorators)
            .field("config", &self.config)
            .finish()
    }
}

impl Renderer {
    /// A renderer with the built-in style and font tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a style table; its entries replace the built-in ones per key
    pub fn with_styles(mut self, table: StyleTable) -> Self {
        self.styles = StyleSource::Table(table.merged_over(&StyleTable::default()));
        self
    }

    /// Compute every feature's style with a function instead of a table
    pub fn with_style_fn(mut self, style: impl Fn(&Feature, &BBox, &BBox) -> Style + 'static) -> Self {
        self.styles = StyleSource::Function(Box::new(style));
        self
    }

    /// Force the output viewBox
    pub fn with_extent(mut self, extent: impl Into<BBox>) -> Result<Self, ConfigError> {
        let extent = extent.into();
        if extent.min_x > extent.max_x || extent.min_y > extent.max_y {
            return Err(ConfigError::InvalidExtent(extent.to_array()));
        }
        self.extent = Some(extent);
        Ok(self)
    }

    /// Project every input coordinate (and a declared bbox) before rendering
    pub fn with_projection(mut self, projection: impl Fn(Position) -> Position + 'static) -> Self {
        self.projection = Some(Box::new(projection));
        self
    }

    /// Select feature types by a property name or a selector function
    pub fn with_type(mut self, selector: impl Into<TypeSelector>) -> Self {
        self.type_selector = Some(selector.into());
        self
    }

    /// Replace each feature before it is rendered
    pub fn with_transform(mut self, transform: impl Fn(Feature) -> Feature + 'static) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Merge a font table into the built-in one
    pub fn with_fonts(mut self, fonts: FontTable) -> Self {
        self.fonts.merge(fonts);
        self
    }

    pub fn with_font(mut self, font: FontMetrics) -> Self {
        self.fonts.register(font);
        self
    }

    /// Build paths of features of type `name` with `decorator`
    pub fn with_decorator(mut self, name: impl Into<String>, decorator: impl PathDecorator + 'static) -> Self {
        self.decorators.register(name, Box::new(decorator));
        self
    }

    pub fn with_decorator_fn(
        self,
        name: impl Into<String>,
        decorator: impl Fn(&Feature, Rings<'_>, bool, &mut BBox, &mut BBox) -> String + 'static,
    ) -> Self {
        self.with_decorator(name, FnDecorator(decorator))
    }

    /// Render features of type `name` with `plugin`
    pub fn with_plugin(mut self, name: impl Into<String>, plugin: impl PluginRenderer + 'static) -> Self {
        self.plugins.register(name, Box::new(plugin));
        self
    }

    pub fn with_plugin_fn(
        self,
        name: impl Into<String>,
        plugin: impl Fn(&Renderer, &Feature, &mut RenderContext, &mut BBox) + 'static,
    ) -> Self {
        self.with_plugin(name, FnPlugin(plugin))
    }

    pub fn with_svg_config(mut self, config: SvgConfig) -> Self {
        self.config = config;
        self
    }

    pub fn styles(&self) -> &StyleSource {
        &self.styles
    }

    pub fn extent(&self) -> Option<BBox> {
        self.extent
    }

    pub fn type_selector(&self) -> Option<&TypeSelector> {
        self.type_selector.as_ref()
    }

    pub fn fonts(&self) -> &FontTable {
        &self.fonts
    }

    pub fn svg_config(&self) -> &SvgConfig {
        &self.config
    }

    pub fn plugin(&self, name: &str) -> Option<&dyn PluginRenderer> {
        self.plugins.get(name)
    }

    pub fn decorator(&self, name: &str) -> Option<&dyn PathDecorator> {
        self.decorators.get(name)
    }

    /// Render a feature or feature collection to an SVG document
    pub fn render(&self, input: impl Into<GeoJson>) -> String {
        let mut data = input.into().into_collection();
        if let Some(project) = &self.projection {
            data.map_positions(&mut |p| project(p));
        }

        debug!(features = data.features.len(), "rendering feature collection");
        let mut ctx = RenderContext::new();
        for feature in &data.features {
            self.render_feature(feature, &mut ctx);
        }

        let view_box = match self.extent.or(data.bbox) {
            Some(view_box) => view_box,
            None => {
                let mut accumulated = ctx.bbox;
                accumulated.pad(self.config.viewbox_padding);
                accumulated
            }
        };
        debug!(view_box = %view_box.to_view_box(), defs = ctx.defs.len(), "assembling document");
        ctx.finish(&view_box, &self.config)
    }

    /// Parse GeoJSON text and render it
    pub fn render_str(&self, source: &str) -> Result<String, RenderError> {
        let input: GeoJson = source.parse()?;
        Ok(self.render(input))
    }
}
