#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod funnel;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod normalize;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{FunnelOptions, LayoutConfig, TextContrast};
pub use error::{FunnelError, HostError};
pub use funnel::{build_funnel, build_funnel_with_config};
pub use ir::{Cell, DrillLink, FieldMeta, QueryFields, QueryResult, StageRecord};
pub use layout::{Canvas, FunnelLayout, StepGeometry, StepVisual, compute_layout};
pub use parser::parse_query_result;
pub use render::render_svg;
pub use theme::{Palette, Theme};

/// Everything needed to turn a query-result document into SVG in one call.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub options: FunnelOptions,
    pub canvas: Canvas,
}

impl RenderOptions {
    pub fn modern() -> Self {
        Self::default()
    }

    pub fn transparent() -> Self {
        Self {
            theme: Theme::transparent(),
            ..Self::default()
        }
    }

    pub fn with_canvas(mut self, width: f32, height: f32) -> Self {
        self.canvas = Canvas::new(width, height);
        self
    }
}

/// Parses `input`, lays out the funnel and renders it as SVG. Funnel errors
/// are returned as [`FunnelError`] inside the `anyhow` chain so callers can
/// downcast and surface them as [`HostError`]s.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let result = parse_query_result(input)?;
    let layout = build_funnel(&result, &options.options, &options.theme, options.canvas)?;
    Ok(render_svg(&layout, &options.theme))
}
