pub mod color;
pub mod geometry;
pub mod label;
pub(crate) mod types;
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::StageRecord;
use crate::theme::Theme;

use geometry::{FunnelFrame, corner_radius};
use label::{format_label, percent_of};

/// Lays out normalized records. `records` must be non-empty and `config`
/// already clamped; the orchestrator guarantees both.
pub fn compute_layout(
    records: &[StageRecord],
    config: &LayoutConfig,
    theme: &Theme,
    canvas: Canvas,
) -> FunnelLayout {
    let frame = FunnelFrame::compute(records, config, canvas);
    let radius = corner_radius(config, frame.step_height);
    let center_x = frame.width / 2.0;

    let steps = frame
        .steps(records, config)
        .into_iter()
        .zip(records)
        .map(|(geometry, record)| {
            let index = geometry.index;
            let percent = percent_of(record.value, frame.scale.reference);
            let clip = config.rounded.then(|| geometry.bounding_box(radius));
            StepVisual {
                stage: record.stage.clone(),
                value: record.value,
                percent,
                fill_color: color::fill_color(&theme.palette, index),
                text_color: color::text_color(theme, index, config.text_contrast),
                label_text: format_label(record, percent, config),
                label_x: center_x,
                label_y: geometry.y_top + geometry.height / 2.0,
                font_size: config.font_size,
                corner_radius: radius,
                clip,
                drill_links: record.drill_links.clone(),
                geometry,
            }
        })
        .collect();

    FunnelLayout {
        width: frame.width,
        height: frame.height,
        step_height: frame.step_height,
        reference_value: frame.scale.reference,
        steps,
    }
}
