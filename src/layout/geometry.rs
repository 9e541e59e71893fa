use crate::config::LayoutConfig;
use crate::ir::StageRecord;

use super::{Canvas, Point, StepGeometry};

/// Width of the synthetic bottom edge of the last step, relative to its top.
pub const TERMINAL_TAPER: f32 = 0.85;
/// Padding added when neither the required nor the offered height is usable.
const FALLBACK_HEIGHT_MARGIN: f32 = 10.0;
const MAX_CORNER_RADIUS: f32 = 12.0;

/// Height needed to fit `count` steps at their minimum height.
pub fn required_height(count: usize, config: &LayoutConfig) -> f32 {
    let n = count as f32;
    n * config.min_step_height + (n - 1.0).max(0.0) * config.gap
}

pub fn canvas_height(count: usize, config: &LayoutConfig, available: f32) -> f32 {
    let required = required_height(count, config);
    let height = required.max(available);
    if height.is_finite() && height > 0.0 {
        height
    } else {
        count as f32 * (config.min_step_height + config.gap) + FALLBACK_HEIGHT_MARGIN
    }
}

pub fn step_height(count: usize, config: &LayoutConfig, height: f32) -> f32 {
    let n = count.max(1) as f32;
    let share = (height - (n - 1.0) * config.gap) / n;
    config.min_step_height.max(share)
}

/// The value treated as 100%: the first stage when it is positive, else the
/// largest stage.
pub fn reference_value(records: &[StageRecord]) -> f64 {
    match records.first() {
        Some(first) if first.value > 0.0 => first.value,
        _ => records.iter().map(|r| r.value).fold(0.0, f64::max),
    }
}

/// Maps stage values to pixel widths against a fixed reference value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthScale {
    pub reference: f64,
    pub floor: f32,
    pub full_width: f32,
}

impl WidthScale {
    pub fn new(reference: f64, config: &LayoutConfig, canvas_width: f32) -> Self {
        Self {
            reference,
            floor: config.min_width_pct / 100.0 * canvas_width,
            full_width: config.top_width_pct / 100.0 * canvas_width,
        }
    }

    /// Monotonic in `value` and never below `floor`.
    pub fn width_for(&self, value: f64) -> f32 {
        if self.reference <= 0.0 {
            return self.floor;
        }
        let ratio = (value / self.reference) as f32;
        self.floor.max(ratio * self.full_width)
    }

    pub fn terminal_width(&self, top_width: f32) -> f32 {
        self.floor.max(top_width * TERMINAL_TAPER)
    }
}

pub fn corner_radius(config: &LayoutConfig, step_height: f32) -> f32 {
    if config.rounded {
        MAX_CORNER_RADIUS.min(step_height / 3.0)
    } else {
        0.0
    }
}

/// Trapezoid geometry for every record, index-aligned with `records`.
pub fn compute_steps(
    records: &[StageRecord],
    scale: &WidthScale,
    canvas_width: f32,
    step_height: f32,
    gap: f32,
) -> Vec<StepGeometry> {
    let center_x = canvas_width / 2.0;
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let top = scale.width_for(record.value);
            let bottom = match records.get(index + 1) {
                Some(next) => scale.width_for(next.value),
                None => scale.terminal_width(top),
            };
            let y_top = index as f32 * (step_height + gap);
            let y_bottom = y_top + step_height;
            StepGeometry {
                index,
                top_left: Point::new(center_x - top / 2.0, y_top),
                top_right: Point::new(center_x + top / 2.0, y_top),
                bottom_left: Point::new(center_x - bottom / 2.0, y_bottom),
                bottom_right: Point::new(center_x + bottom / 2.0, y_bottom),
                y_top,
                height: step_height,
            }
        })
        .collect()
}

/// Dimensions shared by every step of one funnel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunnelFrame {
    pub width: f32,
    pub height: f32,
    pub step_height: f32,
    pub scale: WidthScale,
}

impl FunnelFrame {
    pub fn compute(records: &[StageRecord], config: &LayoutConfig, canvas: Canvas) -> Self {
        let width = canvas.effective_width();
        let height = canvas_height(records.len(), config, canvas.available_height());
        Self {
            width,
            height,
            step_height: step_height(records.len(), config, height),
            scale: WidthScale::new(reference_value(records), config, width),
        }
    }

    pub fn steps(&self, records: &[StageRecord], config: &LayoutConfig) -> Vec<StepGeometry> {
        compute_steps(records, &self.scale, self.width, self.step_height, config.gap)
    }
}
