use crate::config::TextContrast;
use crate::theme::{Palette, Theme};

/// Lightness (in percent) of step `index`. Depends on the index only.
pub fn lightness(palette: &Palette, index: usize) -> f32 {
    let raw = palette.base_lightness - palette.lightness_step * index as f32;
    raw.max(palette.min_lightness)
}

pub fn fill_color(palette: &Palette, index: usize) -> String {
    format!(
        "hsl({}, {}%, {}%)",
        palette.hue,
        palette.saturation,
        lightness(palette, index)
    )
}

/// Whether a step needs light text. In auto mode this reads the known
/// lightness of the generated fill instead of measuring luminance.
pub fn wants_light_text(palette: &Palette, index: usize, mode: TextContrast) -> bool {
    match mode {
        TextContrast::White => true,
        TextContrast::Black => false,
        TextContrast::Auto => lightness(palette, index) < palette.contrast_threshold,
    }
}

pub fn text_color(theme: &Theme, index: usize, mode: TextContrast) -> String {
    if wants_light_text(&theme.palette, index, mode) {
        theme.light_text_color.clone()
    } else {
        theme.dark_text_color.clone()
    }
}
