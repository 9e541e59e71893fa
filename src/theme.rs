use serde::{Deserialize, Serialize};

/// HSL ramp the step fills are drawn from. Step 0 is the lightest shade and
/// each following step gets darker until `min_lightness` is reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub hue: f32,
    pub saturation: f32,
    pub base_lightness: f32,
    pub lightness_step: f32,
    pub min_lightness: f32,
    /// Fills darker than this get light text in auto-contrast mode.
    pub contrast_threshold: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            hue: 220.0,
            saturation: 60.0,
            base_lightness: 50.0,
            lightness_step: 4.0,
            min_lightness: 28.0,
            contrast_threshold: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_weight: u16,
    pub background: String,
    pub light_text_color: String,
    pub dark_text_color: String,
    pub palette: Palette,
}

impl Theme {
    pub fn modern() -> Self {
        Self {
            font_family: "Inter, system-ui, -apple-system, Segoe UI, Roboto, \"Helvetica Neue\", Arial, \"Noto Sans\", \"Liberation Sans\", sans-serif".to_string(),
            font_weight: 600,
            background: "#FFFFFF".to_string(),
            light_text_color: "#fff".to_string(),
            dark_text_color: "#111".to_string(),
            palette: Palette::default(),
        }
    }

    pub fn transparent() -> Self {
        Self {
            background: "none".to_string(),
            ..Self::modern()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
