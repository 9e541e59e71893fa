use crate::theme::Theme;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_LABEL_TEMPLATE: &str = "{{stage}} — {{value}} ({{pct}})";
pub const DEFAULT_MIN_STEP_HEIGHT: f32 = 44.0;
pub const DEFAULT_GAP: f32 = 8.0;
pub const DEFAULT_TOP_WIDTH_PCT: f32 = 100.0;
pub const DEFAULT_MIN_WIDTH_PCT: f32 = 20.0;
pub const DEFAULT_TEXT_SIZE: f32 = 13.0;

/// Upper bound for pixel-valued options, so height sums stay finite in f32.
pub const MAX_PIXEL_OPTION: f32 = 10_000.0;

const MIN_STEP_HEIGHT_RANGE: (f32, f32) = (20.0, MAX_PIXEL_OPTION);
const GAP_RANGE: (f32, f32) = (0.0, MAX_PIXEL_OPTION);
const TOP_WIDTH_PCT_RANGE: (f32, f32) = (10.0, 100.0);
const MIN_WIDTH_PCT_RANGE: (f32, f32) = (1.0, 99.0);
const TEXT_SIZE_RANGE: (f32, f32) = (8.0, MAX_PIXEL_OPTION);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextContrast {
    #[default]
    Auto,
    White,
    Black,
}

impl TextContrast {
    /// Unknown modes fall back to `Auto`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => TextContrast::Auto,
            "white" => TextContrast::White,
            "black" => TextContrast::Black,
            other => {
                warn!("unknown text_contrast {other:?}, using auto");
                TextContrast::Auto
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        let value = match self {
            NumberOrString::Number(val) => *val,
            NumberOrString::String(val) => val.trim().parse::<f64>().ok()?,
        };
        value
            .is_finite()
            .then(|| value.clamp(f32::MIN as f64, f32::MAX as f64) as f32)
    }
}

impl From<f64> for NumberOrString {
    fn from(value: f64) -> Self {
        NumberOrString::Number(value)
    }
}

/// Options exactly as the host hands them over, keyed by the host's option
/// names. Nothing here is trusted: [`LayoutConfig::from_options`] resolves
/// defaults and clamps every value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelOptions {
    pub label_template: Option<String>,
    pub show_percent: Option<bool>,
    pub min_step_height: Option<NumberOrString>,
    pub gap: Option<NumberOrString>,
    pub top_width_pct: Option<NumberOrString>,
    pub min_width_pct: Option<NumberOrString>,
    pub rounded: Option<bool>,
    pub text_size: Option<NumberOrString>,
    pub text_contrast: Option<String>,
}

impl FunnelOptions {
    /// Applies every option set in `other` on top of `self`.
    pub fn merge(&mut self, other: FunnelOptions) {
        if other.label_template.is_some() {
            self.label_template = other.label_template;
        }
        if other.show_percent.is_some() {
            self.show_percent = other.show_percent;
        }
        if other.min_step_height.is_some() {
            self.min_step_height = other.min_step_height;
        }
        if other.gap.is_some() {
            self.gap = other.gap;
        }
        if other.top_width_pct.is_some() {
            self.top_width_pct = other.top_width_pct;
        }
        if other.min_width_pct.is_some() {
            self.min_width_pct = other.min_width_pct;
        }
        if other.rounded.is_some() {
            self.rounded = other.rounded;
        }
        if other.text_size.is_some() {
            self.text_size = other.text_size;
        }
        if other.text_contrast.is_some() {
            self.text_contrast = other.text_contrast;
        }
    }
}

/// Validated layout configuration. Every numeric field is inside its range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub min_step_height: f32,
    pub gap: f32,
    pub top_width_pct: f32,
    pub min_width_pct: f32,
    pub rounded: bool,
    pub font_size: f32,
    pub text_contrast: TextContrast,
    pub show_percent: bool,
    pub label_template: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_step_height: DEFAULT_MIN_STEP_HEIGHT,
            gap: DEFAULT_GAP,
            top_width_pct: DEFAULT_TOP_WIDTH_PCT,
            min_width_pct: DEFAULT_MIN_WIDTH_PCT,
            rounded: true,
            font_size: DEFAULT_TEXT_SIZE,
            text_contrast: TextContrast::Auto,
            show_percent: true,
            label_template: DEFAULT_LABEL_TEMPLATE.to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn from_options(options: &FunnelOptions) -> Self {
        let label_template = options
            .label_template
            .as_deref()
            .filter(|template| !template.is_empty())
            .unwrap_or(DEFAULT_LABEL_TEMPLATE)
            .to_string();
        Self {
            min_step_height: resolve_number(
                "min_step_height",
                options.min_step_height.as_ref(),
                DEFAULT_MIN_STEP_HEIGHT,
                MIN_STEP_HEIGHT_RANGE,
            ),
            gap: resolve_number("gap", options.gap.as_ref(), DEFAULT_GAP, GAP_RANGE),
            top_width_pct: resolve_number(
                "top_width_pct",
                options.top_width_pct.as_ref(),
                DEFAULT_TOP_WIDTH_PCT,
                TOP_WIDTH_PCT_RANGE,
            ),
            min_width_pct: resolve_number(
                "min_width_pct",
                options.min_width_pct.as_ref(),
                DEFAULT_MIN_WIDTH_PCT,
                MIN_WIDTH_PCT_RANGE,
            ),
            rounded: options.rounded.unwrap_or(true),
            font_size: resolve_number(
                "text_size",
                options.text_size.as_ref(),
                DEFAULT_TEXT_SIZE,
                TEXT_SIZE_RANGE,
            ),
            text_contrast: options
                .text_contrast
                .as_deref()
                .map(TextContrast::parse)
                .unwrap_or_default(),
            show_percent: options.show_percent.unwrap_or(true),
            label_template,
        }
    }

    /// Re-clamps a hand-built config so it can be fed straight to the layout engine.
    pub fn clamped(mut self) -> Self {
        self.min_step_height =
            clamp_or_default(self.min_step_height, DEFAULT_MIN_STEP_HEIGHT, MIN_STEP_HEIGHT_RANGE);
        self.gap = clamp_or_default(self.gap, DEFAULT_GAP, GAP_RANGE);
        self.top_width_pct =
            clamp_or_default(self.top_width_pct, DEFAULT_TOP_WIDTH_PCT, TOP_WIDTH_PCT_RANGE);
        self.min_width_pct =
            clamp_or_default(self.min_width_pct, DEFAULT_MIN_WIDTH_PCT, MIN_WIDTH_PCT_RANGE);
        self.font_size = clamp_or_default(self.font_size, DEFAULT_TEXT_SIZE, TEXT_SIZE_RANGE);
        if self.label_template.is_empty() {
            self.label_template = DEFAULT_LABEL_TEMPLATE.to_string();
        }
        self
    }
}

fn resolve_number(
    key: &str,
    raw: Option<&NumberOrString>,
    default: f32,
    range: (f32, f32),
) -> f32 {
    let Some(raw) = raw else {
        return default;
    };
    let Some(value) = raw.as_f32() else {
        warn!("option {key}: {raw:?} is not a number, using {default}");
        return default;
    };
    let clamped = value.clamp(range.0, range.1);
    if clamped != value {
        warn!("option {key}: {value} clamped to {clamped}");
    }
    clamped
}

fn clamp_or_default(value: f32, default: f32, range: (f32, f32)) -> f32 {
    if value.is_finite() {
        value.clamp(range.0, range.1)
    } else {
        default
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    /// Height offered by the host; 0 means unknown.
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 0.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub options: FunnelOptions,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::modern();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            options: FunnelOptions::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_weight: Option<u16>,
    background: Option<String>,
    light_text_color: Option<String>,
    dark_text_color: Option<String>,
    palette_hue: Option<NumberOrString>,
    palette_saturation: Option<NumberOrString>,
    palette_base_lightness: Option<NumberOrString>,
    palette_lightness_step: Option<NumberOrString>,
    palette_min_lightness: Option<NumberOrString>,
    contrast_threshold: Option<NumberOrString>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    options: Option<FunnelOptions>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" | "default" => config.theme = Theme::modern(),
            "transparent" => config.theme = Theme::transparent(),
            other => warn!("unknown theme {other:?}, keeping modern"),
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_weight {
            config.theme.font_weight = v;
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            config.theme.background = v;
        }
        if let Some(v) = vars.light_text_color {
            config.theme.light_text_color = v;
        }
        if let Some(v) = vars.dark_text_color {
            config.theme.dark_text_color = v;
        }
        let palette = &mut config.theme.palette;
        if let Some(v) = vars.palette_hue.as_ref().and_then(NumberOrString::as_f32) {
            palette.hue = v.rem_euclid(360.0);
        }
        if let Some(v) = vars.palette_saturation.as_ref().and_then(NumberOrString::as_f32) {
            palette.saturation = v.clamp(0.0, 100.0);
        }
        if let Some(v) = vars
            .palette_base_lightness
            .as_ref()
            .and_then(NumberOrString::as_f32)
        {
            palette.base_lightness = v.clamp(0.0, 100.0);
        }
        if let Some(v) = vars
            .palette_lightness_step
            .as_ref()
            .and_then(NumberOrString::as_f32)
        {
            palette.lightness_step = v;
        }
        if let Some(v) = vars
            .palette_min_lightness
            .as_ref()
            .and_then(NumberOrString::as_f32)
        {
            palette.min_lightness = v.clamp(0.0, 100.0);
        }
        if let Some(v) = vars.contrast_threshold.as_ref().and_then(NumberOrString::as_f32) {
            palette.contrast_threshold = v.clamp(0.0, 100.0);
        }
    }

    if let Some(options) = parsed.options {
        config.options.merge(options);
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    Ok(config)
}
