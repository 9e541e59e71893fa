use funnel_rs_renderer::layout_dump::layout_to_json;
use funnel_rs_renderer::{
    Canvas, FunnelError, FunnelLayout, FunnelOptions, HostError, Theme, build_funnel,
    parse_query_result, render_svg,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunnelRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    background: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    #[serde(flatten)]
    options: FunnelOptions,
}

impl FunnelRenderOptions {
    fn from_json(raw: Option<&str>) -> Result<Self, String> {
        match raw {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str(raw).map_err(|error| error.to_string())
            }
            _ => Ok(Self::default()),
        }
    }

    fn theme(&self) -> Theme {
        let mut theme = match self.theme.as_deref() {
            Some("modern") | Some("default") => Theme::modern(),
            _ => Theme::transparent(),
        };
        if let Some(font_family) = &self.font_family {
            theme.font_family = font_family.clone();
        }
        if let Some(background) = &self.background {
            theme.background = background.clone();
        }
        theme
    }

    fn canvas(&self) -> Canvas {
        Canvas::new(self.width.unwrap_or(0.0), self.height.unwrap_or(0.0))
    }
}

/// Funnel errors go out as the JSON-encoded host error; anything else as
/// plain text.
fn error_text(error: anyhow::Error) -> String {
    match error.downcast_ref::<FunnelError>() {
        Some(funnel) => serde_json::to_string(&HostError::from(funnel))
            .unwrap_or_else(|_| funnel.to_string()),
        None => format!("{error:#}"),
    }
}

fn layout_for(data_json: &str, options: &FunnelRenderOptions) -> Result<FunnelLayout, String> {
    let result = parse_query_result(data_json).map_err(error_text)?;
    build_funnel(&result, &options.options, &options.theme(), options.canvas())
        .map_err(|error| error_text(error.into()))
}

fn svg_for(data_json: &str, options_json: Option<&str>) -> Result<String, String> {
    let options = FunnelRenderOptions::from_json(options_json)?;
    let layout = layout_for(data_json, &options)?;
    Ok(render_svg(&layout, &options.theme()))
}

fn layout_json_for(data_json: &str, options_json: Option<&str>) -> Result<String, String> {
    let options = FunnelRenderOptions::from_json(options_json)?;
    let layout = layout_for(data_json, &options)?;
    layout_to_json(&layout).map_err(error_text)
}

#[wasm_bindgen]
pub fn render_funnel_svg(data_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    svg_for(data_json, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn compute_funnel_layout(
    data_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    layout_json_for(data_json, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}
