use crate::ir::DrillLink;
use crate::layout::{FunnelLayout, StepVisual};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// JSON-friendly snapshot of a computed funnel, for hosts that paint the
/// steps themselves.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub step_height: f32,
    pub reference_value: f64,
    pub steps: Vec<StepDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDump {
    pub index: usize,
    pub stage: String,
    pub value: f64,
    pub percent: f64,
    /// TL, TR, BR, BL.
    pub points: Vec<[f32; 2]>,
    pub y_top: f32,
    pub height: f32,
    pub top_width: f32,
    pub bottom_width: f32,
    pub fill_color: String,
    pub text_color: String,
    pub label_text: String,
    pub label_x: f32,
    pub label_y: f32,
    pub font_size: f32,
    pub corner_radius: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipDump>,
    pub drill_links: Vec<DrillLink>,
}

#[derive(Debug, Serialize)]
pub struct ClipDump {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rx: f32,
}

impl StepDump {
    fn from_step(step: &StepVisual) -> Self {
        let geometry = &step.geometry;
        StepDump {
            index: geometry.index,
            stage: step.stage.clone(),
            value: step.value,
            percent: step.percent,
            points: geometry.polygon().iter().map(|p| [p.x, p.y]).collect(),
            y_top: geometry.y_top,
            height: geometry.height,
            top_width: geometry.top_width(),
            bottom_width: geometry.bottom_width(),
            fill_color: step.fill_color.clone(),
            text_color: step.text_color.clone(),
            label_text: step.label_text.clone(),
            label_x: step.label_x,
            label_y: step.label_y,
            font_size: step.font_size,
            corner_radius: step.corner_radius,
            clip: step.clip.map(|clip| ClipDump {
                x: clip.x,
                y: clip.y,
                width: clip.width,
                height: clip.height,
                rx: clip.radius,
            }),
            drill_links: step.drill_links.clone(),
        }
    }
}

impl LayoutDump {
    pub fn from_layout(layout: &FunnelLayout) -> Self {
        LayoutDump {
            width: layout.width,
            height: layout.height,
            step_height: layout.step_height,
            reference_value: layout.reference_value,
            steps: layout.steps.iter().map(StepDump::from_step).collect(),
        }
    }
}

pub fn layout_to_json(layout: &FunnelLayout) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_layout(layout))?)
}

pub fn write_layout_dump(path: &Path, layout: &FunnelLayout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FunnelOptions;
    use crate::funnel::build_funnel;
    use crate::ir::QueryResult;
    use crate::layout::Canvas;
    use crate::theme::Theme;

    #[test]
    fn dump_uses_camel_case_keys() {
        let result = QueryResult::from_stages("s", "v", [("Only", 10.0, "10")]);
        let layout = build_funnel(
            &result,
            &FunnelOptions::default(),
            &Theme::modern(),
            Canvas::default(),
        )
        .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&layout_to_json(&layout).unwrap()).unwrap();
        let step = &json["steps"][0];
        assert_eq!(json["referenceValue"], 10.0);
        assert_eq!(step["labelText"], "Only — 10 (100%)");
        assert_eq!(step["topWidth"], 800.0);
        assert_eq!(step["bottomWidth"], 680.0);
        assert_eq!(step["points"].as_array().unwrap().len(), 4);
        assert_eq!(step["clip"]["rx"], 12.0);
        assert!(step["drillLinks"].as_array().unwrap().is_empty());
    }
}
