use crate::config::RenderConfig;
use crate::layout::{FunnelLayout, StepVisual};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Paints a computed layout as a standalone SVG document. No layout
/// decisions are made here; every coordinate comes from `layout`.
pub fn render_svg(layout: &FunnelLayout, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"funnel-svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(
        "<style>.funnel-step { cursor: pointer; } .funnel-label { pointer-events: none; }</style>",
    );

    if theme.background != "none" {
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(&theme.background)
        ));
    }

    let clipped: Vec<&StepVisual> = layout.steps.iter().filter(|s| s.clip.is_some()).collect();
    if !clipped.is_empty() {
        svg.push_str("<defs>");
        for step in clipped {
            svg.push_str(&clip_path_svg(step));
        }
        svg.push_str("</defs>");
    }

    for step in &layout.steps {
        svg.push_str(&step_svg(step));
        svg.push_str(&label_svg(step, theme));
    }

    svg.push_str("</svg>");
    svg
}

fn clip_id(step: &StepVisual) -> String {
    format!("funnel-clip-{}", step.geometry.index)
}

fn clip_path_svg(step: &StepVisual) -> String {
    let Some(clip) = step.clip else {
        return String::new();
    };
    format!(
        "<clipPath id=\"{}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{:.2}\"/></clipPath>",
        clip_id(step),
        clip.x,
        clip.y,
        clip.width,
        clip.height,
        clip.radius
    )
}

fn step_svg(step: &StepVisual) -> String {
    let points = step
        .geometry
        .polygon()
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");
    let clip_attr = if step.clip.is_some() {
        format!(" clip-path=\"url(#{})\"", clip_id(step))
    } else {
        String::new()
    };
    let links_attr = if step.drill_links.is_empty() {
        String::new()
    } else {
        match serde_json::to_string(&step.drill_links) {
            Ok(json) => format!(" data-links=\"{}\"", escape_xml(&json)),
            Err(err) => {
                log::warn!("step {}: drill links not serializable: {err}", step.geometry.index);
                String::new()
            }
        }
    };
    format!(
        "<polygon class=\"funnel-step\" data-index=\"{}\" points=\"{}\" fill=\"{}\"{}{}/>",
        step.geometry.index,
        points,
        escape_xml(&step.fill_color),
        clip_attr,
        links_attr
    )
}

fn label_svg(step: &StepVisual, theme: &Theme) -> String {
    format!(
        "<text class=\"funnel-label\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" fill=\"{}\">{}</text>",
        step.label_x,
        step.label_y,
        escape_xml(&theme.font_family),
        step.font_size,
        theme.font_weight,
        escape_xml(&step.text_color),
        escape_xml(&step.label_text)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height.max(1.0)) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some(color) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(color);
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.strip_prefix('#')?;
    let expand = |c: u8| c * 16 + c;
    let digit = |c: char| c.to_digit(16).map(|d| d as u8);
    let (r, g, b) = match hex.len() {
        3 => {
            let mut chars = hex.chars();
            (
                expand(digit(chars.next()?)?),
                expand(digit(chars.next()?)?),
                expand(digit(chars.next()?)?),
            )
        }
        6 => (
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ),
        _ => return None,
    };
    Some(resvg::tiny_skia::Color::from_rgba8(r, g, b, 255))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
