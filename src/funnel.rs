//! End-to-end funnel construction: validate, normalize, lay out.
//!
//! Every call is a pure function of its arguments. Failures are reported
//! before any geometry exists, so callers either get a complete layout or
//! none at all.

use log::debug;

use crate::config::{FunnelOptions, LayoutConfig};
use crate::error::Result;
use crate::ir::QueryResult;
use crate::layout::{Canvas, FunnelLayout, compute_layout};
use crate::normalize::{normalize, select_fields};
use crate::theme::Theme;

pub fn build_funnel(
    result: &QueryResult,
    options: &FunnelOptions,
    theme: &Theme,
    canvas: Canvas,
) -> Result<FunnelLayout> {
    build_funnel_with_config(result, &LayoutConfig::from_options(options), theme, canvas)
}

pub fn build_funnel_with_config(
    result: &QueryResult,
    config: &LayoutConfig,
    theme: &Theme,
    canvas: Canvas,
) -> Result<FunnelLayout> {
    let (dimension, measure) = select_fields(&result.fields)?;
    debug!(
        "funnel: stage field {:?}, value field {:?}",
        dimension.name, measure.name
    );

    let records = normalize(result)?;
    let config = config.clone().clamped();
    debug!("funnel: {} stages normalized", records.len());

    let layout = compute_layout(&records, &config, theme, canvas);
    debug!(
        "funnel: canvas {}x{}, step height {}, reference value {}",
        layout.width, layout.height, layout.step_height, layout.reference_value
    );
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NumberOrString;
    use crate::error::FunnelError;
    use crate::ir::{Cell, DrillLink};

    fn scenario_rows() -> QueryResult {
        QueryResult::from_stages(
            "funnel.stage",
            "funnel.count",
            [
                ("Visit", 1000.0, "1,000"),
                ("Signup", 400.0, "400"),
                ("Purchase", 100.0, "100"),
            ],
        )
    }

    fn labels(layout: &FunnelLayout) -> Vec<&str> {
        layout.steps.iter().map(|s| s.label_text.as_str()).collect()
    }

    #[test]
    fn default_options_render_full_labels() {
        let layout = build_funnel(
            &scenario_rows(),
            &FunnelOptions::default(),
            &Theme::modern(),
            Canvas::default(),
        )
        .unwrap();
        assert_eq!(layout.reference_value, 1000.0);
        assert_eq!(
            labels(&layout),
            [
                "Visit — 1,000 (100%)",
                "Signup — 400 (40%)",
                "Purchase — 100 (10%)"
            ]
        );
        let widths: Vec<f32> = layout
            .steps
            .iter()
            .map(|s| s.geometry.top_width())
            .collect();
        assert_eq!(widths, [800.0, 320.0, 160.0]);
    }

    #[test]
    fn hidden_percent_strips_suffixes() {
        let options = FunnelOptions {
            show_percent: Some(false),
            ..Default::default()
        };
        let layout = build_funnel(&scenario_rows(), &options, &Theme::modern(), Canvas::default())
            .unwrap();
        assert_eq!(
            labels(&layout),
            ["Visit — 1,000", "Signup — 400", "Purchase — 100"]
        );
    }

    #[test]
    fn empty_rows_produce_no_layout() {
        let result = QueryResult::from_stages("s", "v", std::iter::empty());
        let err = build_funnel(
            &result,
            &FunnelOptions::default(),
            &Theme::modern(),
            Canvas::default(),
        )
        .unwrap_err();
        assert_eq!(err, FunnelError::EmptyData);
    }

    #[test]
    fn missing_dimension_is_schema_error() {
        let mut result = scenario_rows();
        result.fields.dimensions.clear();
        let err = build_funnel(
            &result,
            &FunnelOptions::default(),
            &Theme::modern(),
            Canvas::default(),
        )
        .unwrap_err();
        assert_eq!(err.group(), "req");
    }

    #[test]
    fn out_of_range_options_never_reach_layout() {
        let options = FunnelOptions {
            min_step_height: Some(NumberOrString::Number(1.0)),
            min_width_pct: Some(NumberOrString::Number(-5.0)),
            ..Default::default()
        };
        let layout = build_funnel(&scenario_rows(), &options, &Theme::modern(), Canvas::default())
            .unwrap();
        assert!(layout.step_height >= 20.0);
        assert!(layout.steps.iter().all(|s| s.geometry.bottom_width() >= 8.0));
    }

    #[test]
    fn drill_links_are_forwarded_verbatim() {
        let mut result = scenario_rows();
        let link = DrillLink::from(serde_json::json!({
            "label": "Show All 400",
            "url": "/explore?fields=a",
            "type": "measure_default",
            "opaque": {"k": [1, 2]}
        }));
        result.data[1].insert(
            "funnel.count".to_string(),
            Cell::new(400).with_rendered("400").with_links(vec![link.clone()]),
        );
        let layout = build_funnel(
            &result,
            &FunnelOptions::default(),
            &Theme::modern(),
            Canvas::default(),
        )
        .unwrap();
        assert!(layout.steps[0].drill_links.is_empty());
        assert_eq!(layout.steps[1].drill_links, vec![link]);
    }
}
