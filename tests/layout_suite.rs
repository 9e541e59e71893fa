use std::path::Path;

use funnel_rs_renderer::{
    Canvas, FunnelError, FunnelLayout, FunnelOptions, LayoutConfig, RenderOptions, TextContrast,
    Theme, build_funnel, parse_query_result, render_svg, render_with_options,
};
use funnel_rs_renderer::config::NumberOrString;

fn fixture_text(rel: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    std::fs::read_to_string(&path).expect("fixture read failed")
}

fn layout_fixture(rel: &str, options: &FunnelOptions, canvas: Canvas) -> FunnelLayout {
    let input = fixture_text(rel);
    let parsed = parse_query_result(&input).expect("parse failed");
    build_funnel(&parsed, options, &Theme::modern(), canvas).expect("layout failed")
}

fn labels(layout: &FunnelLayout) -> Vec<&str> {
    layout.steps.iter().map(|s| s.label_text.as_str()).collect()
}

const RENDERABLE: [&str; 5] = [
    "basic.json",
    "zero_first.json",
    "single.json",
    "messy.json5",
    "drill.json",
];

fn option_sets() -> Vec<FunnelOptions> {
    let number = |v: f64| Some(NumberOrString::Number(v));
    vec![
        FunnelOptions::default(),
        FunnelOptions {
            show_percent: Some(false),
            gap: number(0.0),
            min_width_pct: number(45.0),
            ..Default::default()
        },
        FunnelOptions {
            min_step_height: number(3.0),
            top_width_pct: number(60.0),
            min_width_pct: number(99.0),
            rounded: Some(false),
            text_contrast: Some("auto".to_string()),
            ..Default::default()
        },
        FunnelOptions {
            gap: number(30.0),
            top_width_pct: number(500.0),
            min_width_pct: number(-2.0),
            show_percent: Some(false),
            ..Default::default()
        },
        FunnelOptions {
            min_step_height: number(1e38),
            gap: Some(NumberOrString::String("1e300".to_string())),
            text_size: number(f64::MAX),
            ..Default::default()
        },
    ]
}

fn canvases() -> [Canvas; 5] {
    [
        Canvas::default(),
        Canvas::new(320.0, 900.0),
        Canvas::new(0.0, 0.0),
        Canvas::new(1200.0, f32::NAN),
        Canvas::new(f32::MAX, 3.0e38),
    ]
}

#[test]
fn scenario_basic_funnel() {
    let layout = layout_fixture("basic.json", &FunnelOptions::default(), Canvas::default());
    assert_eq!(layout.reference_value, 1000.0);
    assert_eq!(
        labels(&layout),
        [
            "Visit — 1,000 (100%)",
            "Signup — 400 (40%)",
            "Purchase — 100 (10%)"
        ]
    );
    let top: Vec<f32> = layout.steps.iter().map(|s| s.geometry.top_width()).collect();
    assert_eq!(top, [800.0, 320.0, 160.0]);
}

#[test]
fn scenario_hidden_percent() {
    let options = FunnelOptions {
        show_percent: Some(false),
        ..Default::default()
    };
    let layout = layout_fixture("basic.json", &options, Canvas::default());
    assert_eq!(
        labels(&layout),
        ["Visit — 1,000", "Signup — 400", "Purchase — 100"]
    );
}

#[test]
fn scenario_empty_rows() {
    let parsed = parse_query_result(&fixture_text("empty.json")).unwrap();
    let err = build_funnel(
        &parsed,
        &FunnelOptions::default(),
        &Theme::modern(),
        Canvas::default(),
    )
    .unwrap_err();
    assert_eq!(err, FunnelError::EmptyData);
    assert_eq!(err.to_host_error().title, "No data");
}

#[test]
fn scenario_zero_leading_stage() {
    let layout = layout_fixture("zero_first.json", &FunnelOptions::default(), Canvas::default());
    assert_eq!(layout.reference_value, 50.0);
    assert_eq!(layout.steps[1].percent, 100.0);
    assert_eq!(layout.steps[2].percent, 40.0);
    assert_eq!(layout.steps[0].percent, 0.0);
    assert_eq!(layout.steps[0].geometry.top_width(), 160.0);
}

#[test]
fn scenario_missing_dimension() {
    let parsed = parse_query_result(&fixture_text("missing_dimension.json")).unwrap();
    let err = build_funnel(
        &parsed,
        &FunnelOptions::default(),
        &Theme::modern(),
        Canvas::default(),
    )
    .unwrap_err();
    assert!(matches!(err, FunnelError::Schema { dimensions: 0, .. }));
    assert_eq!(err.to_host_error().group, "req");
}

#[test]
fn scenario_single_row() {
    let layout = layout_fixture("single.json", &FunnelOptions::default(), Canvas::default());
    assert_eq!(layout.steps.len(), 1);
    let step = &layout.steps[0].geometry;
    let expected = (0.2f32 * 800.0).max(step.top_width() * 0.85);
    assert!((step.bottom_width() - expected).abs() < 1e-3);
}

#[test]
fn messy_values_normalize_to_zero() {
    let layout = layout_fixture("messy.json5", &FunnelOptions::default(), Canvas::default());
    let values: Vec<f64> = layout.steps.iter().map(|s| s.value).collect();
    assert_eq!(
        values,
        [5000.0, 0.0, 0.0, 1250.5, 0.0, 0.0, 900.0, 300.0, 120.0]
    );
    assert_eq!(layout.steps[0].label_text, "Landing — 5K (100%)");
    assert_eq!(layout.steps[3].label_text, "Paid — 1,250.5 (25%)");
    assert!(layout.steps[4].label_text.starts_with("∅ — "));
}

#[test]
fn drill_links_survive_the_pipeline() {
    let layout = layout_fixture("drill.json", &FunnelOptions::default(), Canvas::default());
    let links = &layout.steps[0].drill_links;
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].url(), Some("/explore/funnel?fields=v"));
    assert_eq!(links[0].get("type_label"), Some(&serde_json::json!("Drill into")));
    assert!(layout.steps[2].drill_links.is_empty());

    let raw: serde_json::Value = serde_json::from_str(&fixture_text("drill.json")).unwrap();
    let forwarded = serde_json::to_value(&layout.steps[1].drill_links).unwrap();
    assert_eq!(forwarded, raw["data"][1]["v"]["links"]);
    let dump: serde_json::Value =
        serde_json::from_str(&funnel_rs_renderer::layout_dump::layout_to_json(&layout).unwrap())
            .unwrap();
    assert_eq!(dump["steps"][1]["drillLinks"], raw["data"][1]["v"]["links"]);
}

#[test]
fn invariants_hold_across_fixtures_options_and_canvases() {
    for rel in RENDERABLE {
        for options in option_sets() {
            let config = LayoutConfig::from_options(&options);
            for canvas in canvases() {
                let layout = layout_fixture(rel, &options, canvas);
                let n = layout.steps.len();
                let floor = config.min_width_pct / 100.0 * layout.width;
                let x_tol = 1e-3 + layout.width * 1e-6;
                let y_tol = 1e-3 + layout.height * 1e-6;
                let required =
                    n as f32 * config.min_step_height + (n as f32 - 1.0) * config.gap;

                assert!(n > 0, "{rel}: no steps");
                assert!(layout.height >= required, "{rel}: canvas too short");
                for (idx, step) in layout.steps.iter().enumerate() {
                    let geometry = &step.geometry;
                    assert_eq!(geometry.index, idx, "{rel}: index order");
                    assert!(
                        geometry
                            .polygon()
                            .iter()
                            .all(|p| p.x.is_finite() && p.y.is_finite()),
                        "{rel}: non-finite corner at {idx}"
                    );
                    assert!(step.label_y.is_finite() && step.font_size.is_finite());
                    assert!(geometry.top_width() >= floor - x_tol, "{rel}: top below floor");
                    assert!(
                        geometry.bottom_width() >= floor - x_tol,
                        "{rel}: bottom below floor"
                    );
                    assert!(geometry.height >= config.min_step_height);
                    if let Some(next) = layout.steps.get(idx + 1) {
                        assert_eq!(
                            geometry.bottom_width(),
                            next.geometry.top_width(),
                            "{rel}: discontinuity after step {idx}"
                        );
                        assert!(next.geometry.y_top >= geometry.y_bottom() - y_tol);
                    }
                    if !config.show_percent {
                        assert!(
                            !step.label_text.trim_end().ends_with("%)"),
                            "{rel}: percent left in {:?}",
                            step.label_text
                        );
                    }
                    if config.text_contrast == TextContrast::Auto {
                        let light = 50 - 4 * (idx as i32) < 40;
                        let expected = if light { "#fff" } else { "#111" };
                        assert_eq!(step.text_color, expected, "{rel}: contrast at {idx}");
                    }
                }
            }
        }
    }
}

#[test]
fn render_all_fixtures() {
    for rel in RENDERABLE {
        let svg = render_with_options(&fixture_text(rel), RenderOptions::modern())
            .unwrap_or_else(|err| panic!("{rel}: {err}"));
        assert!(svg.contains("<svg"), "{rel}: missing <svg tag");
        assert!(svg.contains("</svg>"), "{rel}: missing </svg tag");
    }
}

#[test]
fn render_errors_carry_funnel_error() {
    let err = render_with_options(&fixture_text("empty.json"), RenderOptions::modern())
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<FunnelError>(),
        Some(&FunnelError::EmptyData)
    );
}

#[test]
fn repeated_calls_are_independent() {
    let input = parse_query_result(&fixture_text("basic.json")).unwrap();
    let theme = Theme::modern();
    let first = build_funnel(&input, &FunnelOptions::default(), &theme, Canvas::default()).unwrap();
    let hidden = FunnelOptions {
        show_percent: Some(false),
        ..Default::default()
    };
    let _ = build_funnel(&input, &hidden, &theme, Canvas::new(300.0, 50.0)).unwrap();
    let again = build_funnel(&input, &FunnelOptions::default(), &theme, Canvas::default()).unwrap();
    assert_eq!(first, again);
    assert_eq!(render_svg(&first, &theme), render_svg(&again, &theme));
}
