use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LayoutConfig;
use crate::ir::StageRecord;

pub const STAGE_PLACEHOLDER: &str = "{{stage}}";
pub const VALUE_PLACEHOLDER: &str = "{{value}}";
pub const PCT_PLACEHOLDER: &str = "{{pct}}";

static TRAILING_PERCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(\s*[0-9]+(\.[0-9]+)?%\s*\)\s*$").unwrap());

/// Share of the reference value in percent, rounded to one decimal.
pub fn percent_of(value: f64, reference: f64) -> f64 {
    if reference <= 0.0 {
        return 0.0;
    }
    (value / reference * 100.0 * 10.0).round() / 10.0
}

/// `40` -> `"40%"`, `12.3` -> `"12.3%"`.
pub fn format_percent(pct: f64) -> String {
    if pct.fract() == 0.0 {
        format!("{:.0}%", pct)
    } else {
        format!("{:.1}%", pct)
    }
}

/// Replaces the first occurrence of each placeholder, in stage/value/pct order.
pub fn expand_template(template: &str, stage: &str, value: &str, pct: &str) -> String {
    template
        .replacen(STAGE_PLACEHOLDER, stage, 1)
        .replacen(VALUE_PLACEHOLDER, value, 1)
        .replacen(PCT_PLACEHOLDER, pct, 1)
}

/// Drops a trailing `" (12.3%)"` if there is one.
pub fn strip_trailing_percent(label: &str) -> String {
    TRAILING_PERCENT_RE.replace(label, "").into_owned()
}

pub fn format_label(record: &StageRecord, pct: f64, config: &LayoutConfig) -> String {
    let label = expand_template(
        &config.label_template,
        &record.stage,
        &record.formatted_value,
        &format_percent(pct),
    );
    if config.show_percent {
        label
    } else {
        strip_trailing_percent(&label)
    }
}
