use log::warn;
use serde_json::Value;

use crate::error::{FunnelError, Result};
use crate::ir::{Cell, FieldMeta, QueryFields, QueryResult, StageRecord};

/// Text the host shows for a null cell.
pub const NULL_TEXT: &str = "∅";

/// Picks the stage dimension and value measure, or fails before any row is read.
pub fn select_fields(fields: &QueryFields) -> Result<(&FieldMeta, &FieldMeta)> {
    match (fields.dimensions.first(), fields.measure_like.first()) {
        (Some(dimension), Some(measure)) => Ok((dimension, measure)),
        _ => Err(FunnelError::Schema {
            dimensions: fields.dimensions.len(),
            measures: fields.measure_like.len(),
        }),
    }
}

pub fn normalize(result: &QueryResult) -> Result<Vec<StageRecord>> {
    let (dimension, measure) = select_fields(&result.fields)?;

    let records: Vec<StageRecord> = result
        .data
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let stage_cell = row.get(&dimension.name);
            let measure_cell = row.get(&measure.name);
            let raw = measure_cell.map(|cell| &cell.value).unwrap_or(&Value::Null);
            let value = coerce_value(raw);
            if value == 0.0 && !is_literal_zero(raw) {
                warn!("row {idx}: measure {raw} coerced to 0");
            }
            StageRecord {
                stage: text_for_cell(stage_cell),
                value,
                formatted_value: text_for_cell(measure_cell),
                drill_links: measure_cell
                    .map(|cell| cell.links.clone())
                    .unwrap_or_default(),
            }
        })
        .collect();

    if records.is_empty() {
        return Err(FunnelError::EmptyData);
    }
    Ok(records)
}

/// Loose numeric coercion. Never fails: anything that is not a finite,
/// non-negative number becomes 0.
pub fn coerce_value(value: &Value) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
    };
    if number.is_finite() { number.max(0.0) } else { 0.0 }
}

fn is_literal_zero(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok() == Some(0.0),
        Value::Bool(false) => true,
        _ => false,
    }
}

/// Display text for a cell: the host's rendered text when present, else the raw value.
pub fn text_for_cell(cell: Option<&Cell>) -> String {
    let Some(cell) = cell else {
        return NULL_TEXT.to_string();
    };
    if let Some(rendered) = cell.rendered.as_deref().filter(|r| !r.is_empty()) {
        return rendered.to_string();
    }
    match &cell.value {
        Value::Null => NULL_TEXT.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{:.0}", f)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
