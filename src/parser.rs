use crate::ir::QueryResult;
use anyhow::{Context, Result};

/// Parses a host query-result document. Strict JSON is tried first; hand
/// written inputs with comments or trailing commas go through JSON5.
pub fn parse_query_result(input: &str) -> Result<QueryResult> {
    let trimmed = input.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(anyhow::anyhow!("input is empty"));
    }
    match serde_json::from_str::<QueryResult>(trimmed) {
        Ok(result) => Ok(result),
        Err(json_err) => json5::from_str::<QueryResult>(trimmed)
            .with_context(|| format!("input is neither JSON ({json_err}) nor JSON5")),
    }
}
