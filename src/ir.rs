use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field metadata reported by the host query engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FieldMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryFields {
    #[serde(default)]
    pub dimensions: Vec<FieldMeta>,
    #[serde(default)]
    pub measure_like: Vec<FieldMeta>,
}

/// An opaque drill-through link attached to a data cell. The host's JSON is
/// kept exactly as sent; the accessors only peek at the common keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrillLink(pub serde_json::Value);

impl DrillLink {
    pub fn label(&self) -> Option<&str> {
        self.0.get("label").and_then(serde_json::Value::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.0.get("url").and_then(serde_json::Value::as_str)
    }

    /// The host's `type` key.
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(serde_json::Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

impl From<serde_json::Value> for DrillLink {
    fn from(value: serde_json::Value) -> Self {
        DrillLink(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
    #[serde(
        default,
        deserialize_with = "links_or_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub links: Vec<DrillLink>,
}

/// `links` that is null or not an array means "no links", never a parse error.
fn links_or_empty<'de, D>(deserializer: D) -> Result<Vec<DrillLink>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items.into_iter().map(DrillLink).collect(),
        _ => Vec::new(),
    })
}

impl Cell {
    pub fn new(value: impl Into<serde_json::Value>) -> Self {
        Self {
            value: value.into(),
            rendered: None,
            links: Vec::new(),
        }
    }

    pub fn with_rendered(mut self, rendered: impl Into<String>) -> Self {
        self.rendered = Some(rendered.into());
        self
    }

    pub fn with_links(mut self, links: Vec<DrillLink>) -> Self {
        self.links = links;
        self
    }
}

pub type Row = BTreeMap<String, Cell>;

/// One query result as delivered by the host: field metadata plus ordered rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub fields: QueryFields,
    #[serde(default)]
    pub data: Vec<Row>,
}

impl QueryResult {
    /// Builds a single-dimension, single-measure result from
    /// `(stage, value, rendered value)` triples.
    pub fn from_stages<'a, I>(dimension: &str, measure: &str, stages: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64, &'a str)>,
    {
        let data = stages
            .into_iter()
            .map(|(stage, value, rendered)| {
                let mut row = Row::new();
                row.insert(dimension.to_string(), Cell::new(stage));
                row.insert(
                    measure.to_string(),
                    Cell::new(value).with_rendered(rendered),
                );
                row
            })
            .collect();
        Self {
            fields: QueryFields {
                dimensions: vec![FieldMeta::new(dimension)],
                measure_like: vec![FieldMeta::new(measure)],
            },
            data,
        }
    }
}

/// A normalized funnel stage. `value` is always finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct StageRecord {
    pub stage: String,
    pub value: f64,
    pub formatted_value: String,
    pub drill_links: Vec<DrillLink>,
}
