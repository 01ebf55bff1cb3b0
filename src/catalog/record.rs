use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Impact statistics of a researcher. Missing or unparsable values are `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub citations: f64,
    #[serde(rename = "h-index")]
    pub h_index: f64,
    #[serde(rename = "i10-index")]
    pub i10_index: f64,
}

impl Statistics {
    /// Builds statistics from raw counts.
    pub fn new(citations: f64, h_index: f64, i10_index: f64) -> Self {
        Self {
            citations,
            h_index,
            i10_index,
        }
    }

    /// Reads statistics from a raw JSON value.
    ///
    /// Accepts both the flat `{"citations": ..}` shape and the scraper's nested
    /// `{"all": {..}, "since2020": {..}}` shape, preferring `all`.
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(Value::Object(map)) = value else {
            return Self::default();
        };

        let stats = match map.get("all") {
            Some(Value::Object(all)) => all,
            _ => map,
        };

        Self {
            citations: numeric_field(stats.get("citations")),
            h_index: numeric_field(stats.get("h-index")),
            i10_index: numeric_field(stats.get("i10-index")),
        }
    }
}

/// Parses a scraped statistic. Strings may carry thousands separators.
fn numeric_field(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// One researcher profile, normalized at load time.
///
/// Serializes to the canonical shape (flat `research_areas` list, flat statistics) so a
/// cached ranked result decodes back into the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,

    #[serde(default)]
    pub research_areas: Vec<String>,

    #[serde(default)]
    pub statistics: Statistics,

    /// Profile fields the matcher does not interpret (title, email, links, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Creates a record with no extra profile fields.
    pub fn new(name: impl Into<String>, research_areas: Vec<String>, statistics: Statistics) -> Self {
        Self {
            name: name.into(),
            research_areas,
            statistics,
            extra: Map::new(),
        }
    }

    /// Research areas joined with single spaces (the text every strategy scores against).
    pub fn research_text(&self) -> String {
        self.research_areas.join(" ")
    }
}

/// Flattens the `research_areas` field into one ordered sequence.
///
/// The scraper writes either a list or a mapping of source -> list; mappings are flattened in
/// document order. Null, blank and non-string entries are dropped.
pub fn flatten_research_areas(value: Option<&Value>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(value) = value {
        collect_areas(value, &mut out);
    }
    out
}

fn collect_areas(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        }
        Value::Array(items) => {
            for item in items {
                if let Value::String(_) = item {
                    collect_areas(item, out);
                }
            }
        }
        Value::Object(map) => {
            for nested in map.values() {
                if let Value::Array(_) = nested {
                    collect_areas(nested, out);
                }
            }
        }
        _ => {}
    }
}
