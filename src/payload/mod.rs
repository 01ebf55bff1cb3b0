//! Cached ranked-result payloads.
//!
//! A payload is the JSON array of the ranked records in their canonical shape. Decoding
//! resolves every entry back to the live catalog record by name, so a payload written against
//! an older catalog (or tampered with) is rejected instead of served.

use std::collections::HashSet;

use thiserror::Error;

use crate::catalog::{Catalog, Record};

#[derive(Debug, Error)]
pub enum PayloadError {
    /// Not a JSON array of records.
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload names a record that is not in the catalog.
    #[error("payload references unknown record '{name}'")]
    UnknownRecord { name: String },

    /// The same record appears twice.
    #[error("payload lists record '{name}' more than once")]
    DuplicateRecord { name: String },
}

pub type PayloadResult<T> = Result<T, PayloadError>;

/// Serializes `records` for the cache.
pub fn encode(records: &[Record]) -> PayloadResult<String> {
    Ok(serde_json::to_string(records)?)
}

/// Parses a payload and maps it onto `catalog`, keeping payload order.
pub fn decode(raw: &str, catalog: &Catalog) -> PayloadResult<Vec<Record>> {
    let cached: Vec<Record> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(cached.len());
    cached
        .into_iter()
        .map(|entry| {
            let record = catalog
                .get_by_name(&entry.name)
                .ok_or_else(|| PayloadError::UnknownRecord {
                    name: entry.name.clone(),
                })?;
            if !seen.insert(entry.name.clone()) {
                return Err(PayloadError::DuplicateRecord { name: entry.name });
            }
            Ok(record.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Statistics;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::from_value(json!([
            {
                "name": "Ada",
                "title": "Professor",
                "research_areas": {"scholar": ["Compilers"], "site": ["Type Systems"]},
                "statistics": {"all": {"citations": "1,200", "h-index": 15, "i10-index": 20}}
            },
            {"name": "Grace", "research_areas": ["Databases"]}
        ]))
        .expect("valid catalog")
    }

    #[test]
    fn test_roundtrip_preserves_order_and_fields() {
        let catalog = catalog();
        let ranked = vec![
            catalog.get(1).cloned().expect("grace"),
            catalog.get(0).cloned().expect("ada"),
        ];
        let raw = encode(&ranked).expect("encode");
        let decoded = decode(&raw, &catalog).expect("decode");
        assert_eq!(decoded, ranked);
        assert_eq!(decoded[1].statistics, Statistics::new(1200.0, 15.0, 20.0));
        assert_eq!(decoded[1].extra.get("title"), Some(&json!("Professor")));
    }

    #[test]
    fn test_encoded_shape_is_canonical() {
        let catalog = catalog();
        let raw = encode(&catalog.head(1)).expect("encode");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value[0]["research_areas"], json!(["Compilers", "Type Systems"]));
        assert_eq!(value[0]["statistics"]["h-index"], json!(15.0));
    }

    #[test]
    fn test_empty_list() {
        let catalog = catalog();
        assert_eq!(encode(&[]).expect("encode"), "[]");
        assert!(decode("[]", &catalog).expect("decode").is_empty());
    }

    #[test]
    fn test_malformed_payload() {
        let catalog = catalog();
        assert!(matches!(decode("{oops", &catalog), Err(PayloadError::Json(_))));
        assert!(matches!(decode("{\"name\": \"Ada\"}", &catalog), Err(PayloadError::Json(_))));
    }

    #[test]
    fn test_unknown_record_rejected() {
        let catalog = catalog();
        let raw = r#"[{"name": "Linus", "research_areas": []}]"#;
        assert!(matches!(
            decode(raw, &catalog),
            Err(PayloadError::UnknownRecord { name }) if name == "Linus"
        ));
    }

    #[test]
    fn test_duplicate_record_rejected() {
        let catalog = catalog();
        let raw = r#"[{"name": "Ada"}, {"name": "Ada"}]"#;
        assert!(matches!(
            decode(raw, &catalog),
            Err(PayloadError::DuplicateRecord { .. })
        ));
    }
}
