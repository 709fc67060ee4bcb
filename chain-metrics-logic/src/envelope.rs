//! Flattening of metrics API responses.
//!
//! Upstream SDK responses wrap the records in envelopes whose shape varies
//! between endpoints and versions. All shape guessing happens here, so the
//! normalizer only ever sees a flat list of records.

use crate::{error::EnvelopeError, types::points::RawRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::VecDeque;

const MAX_SCAN_DEPTH: usize = 4;

/// Known locations of the record array, tried in order.
const KNOWN_PATHS: [&[&str]; 4] = [
    &["results"],
    &["result", "results"],
    &["result"],
    &["metrics"],
];

pub fn locate_array(payload: &Value) -> Option<&Vec<Value>> {
    if let Value::Array(items) = payload {
        return Some(items);
    }

    for path in KNOWN_PATHS {
        if let Some(Value::Array(items)) = lookup(payload, path) {
            tracing::trace!(path = ?path, "records found at known location");
            return Some(items);
        }
    }

    let found = scan_for_array(payload);
    if found.is_some() {
        tracing::debug!("records found by scanning payload properties");
    }
    found
}

pub fn extract_records(payload: &Value) -> Result<Vec<RawRecord>, EnvelopeError> {
    let items = locate_array(payload).ok_or(EnvelopeError::NoRecords)?;
    Ok(items.iter().map(RawRecord::from_json).collect())
}

/// Flattens the payload into a JSON array ready for
/// [`Normalizer::normalize_json`](crate::Normalizer::normalize_json).
pub fn flatten(payload: &Value) -> Result<Value, EnvelopeError> {
    locate_array(payload)
        .cloned()
        .map(Value::Array)
        .ok_or(EnvelopeError::NoRecords)
}

fn lookup<'a>(payload: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(payload, |value, key| value.as_object()?.get(*key))
}

fn scan_for_array(payload: &Value) -> Option<&Vec<Value>> {
    let mut queue: VecDeque<(&Map<String, Value>, usize)> = VecDeque::new();
    if let Value::Object(object) = payload {
        queue.push_back((object, 0));
    }
    while let Some((object, depth)) = queue.pop_front() {
        for value in object.values() {
            match value {
                Value::Array(items) => return Some(items),
                Value::Object(nested) if depth + 1 < MAX_SCAN_DEPTH => {
                    queue.push_back((nested, depth + 1))
                }
                _ => {}
            }
        }
    }
    None
}

/// Row of the chain listing API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedChain {
    pub chain_id: String,
    pub chain_name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn extract_chains(payload: &Value) -> Result<Vec<ListedChain>, EnvelopeError> {
    let items = match payload.get("chains") {
        Some(Value::Array(items)) => items,
        _ => locate_array(payload).ok_or(EnvelopeError::NoRecords)?,
    };
    items
        .iter()
        .map(|item| {
            let mut item = item.clone();
            // chain ids arrive both as numbers and as strings
            if let Some(Value::Number(number)) = item.get("chainId") {
                let chain_id = number.to_string();
                item["chainId"] = Value::String(chain_id);
            }
            serde_json::from_value(item).map_err(|err| EnvelopeError::InvalidChain(err.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::points::RawTimestamp;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn record() -> Value {
        json!({"timestamp": 1_700_000_000, "value": 3})
    }

    #[rstest]
    #[case(json!([record()]))]
    #[case(json!({"results": [record()]}))]
    #[case(json!({"result": {"results": [record()]}}))]
    #[case(json!({"result": [record()]}))]
    #[case(json!({"metrics": [record()]}))]
    #[case(json!({"page": {"data": {"items": [record()]}}}))]
    #[case(json!({"nextPageToken": "abc", "payload": [record()]}))]
    fn finds_records_in_known_envelopes(#[case] payload: Value) {
        let records = extract_records(&payload).expect("records should be found");
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].timestamp,
            Some(RawTimestamp::Integer(1_700_000_000))
        );
    }

    #[test]
    fn known_paths_win_over_scanning() {
        let payload = json!({
            "aaa": [{"timestamp": 1}],
            "results": [record(), record()]
        });
        assert_eq!(extract_records(&payload).unwrap().len(), 2);
    }

    #[test]
    fn result_object_without_results_is_scanned() {
        let payload = json!({"result": {"items": [record()]}});
        assert_eq!(extract_records(&payload).unwrap().len(), 1);
    }

    #[rstest]
    #[case(json!({"status": "ok"}))]
    #[case(json!({"a": {"b": {"c": {"d": {"e": [record()]}}}}}))]
    #[case(json!("results"))]
    #[case(json!(null))]
    fn reports_missing_records(#[case] payload: Value) {
        assert_eq!(extract_records(&payload), Err(EnvelopeError::NoRecords));
    }

    #[test]
    fn flatten_returns_plain_array() {
        let payload = json!({"results": [record(), 5]});
        assert_eq!(flatten(&payload).unwrap(), json!([record(), 5]));
    }

    #[test]
    fn extracts_chain_listing() {
        let payload = json!({
            "chains": [
                {"chainId": 43114, "chainName": "C-Chain", "createdAt": "23.09.2020", "isTestnet": false},
                {"chainId": "73772", "chainName": "Swimmer"}
            ],
            "nextPageToken": null
        });
        let chains = extract_chains(&payload).unwrap();
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].chain_id, "43114");
        assert_eq!(chains[0].created_at.as_deref(), Some("23.09.2020"));
        assert_eq!(chains[0].extra.get("isTestnet"), Some(&json!(false)));
        assert_eq!(chains[1].created_at, None);
    }

    #[test]
    fn rejects_malformed_chain_rows() {
        let payload = json!({"chains": [{"chainName": "no id"}]});
        assert!(matches!(
            extract_chains(&payload),
            Err(EnvelopeError::InvalidChain(_))
        ));
    }
}
