//! Health probes against the SF open-data API.

use {
    crate::config::SERVER,
    serde_json::Value,
    std::{error::Error, iter},
};

#[derive(Debug, Clone)]
pub struct ProbeTargets {
    pub cases_url: String,
    pub cases_limit: u32,
    pub regulations_url: String,
    pub regulations_limit: u32,
}

impl Default for ProbeTargets {
    fn default() -> Self {
        let p = &SERVER.probe;
        Self {
            cases_url: p.cases_url.to_string(),
            cases_limit: p.cases_limit,
            regulations_url: p.regulations_url.to_string(),
            regulations_limit: p.regulations_limit,
        }
    }
}

/// GET `url?$limit=limit`, fail on non-2xx, decode JSON.
pub(crate) async fn fetch_json(
    client: &reqwest::Client,
    url: &str,
    limit: u32,
) -> Result<Value, reqwest::Error> {
    log::info!("Probing open-data API: {}", url);
    client
        .get(url)
        .query(&[("$limit", limit)])
        .send()
        .await?
        .error_for_status()?
        .json::<Value>()
        .await
}

/// Number of records in a response: array elements or object entries.
pub(crate) fn record_count(data: &Value) -> usize {
    match data {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::Null => 0,
        _ => 1,
    }
}

/// True when every record is an empty value (vacuously true for no records).
pub(crate) fn all_records_empty(data: &Value) -> bool {
    let is_empty = |v: &Value| match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    };

    match data {
        Value::Array(items) => items.iter().all(is_empty),
        Value::Object(map) => map.values().all(is_empty),
        other => is_empty(other),
    }
}

/// The error and every `source()` below it, outermost first, one per line.
pub(crate) fn error_chain(err: &(dyn Error + 'static)) -> String {
    iter::successors(Some(err), |&e| e.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, thiserror::Error)]
    #[error("request failed")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn counts_and_emptiness() {
        assert_eq!(record_count(&json!([{}, {}])), 2);
        assert!(all_records_empty(&json!([{}, {}])));
        assert!(!all_records_empty(&json!([{}, {"a": 1}])));
        assert!(all_records_empty(&json!([])));
        assert_eq!(record_count(&json!({"type": "FeatureCollection", "features": []})), 2);
        assert!(!all_records_empty(&json!({"type": "FeatureCollection", "features": []})));
    }

    #[test]
    fn error_chain_walks_sources() {
        let err = Outer(std::io::Error::other("connection refused"));
        assert_eq!(error_chain(&err), "request failed\nconnection refused");
    }
}
