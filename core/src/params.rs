//! Request parameter map and query-string encoding.

use std::collections::BTreeMap;

use serde_json::Value;
use url::form_urlencoded;

/// Request parameters. Keys are unique; iteration order carries no meaning.
pub type Params = BTreeMap<String, Value>;

/// Build a `Params` map from string pairs.
pub fn params<K, V, I>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Flatten params into `(key, value)` string pairs.
///
/// Arrays repeat the key once per element. `null` becomes an empty value and
/// nested objects are written as compact JSON text.
pub fn to_pairs(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), scalar_to_string(item)));
                }
            }
            other => pairs.push((key.clone(), scalar_to_string(other))),
        }
    }
    pairs
}

/// Percent-encoded `key=value&...` form of `params`.
pub fn encode_query(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in to_pairs(params) {
        serializer.append_pair(&key, &value);
    }
    serializer.finish()
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encodes_scalars() {
        let p = params([("a", json!("1")), ("b", json!(2)), ("c", json!(true))]);
        assert_eq!(encode_query(&p), "a=1&b=2&c=true");
    }

    #[test]
    fn percent_encodes_reserved_characters() {
        let p = params([("to name", "A&B=C/ü")]);
        assert_eq!(encode_query(&p), "to+name=A%26B%3DC%2F%C3%BC");
    }

    #[test]
    fn arrays_repeat_the_key() {
        let p = params([("to", json!(["447700900000", "447700900001"]))]);
        assert_eq!(encode_query(&p), "to=447700900000&to=447700900001");
    }

    #[test]
    fn null_becomes_empty_value() {
        let p = params([("callback", Value::Null)]);
        assert_eq!(encode_query(&p), "callback=");
    }

    #[test]
    fn empty_params_encode_to_empty_string() {
        assert_eq!(encode_query(&Params::new()), "");
    }
}
