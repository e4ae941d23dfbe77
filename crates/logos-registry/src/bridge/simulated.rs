//! Canned responses used when no interpreter is available.
//!
//! Output depends only on the capability name and params, and every
//! response carries `"simulated": true`.

use serde_json::{Map, Value, json};

fn text_param<'a>(params: &'a Map<String, Value>, key: &str) -> &'a str {
    params.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Deterministic stand-in for a bridged capability.
#[must_use]
pub fn simulate(capability: &str, params: &Map<String, Value>) -> Value {
    match capability {
        "analyze" => json!({
            "simulated": true,
            "capability": "analyze",
            "analysis": {
                "summary": "Simulated analysis of the supplied data",
                "findings": [],
                "confidence": 0.0,
            },
            "input": Value::Object(params.clone()),
        }),
        "consult" => {
            let query = text_param(params, "query");
            json!({
                "simulated": true,
                "capability": "consult",
                "query": query,
                "response": format!("Simulated consultation response for: {query}"),
                "recommendations": [],
            })
        },
        "generate" => {
            let prompt = text_param(params, "prompt");
            json!({
                "simulated": true,
                "capability": "generate",
                "prompt": prompt,
                "content": format!("Simulated content generated for: {prompt}"),
            })
        },
        other => json!({
            "simulated": true,
            "capability": other,
            "message": format!("Simulated execution of '{other}'"),
            "params": Value::Object(params.clone()),
        }),
    }
}

/// Whether a result came from [`simulate`].
#[must_use]
pub fn is_simulated(result: &Value) -> bool {
    result.get("simulated").and_then(Value::as_bool) == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(v: &Value) -> Vec<String> {
        let mut k: Vec<String> = v.as_object().unwrap().keys().cloned().collect();
        k.sort();
        k
    }

    #[test]
    fn consult_is_stable() {
        let mut params = Map::new();
        params.insert("query".into(), json!("X"));
        let a = simulate("consult", &params);
        let b = simulate("consult", &params);
        assert!(is_simulated(&a) && is_simulated(&b));
        assert_eq!(keys(&a), keys(&b));
        assert_eq!(a["query"], "X");
    }

    #[test]
    fn unknown_capability_uses_generic_shape() {
        let out = simulate("forecast", &Map::new());
        assert!(is_simulated(&out));
        assert_eq!(out["capability"], "forecast");
        assert!(out["params"].is_object());
    }

    #[test]
    fn real_results_are_not_simulated() {
        assert!(!is_simulated(&json!({"answer": 1})));
        assert!(!is_simulated(&json!("text")));
    }
}
