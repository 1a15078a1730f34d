//! Content hashing for run IDs.

use sha2::{Digest, Sha256};

/// Hex SHA-256 of the compact JSON form of `params`.
///
/// `serde_json::Value` objects keep their keys sorted, so equal parameter sets
/// hash equally regardless of insertion order.
pub fn params_hash(params: &serde_json::Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(params.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// First 8 hex characters of [`params_hash`].
pub fn short_hash(params: &serde_json::Value) -> String {
    let mut hash = params_hash(params);
    hash.truncate(8);
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_stability() {
        let params = json!({ "kp": 0.02, "ki": 0.05, "dt": 0.001 });
        assert_eq!(params_hash(&params), params_hash(&params.clone()));
        assert_eq!(params_hash(&params).len(), 64);
    }

    #[test]
    fn key_order_does_not_matter() {
        let a: serde_json::Value = serde_json::from_str(r#"{"kp":1.0,"ki":2.0}"#).unwrap();
        let b: serde_json::Value = serde_json::from_str(r#"{"ki":2.0,"kp":1.0}"#).unwrap();
        assert_eq!(params_hash(&a), params_hash(&b));
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let a = json!({ "kp": 0.02 });
        let b = json!({ "kp": 0.03 });
        assert_ne!(short_hash(&a), short_hash(&b));
        assert_eq!(short_hash(&a).len(), 8);
    }
}
