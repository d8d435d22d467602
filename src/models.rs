use serde::{Deserialize, Serialize};

/// A paste as it is serialized into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paste {
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Seconds until the store drops the paste, if ever.
    pub ttl: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_shape_has_exactly_three_fields() {
        let paste = Paste {
            content: "hello".into(),
            created_at: 1_700_000_000_000,
            ttl: None,
        };
        let value = serde_json::to_value(&paste).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "content": "hello", "created_at": 1_700_000_000_000i64, "ttl": null })
        );
    }

    #[test]
    fn missing_ttl_reads_as_no_expiration() {
        let paste: Paste = serde_json::from_str(r#"{"content":"x","created_at":5}"#).unwrap();
        assert_eq!(paste.ttl, None);
    }
}
