use serde::Serialize;

const NEVER_EXPIRES: &str = "does not expire";

/// Returned after a successful upload. Never carries the content.
#[derive(Debug, Serialize)]
pub struct PasteReceipt {
    pub id: String,
    pub created_at: i64,
    pub ttl: Expiry,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Expiry {
    After(u64),
    Never(&'static str),
}

impl From<Option<u64>> for Expiry {
    fn from(ttl: Option<u64>) -> Self {
        match ttl {
            Some(secs) => Expiry::After(secs),
            None => Expiry::Never(NEVER_EXPIRES),
        }
    }
}

/// Structured rendering of a paste for `?json=true` reads.
#[derive(Debug, Serialize)]
pub struct PasteDocument {
    pub id: String,
    pub content: String,
    pub created_at: i64,
}
