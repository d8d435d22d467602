use tracing::info;

use crate::error::ApiError;
use crate::ids::allocate_id;
use crate::models::Paste;
use crate::storage::Store;
use crate::types::api::{PasteDocument, PasteReceipt};
use crate::types::form::{Content, Submission};
use crate::App;

/// Shortest accepted time-to-live, in seconds.
pub const MIN_TTL_SECS: i64 = 60;

/// Parse the optional `ttl` field. Absent or empty means no expiration.
///
/// The whole trimmed value must be a decimal integer. Trailing junk such as
/// `60s` or `1.5` is rejected as invalid rather than read up to the first
/// non-digit, unlike a `parseInt`-style reader.
pub fn parse_ttl(raw: Option<&str>) -> crate::ApiResult<Option<u64>> {
    let raw = match raw {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };

    let secs: i64 = raw.trim().parse().map_err(|_| ApiError::InvalidTtl)?;
    if secs < MIN_TTL_SECS {
        return Err(ApiError::TtlTooShort { min: MIN_TTL_SECS });
    }

    u64::try_from(secs)
        .map(Some)
        .map_err(|_| ApiError::InvalidTtl)
}

/// Validate a submission, allocate an id for it and persist it.
pub async fn create(app: &mut App, submission: Submission) -> crate::ApiResult<(String, Paste)> {
    let content = match submission.content {
        None => return Err(ApiError::InvalidInput),
        // only inline text is checked for blankness, files are taken as-is
        Some(Content::Text(text)) if text.trim().is_empty() => {
            return Err(ApiError::InvalidInput);
        }
        Some(content) => content,
    };
    let ttl = parse_ttl(submission.ttl.as_deref())?;
    let content = content.into_text();

    let id = allocate_id(&mut app.store, app.random.as_ref(), app.config.ids).await?;

    let paste = Paste {
        content,
        created_at: app.clock.now_millis(),
        ttl,
    };

    info!(
        "new paste: id='{id}', size={size}, ttl={ttl:?}",
        size = paste.content.len()
    );

    let value = serde_json::to_string(&paste)?;
    app.store.put(&id, value, ttl).await?;

    Ok((id, paste))
}

/// Look up a paste by id.
pub async fn fetch(app: &mut App, id: &str) -> crate::ApiResult<Paste> {
    let stored = app.store.get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(serde_json::from_str(&stored)?)
}

pub fn receipt(app: &App, id: String, paste: &Paste) -> PasteReceipt {
    let url = format!("{base_url}/{id}", base_url = app.config.base_url());
    PasteReceipt {
        id,
        created_at: paste.created_at,
        ttl: paste.ttl.into(),
        url,
    }
}

pub fn document(id: String, paste: Paste) -> PasteDocument {
    PasteDocument {
        id,
        content: paste.content,
        created_at: paste.created_at,
    }
}
