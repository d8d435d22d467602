use axum::async_trait;
use axum::body::{Bytes, HttpBody};
use axum::extract::multipart::Field;
use axum::extract::{Form, FromRequest, Multipart};
use axum::http::{header, Request};
use axum::BoxError;

use crate::error::ApiError;

const CONTENT_FIELD: &str = "c";
const TTL_FIELD: &str = "ttl";

/// The `c` field as it was submitted.
#[derive(Debug)]
pub enum Content {
    Text(String),
    File(Bytes),
}

impl Content {
    pub fn into_text(self) -> String {
        match self {
            Content::Text(text) => text,
            Content::File(data) => String::from_utf8_lossy(&data).into_owned(),
        }
    }
}

/// An upload request, read from either a multipart or a url-encoded form.
#[derive(Debug, Default)]
pub struct Submission {
    pub content: Option<Content>,
    pub ttl: Option<String>,
}

impl Submission {
    /// The first value of each known field wins.
    fn from_pairs(fields: Vec<(String, String)>) -> Self {
        let mut submission = Submission::default();
        for (name, value) in fields {
            match name.as_str() {
                CONTENT_FIELD if submission.content.is_none() => {
                    submission.content = Some(Content::Text(value));
                }
                TTL_FIELD if submission.ttl.is_none() => submission.ttl = Some(value),
                _ => {}
            }
        }
        submission
    }

    async fn from_multipart(mut multipart: Multipart) -> crate::ApiResult<Self> {
        let mut submission = Submission::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some(CONTENT_FIELD) if submission.content.is_none() => {
                    submission.content = Some(read_content(field).await?);
                }
                Some(TTL_FIELD) if submission.ttl.is_none() => {
                    submission.ttl = Some(field.text().await?);
                }
                _ => {}
            }
        }

        Ok(submission)
    }
}

async fn read_content(field: Field<'_>) -> crate::ApiResult<Content> {
    if field.file_name().is_some() {
        Ok(Content::File(field.bytes().await?))
    } else {
        Ok(Content::Text(field.text().await?))
    }
}

#[async_trait]
impl<S, B> FromRequest<S, B> for Submission
where
    B: HttpBody + Send + 'static,
    B::Data: Into<Bytes> + Send,
    B::Error: Into<BoxError>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await?;
            Submission::from_multipart(multipart).await
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state).await?;
            Ok(Submission::from_pairs(fields))
        } else {
            Err(ApiError::UnsupportedInput)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_fields_keep_the_first_value() {
        let submission = Submission::from_pairs(vec![
            ("ttl".into(), "120".into()),
            ("c".into(), "first".into()),
            ("other".into(), "ignored".into()),
            ("c".into(), "second".into()),
            ("ttl".into(), "30".into()),
        ]);
        assert!(matches!(submission.content, Some(Content::Text(ref text)) if text == "first"));
        assert_eq!(submission.ttl.as_deref(), Some("120"));
    }

    #[test]
    fn file_content_is_decoded_lossily() {
        let content = Content::File(Bytes::from_static(b"ok \xff"));
        assert_eq!(content.into_text(), "ok \u{fffd}");
    }
}
