//! Request body extraction for item payloads.

use axum::{
    body::Bytes,
    extract::{FromRef, FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

use crate::error::ApiError;
use crate::state::AppState;

/// Item fields from a JSON or urlencoded body.
///
/// Bodies without a recognised content type, empty JSON bodies and JSON
/// arrays all yield an empty field set, leaving the schema to report what is
/// missing. A JSON body that does not parse, or whose top-level value is not
/// an object or array, is an unhandled error (500).
#[derive(Debug, Default)]
pub struct ItemPayload(pub Map<String, JsonValue>);

enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(req: &Request) -> BodyKind {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let essence = content_type.split(';').next().unwrap_or_default().trim();

    if essence == "application/json" || essence.ends_with("+json") {
        BodyKind::Json
    } else if essence == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

impl<S> FromRequest<S> for ItemPayload
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let expose = AppState::from_ref(state).development;

        match body_kind(&req) {
            BodyKind::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|rejection| ApiError::unhandled(rejection.body_text(), expose))?;
                if bytes.is_empty() {
                    return Ok(Self::default());
                }
                let value: JsonValue = serde_json::from_slice(&bytes)
                    .map_err(|err| ApiError::unhandled(err.to_string(), expose))?;
                match value {
                    JsonValue::Object(fields) => Ok(Self(fields)),
                    JsonValue::Array(_) => Ok(Self::default()),
                    other => Err(ApiError::unhandled(
                        format!("JSON body must be an object or array, got {}", other),
                        expose,
                    )),
                }
            }
            BodyKind::Form => {
                let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                    .await
                    .map_err(|rejection| ApiError::unhandled(rejection.body_text(), expose))?;
                Ok(Self(
                    fields
                        .into_iter()
                        .map(|(key, value)| (key, JsonValue::String(value)))
                        .collect(),
                ))
            }
            BodyKind::Other => Ok(Self::default()),
        }
    }
}
