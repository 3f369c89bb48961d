//! Thin HTTP layer over the action layer. Handlers extract the session and
//! the submission, call one action, and map its [`ActionResult`] onto a
//! response; no business rules live here.

pub mod favorite;
pub mod profile;
pub mod property;
pub mod review;

use axum::extract::{Multipart, Request};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

use crate::actions::ActionResult;
use crate::error::ApiError;
use crate::identity::Session;
use crate::validation::{RawForm, UploadedFile};

/// Lifts the optional bearer token into a [`Session`] extension. Anonymous
/// requests pass through; the identity gate decides per action.
pub async fn session_middleware(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    let token = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    request.extensions_mut().insert(Session { token });
    next.run(request).await
}

/// Form-action response: success and error both render as `{message}` for
/// the form's status line; redirects become 303s.
pub fn form_response(result: ActionResult<String>) -> Response {
    match result {
        ActionResult::Success(message) | ActionResult::Error { message } => {
            Json(json!({ "message": message })).into_response()
        }
        ActionResult::Redirect(route) => redirect_response(route),
    }
}

/// Data-fetch response in the `{success, data}` envelope.
pub fn data_response<T: Serialize>(result: ActionResult<T>) -> Response {
    match result {
        ActionResult::Success(data) => {
            Json(json!({ "success": true, "data": data })).into_response()
        }
        ActionResult::Error { message } => {
            Json(json!({ "success": false, "message": message })).into_response()
        }
        ActionResult::Redirect(route) => redirect_response(route),
    }
}

fn redirect_response(route: String) -> Response {
    (StatusCode::SEE_OTHER, [(header::LOCATION, route)]).into_response()
}

/// Flatten a urlencoded submission into a [`RawForm`].
pub fn raw_form_from_fields(fields: HashMap<String, String>) -> RawForm {
    let mut form = RawForm::new();
    for (key, value) in fields {
        form.set(key, value);
    }
    form
}

/// Flatten a multipart submission, file parts included, into a [`RawForm`].
pub async fn raw_form_from_multipart(mut multipart: Multipart) -> Result<RawForm, ApiError> {
    let mut form = RawForm::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        let key = field.name().unwrap_or_default().to_string();
        if let Some(file_name) = field.file_name().map(str::to_string) {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            form.set_file(
                key,
                UploadedFile {
                    name: file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                },
            );
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            form.set(key, text);
        }
    }

    Ok(form)
}
