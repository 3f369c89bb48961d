use axum::extract::{Extension, Form, Multipart, State};
use axum::response::Response;
use std::collections::HashMap;

use super::{data_response, form_response, raw_form_from_fields, raw_form_from_multipart};
use crate::actions::{self, AppContext};
use crate::error::ApiError;
use crate::identity::Session;

/// POST /profile - onboarding form
pub async fn profile_post(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let form = raw_form_from_fields(fields);
    form_response(actions::profile::create_profile(&ctx, &session, form).await)
}

/// GET /profile - the caller's own profile
pub async fn profile_get(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
) -> Response {
    data_response(actions::profile::fetch_profile(&ctx, &session).await)
}

/// PUT /profile - name/username update
pub async fn profile_put(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let form = raw_form_from_fields(fields);
    form_response(actions::profile::update_profile(&ctx, &session, form).await)
}

/// GET /profile/image - navbar avatar URL
pub async fn profile_image_get(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
) -> Response {
    data_response(actions::profile::fetch_profile_image(&ctx, &session).await)
}

/// POST /profile/image - avatar upload
pub async fn profile_image_post(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = raw_form_from_multipart(multipart).await?;
    Ok(form_response(
        actions::profile::update_profile_image(&ctx, &session, form).await,
    ))
}
