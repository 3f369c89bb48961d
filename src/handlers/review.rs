use axum::extract::{Extension, Form, Path, State};
use axum::response::Response;
use std::collections::HashMap;
use uuid::Uuid;

use super::{data_response, form_response, raw_form_from_fields};
use crate::actions::{self, AppContext};
use crate::identity::Session;

/// POST /reviews - submit a review for a property
pub async fn reviews_post(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let form = raw_form_from_fields(fields);
    form_response(actions::review::create_review(&ctx, &session, form).await)
}

/// GET /reviews - the caller's own reviews
pub async fn reviews_get(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
) -> Response {
    data_response(actions::review::fetch_reviews_by_user(&ctx, &session).await)
}

/// DELETE /reviews/:id - owner-scoped delete
pub async fn review_delete(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Response {
    form_response(actions::review::delete_review(&ctx, &session, id).await)
}
