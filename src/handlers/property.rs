use axum::extract::{Extension, Multipart, Path, Query, State};
use axum::response::Response;
use serde::Deserialize;
use uuid::Uuid;

use super::{data_response, form_response, raw_form_from_multipart};
use crate::actions::{self, AppContext};
use crate::error::ApiError;
use crate::identity::Session;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
    pub category: Option<String>,
}

/// GET /properties - public listing feed
pub async fn properties_get(
    State(ctx): State<AppContext>,
    Query(query): Query<ListQuery>,
) -> Response {
    data_response(
        actions::property::fetch_properties(&ctx, &query.search, query.category.as_deref()).await,
    )
}

/// POST /properties - host a new listing (fields + cover image)
pub async fn properties_post(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = raw_form_from_multipart(multipart).await?;
    Ok(form_response(
        actions::property::create_property(&ctx, &session, form).await,
    ))
}

/// GET /properties/:id - detail page data
pub async fn property_get(State(ctx): State<AppContext>, Path(id): Path<Uuid>) -> Response {
    data_response(actions::property::fetch_property_details(&ctx, id).await)
}

/// GET /properties/:id/rating - grouped review aggregate
pub async fn property_rating_get(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Response {
    data_response(actions::review::fetch_property_rating(&ctx, id).await)
}

/// GET /properties/:id/reviews
pub async fn property_reviews_get(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Response {
    data_response(actions::review::fetch_property_reviews(&ctx, id).await)
}

/// GET /properties/:id/review - the caller's own review of this property,
/// used to hide the review form once one exists
pub async fn property_own_review_get(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Response {
    data_response(actions::review::find_existing_review(&ctx, &session, id).await)
}
