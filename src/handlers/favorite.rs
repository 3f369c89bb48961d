use axum::extract::{Extension, Json, Path, Query, State};
use axum::response::Response;
use serde::Deserialize;
use uuid::Uuid;

use super::{data_response, form_response};
use crate::actions::favorite::ToggleFavoriteInput;
use crate::actions::{self, AppContext};
use crate::identity::Session;

#[derive(Debug, Deserialize)]
pub struct FavoritesQuery {
    #[serde(default)]
    pub search: String,
}

/// GET /favorites - the caller's favorited properties
pub async fn favorites_get(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
    Query(query): Query<FavoritesQuery>,
) -> Response {
    data_response(actions::favorite::fetch_favorites(&ctx, &session, &query.search).await)
}

/// POST /favorites/toggle - add or remove based on the client's snapshot
pub async fn favorite_toggle_post(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
    Json(input): Json<ToggleFavoriteInput>,
) -> Response {
    form_response(actions::favorite::toggle_favorite(&ctx, &session, input).await)
}

/// GET /properties/:id/favorite - the caller's favorite row id, if any
pub async fn favorite_id_get(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
    Path(property_id): Path<Uuid>,
) -> Response {
    data_response(actions::favorite::fetch_favorite_id(&ctx, &session, property_id).await)
}
