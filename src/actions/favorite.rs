//! Favorite actions. "Favorited" means exactly one row exists for the
//! (profile, property) pair.

use serde::Deserialize;
use uuid::Uuid;

use super::{require_user, ActionResult, AppContext};
use crate::identity::Session;
use crate::store::PropertySummary;

/// Client-observed state snapshot for the toggle: the currently known
/// favorite row id (if any) and the path to refresh afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleFavoriteInput {
    pub property_id: Uuid,
    pub favorite_id: Option<Uuid>,
    pub pathname: String,
}

/// Look up the caller's favorite row id for one property, for seeding the
/// toggle's snapshot.
pub async fn fetch_favorite_id(
    ctx: &AppContext,
    session: &Session,
    property_id: Uuid,
) -> ActionResult<Option<Uuid>> {
    let user = match require_user(ctx, session).await {
        Ok(user) => user,
        Err(gate) => return gate.resolve(),
    };

    match ctx.store.find_favorite_id(&user.id, property_id).await {
        Ok(id) => ActionResult::Success(id),
        Err(e) => ActionResult::error(e),
    }
}

/// Two-state toggle keyed by the caller-supplied snapshot: a known row id
/// deletes, no id creates. The action deliberately does not re-read the
/// pair before deciding, so a stale snapshot from another tab loses.
pub async fn toggle_favorite(
    ctx: &AppContext,
    session: &Session,
    input: ToggleFavoriteInput,
) -> ActionResult<String> {
    let user = match require_user(ctx, session).await {
        Ok(user) => user,
        Err(gate) => return gate.resolve(),
    };

    let message = match input.favorite_id {
        Some(favorite_id) => {
            if let Err(e) = ctx.store.delete_favorite(favorite_id).await {
                return ActionResult::error(e);
            }
            "Removed from Faves"
        }
        None => {
            if let Err(e) = ctx
                .store
                .create_favorite(&user.id, input.property_id)
                .await
            {
                return ActionResult::error(e);
            }
            "Added to Faves"
        }
    };

    ctx.cache.revalidate(&input.pathname).await;
    ActionResult::Success(message.to_string())
}

/// The caller's favorited properties, optionally narrowed by a substring
/// match on name or tagline applied after the fetch.
pub async fn fetch_favorites(
    ctx: &AppContext,
    session: &Session,
    search: &str,
) -> ActionResult<Vec<PropertySummary>> {
    let user = match require_user(ctx, session).await {
        Ok(user) => user,
        Err(gate) => return gate.resolve(),
    };

    let favorites = match ctx.store.list_favorites(&user.id).await {
        Ok(favorites) => favorites,
        Err(e) => return ActionResult::error(e),
    };

    if search.is_empty() {
        return ActionResult::Success(favorites);
    }
    ActionResult::Success(
        favorites
            .into_iter()
            .filter(|p| p.name.contains(search) || p.tagline.contains(search))
            .collect(),
    )
}
