//! Profile actions: onboarding, reads, and the two update paths.

use super::{require_user, ActionResult, AppContext, HOME_ROUTE, PROFILE_CREATE_ROUTE,
    PROFILE_ROUTE};
use crate::identity::Session;
use crate::store::{NewProfile, Profile, ProfileUpdate};
use crate::validation::{validate_image, validate_profile, RawForm};

/// Create the caller's profile and flip the provider-side onboarding flag.
///
/// This is the one mutating action that must not run through the gate: the
/// caller by definition has no profile yet.
pub async fn create_profile(
    ctx: &AppContext,
    session: &Session,
    form: RawForm,
) -> ActionResult<String> {
    let user = match ctx.identity.current_user(session).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return ActionResult::Error {
                message: "Please login to create a profile".to_string(),
            }
        }
        Err(e) => return ActionResult::error(e),
    };

    let fields = match validate_profile(&form) {
        Ok(fields) => fields,
        Err(e) => return ActionResult::error(e),
    };

    let new = NewProfile {
        identity_id: user.id.clone(),
        email: user.email.clone(),
        profile_image: user.image_url.clone(),
        first_name: fields.first_name,
        last_name: fields.last_name,
        username: fields.username,
    };
    if let Err(e) = ctx.store.create_profile(new).await {
        return ActionResult::error(e);
    }

    // The profile row is the source of truth; a failed metadata write only
    // delays the provider-side flag, so it does not fail the action.
    if let Err(e) = ctx.identity.mark_profile_complete(&user.id).await {
        tracing::warn!("failed to mark profile complete for {}: {}", user.id, e);
    }

    ActionResult::Redirect(HOME_ROUTE.to_string())
}

/// The caller's own profile; a missing row sends them back to onboarding.
pub async fn fetch_profile(ctx: &AppContext, session: &Session) -> ActionResult<Profile> {
    let user = match require_user(ctx, session).await {
        Ok(user) => user,
        Err(gate) => return gate.resolve(),
    };

    match ctx.store.find_profile(&user.id).await {
        Ok(Some(profile)) => ActionResult::Success(profile),
        Ok(None) => ActionResult::Redirect(PROFILE_CREATE_ROUTE.to_string()),
        Err(e) => ActionResult::error(e),
    }
}

/// Image shown in the navbar. Falls back to the provider's image before a
/// profile exists; anonymous callers get nothing.
pub async fn fetch_profile_image(
    ctx: &AppContext,
    session: &Session,
) -> ActionResult<Option<String>> {
    let user = match ctx.identity.current_user(session).await {
        Ok(Some(user)) => user,
        Ok(None) => return ActionResult::Success(None),
        Err(e) => return ActionResult::error(e),
    };

    match ctx.store.find_profile(&user.id).await {
        Ok(Some(profile)) => ActionResult::Success(Some(profile.profile_image)),
        Ok(None) => ActionResult::Success(Some(user.image_url)),
        Err(e) => ActionResult::error(e),
    }
}

pub async fn update_profile(
    ctx: &AppContext,
    session: &Session,
    form: RawForm,
) -> ActionResult<String> {
    let user = match require_user(ctx, session).await {
        Ok(user) => user,
        Err(gate) => return gate.resolve(),
    };

    let fields = match validate_profile(&form) {
        Ok(fields) => fields,
        Err(e) => return ActionResult::error(e),
    };

    let update = ProfileUpdate {
        first_name: fields.first_name,
        last_name: fields.last_name,
        username: fields.username,
    };
    if let Err(e) = ctx.store.update_profile(&user.id, update).await {
        return ActionResult::error(e);
    }

    ctx.cache.revalidate(PROFILE_ROUTE).await;
    ActionResult::Success("Profile updated successfully".to_string())
}

/// Upload first, then write the URL. A database failure after the upload
/// leaves the blob orphaned; nothing compensates.
pub async fn update_profile_image(
    ctx: &AppContext,
    session: &Session,
    form: RawForm,
) -> ActionResult<String> {
    let user = match require_user(ctx, session).await {
        Ok(user) => user,
        Err(gate) => return gate.resolve(),
    };

    let image = match validate_image(&form) {
        Ok(payload) => payload,
        Err(e) => return ActionResult::error(e),
    };

    let full_path = match ctx.blobs.upload(&image.image).await {
        Ok(url) => url,
        Err(e) => return ActionResult::error(e),
    };

    if let Err(e) = ctx.store.update_profile_image(&user.id, &full_path).await {
        return ActionResult::error(e);
    }

    ctx.cache.revalidate(PROFILE_ROUTE).await;
    ActionResult::Success("Profile image updated successfully".to_string())
}
