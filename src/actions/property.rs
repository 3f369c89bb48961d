//! Property actions: host listing creation and the public read projections.

use uuid::Uuid;

use super::{require_user, ActionResult, AppContext, HOME_ROUTE};
use crate::identity::Session;
use crate::store::{NewProperty, PropertyDetails, PropertySummary};
use crate::validation::{validate_image, validate_property, RawForm};

/// Host a new listing. Property fields and the cover image are validated
/// together before the upload; the database write only runs once the image
/// has a public URL.
pub async fn create_property(
    ctx: &AppContext,
    session: &Session,
    form: RawForm,
) -> ActionResult<String> {
    let user = match require_user(ctx, session).await {
        Ok(user) => user,
        Err(gate) => return gate.resolve(),
    };

    let fields = match validate_property(&form) {
        Ok(fields) => fields,
        Err(e) => return ActionResult::error(e),
    };
    let image = match validate_image(&form) {
        Ok(payload) => payload,
        Err(e) => return ActionResult::error(e),
    };

    let full_path = match ctx.blobs.upload(&image.image).await {
        Ok(url) => url,
        Err(e) => return ActionResult::error(e),
    };

    let new = NewProperty {
        profile_id: user.id,
        name: fields.name,
        tagline: fields.tagline,
        description: fields.description,
        country: fields.country,
        category: fields.category,
        price: fields.price,
        guests: fields.guests,
        bedrooms: fields.bedrooms,
        beds: fields.beds,
        baths: fields.baths,
        amenities: fields.amenities,
        image: full_path,
    };
    if let Err(e) = ctx.store.create_property(new).await {
        return ActionResult::error(e);
    }

    ActionResult::Redirect(HOME_ROUTE.to_string())
}

/// Public listing feed: case-insensitive substring match on name/tagline,
/// optional exact category, newest first.
pub async fn fetch_properties(
    ctx: &AppContext,
    search: &str,
    category: Option<&str>,
) -> ActionResult<Vec<PropertySummary>> {
    match ctx.store.list_properties(search, category).await {
        Ok(properties) => ActionResult::Success(properties),
        Err(e) => ActionResult::error(e),
    }
}

/// Detail page data. An unknown id sends the caller home rather than
/// surfacing a not-found error.
pub async fn fetch_property_details(ctx: &AppContext, id: Uuid) -> ActionResult<PropertyDetails> {
    match ctx.store.property_details(id).await {
        Ok(Some(details)) => ActionResult::Success(details),
        Ok(None) => ActionResult::Redirect(HOME_ROUTE.to_string()),
        Err(e) => ActionResult::error(e),
    }
}
