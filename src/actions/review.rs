//! Review actions: one review per caller per property, deletable only by
//! its owner, plus the grouped rating aggregate.

use uuid::Uuid;

use super::{require_user, ActionResult, AppContext, REVIEWS_ROUTE};
use crate::identity::Session;
use crate::store::{NewReview, PropertyRating, PropertyReview, Review, ReviewWithProperty};
use crate::validation::{validate_review, RawForm};

pub async fn create_review(
    ctx: &AppContext,
    session: &Session,
    form: RawForm,
) -> ActionResult<String> {
    let user = match require_user(ctx, session).await {
        Ok(user) => user,
        Err(gate) => return gate.resolve(),
    };

    let fields = match validate_review(&form) {
        Ok(fields) => fields,
        Err(e) => return ActionResult::error(e),
    };

    let new = NewReview {
        profile_id: user.id,
        property_id: fields.property_id,
        rating: fields.rating,
        comment: fields.comment,
    };
    if let Err(e) = ctx.store.create_review(new).await {
        return ActionResult::error(e);
    }

    ctx.cache
        .revalidate(&format!("/properties/{}", fields.property_id))
        .await;
    ActionResult::Success("Review submitted successfully".to_string())
}

pub async fn delete_review(
    ctx: &AppContext,
    session: &Session,
    review_id: Uuid,
) -> ActionResult<String> {
    let user = match require_user(ctx, session).await {
        Ok(user) => user,
        Err(gate) => return gate.resolve(),
    };

    if let Err(e) = ctx.store.delete_review(review_id, &user.id).await {
        return ActionResult::error(e);
    }

    ctx.cache.revalidate(REVIEWS_ROUTE).await;
    ActionResult::Success("Review deleted successfully".to_string())
}

/// Reviews shown on a property page, newest first.
pub async fn fetch_property_reviews(
    ctx: &AppContext,
    property_id: Uuid,
) -> ActionResult<Vec<PropertyReview>> {
    match ctx.store.property_reviews(property_id).await {
        Ok(reviews) => ActionResult::Success(reviews),
        Err(e) => ActionResult::error(e),
    }
}

/// The caller's own reviews with the property each one belongs to.
pub async fn fetch_reviews_by_user(
    ctx: &AppContext,
    session: &Session,
) -> ActionResult<Vec<ReviewWithProperty>> {
    let user = match require_user(ctx, session).await {
        Ok(user) => user,
        Err(gate) => return gate.resolve(),
    };

    match ctx.store.reviews_by_profile(&user.id).await {
        Ok(reviews) => ActionResult::Success(reviews),
        Err(e) => ActionResult::error(e),
    }
}

/// Advisory pre-check used by the property page to hide the review form
/// when the caller already reviewed; the store constraint is what actually
/// enforces uniqueness.
pub async fn find_existing_review(
    ctx: &AppContext,
    session: &Session,
    property_id: Uuid,
) -> ActionResult<Option<Review>> {
    let user = match require_user(ctx, session).await {
        Ok(user) => user,
        Err(gate) => return gate.resolve(),
    };

    match ctx.store.find_review(&user.id, property_id).await {
        Ok(review) => ActionResult::Success(review),
        Err(e) => ActionResult::error(e),
    }
}

/// Average-and-count aggregate; the empty case is zero on both fields.
pub async fn fetch_property_rating(
    ctx: &AppContext,
    property_id: Uuid,
) -> ActionResult<PropertyRating> {
    match ctx.store.property_rating(property_id).await {
        Ok(rating) => ActionResult::Success(rating),
        Err(e) => ActionResult::error(e),
    }
}
