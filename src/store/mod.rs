//! Typed query façade over the relational schema.
//!
//! The action layer only ever talks to the [`Store`] trait: create, read,
//! update and delete by key, plus the two aggregates (grouped
//! average-and-count, filtered substring search). Owner keys are always the
//! resolved identity's id, supplied by the actions, never by the client.

pub mod models;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use models::*;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[async_trait]
pub trait Store: Send + Sync {
    // Profiles
    async fn create_profile(&self, new: NewProfile) -> Result<Profile, StoreError>;
    async fn find_profile(&self, identity_id: &str) -> Result<Option<Profile>, StoreError>;
    async fn update_profile(
        &self,
        identity_id: &str,
        update: ProfileUpdate,
    ) -> Result<Profile, StoreError>;
    async fn update_profile_image(
        &self,
        identity_id: &str,
        image_url: &str,
    ) -> Result<(), StoreError>;

    // Properties
    async fn create_property(&self, new: NewProperty) -> Result<Property, StoreError>;
    async fn list_properties(
        &self,
        search: &str,
        category: Option<&str>,
    ) -> Result<Vec<PropertySummary>, StoreError>;
    async fn property_details(&self, id: Uuid) -> Result<Option<PropertyDetails>, StoreError>;

    // Favorites
    async fn find_favorite_id(
        &self,
        profile_id: &str,
        property_id: Uuid,
    ) -> Result<Option<Uuid>, StoreError>;
    async fn create_favorite(
        &self,
        profile_id: &str,
        property_id: Uuid,
    ) -> Result<Favorite, StoreError>;
    async fn delete_favorite(&self, favorite_id: Uuid) -> Result<(), StoreError>;
    async fn list_favorites(&self, profile_id: &str) -> Result<Vec<PropertySummary>, StoreError>;

    // Reviews
    async fn create_review(&self, new: NewReview) -> Result<Review, StoreError>;
    async fn delete_review(&self, review_id: Uuid, profile_id: &str) -> Result<(), StoreError>;
    async fn property_reviews(&self, property_id: Uuid)
        -> Result<Vec<PropertyReview>, StoreError>;
    async fn reviews_by_profile(
        &self,
        profile_id: &str,
    ) -> Result<Vec<ReviewWithProperty>, StoreError>;
    async fn find_review(
        &self,
        profile_id: &str,
        property_id: Uuid,
    ) -> Result<Option<Review>, StoreError>;
    async fn property_rating(&self, property_id: Uuid) -> Result<PropertyRating, StoreError>;
}
