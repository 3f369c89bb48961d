//! In-memory fakes for exercising the action layer without a database,
//! identity provider, or bucket.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::actions::{ActionResult, AppContext};
use crate::blob::{BlobError, ObjectStore};
use crate::identity::{Identity, IdentityError, IdentityProvider, Session};
use crate::store::{
    BookingWindow, Favorite, NewProfile, NewProperty, NewReview, Profile, ProfileUpdate, Property,
    PropertyDetails, PropertyRating, PropertyReview, PropertySummary, Review, ReviewWithProperty,
    Store, StoreError,
};
use crate::validation::{RawForm, UploadedFile};

/// Assembled action context around the in-memory fakes, with handles kept
/// for assertions.
pub struct TestContext {
    pub ctx: AppContext,
    pub store: Arc<MemStore>,
    pub identity: Arc<FakeIdentityProvider>,
    pub blobs: Arc<MemObjectStore>,
    pub cache: Arc<RecordingRevalidator>,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemStore::new());
        let identity = Arc::new(FakeIdentityProvider::new());
        let blobs = Arc::new(MemObjectStore::new());
        let cache = Arc::new(RecordingRevalidator::new());

        let ctx = AppContext {
            store: store.clone(),
            identity: identity.clone(),
            blobs: blobs.clone(),
            cache: cache.clone(),
        };

        Self {
            ctx,
            store,
            identity,
            blobs,
            cache,
        }
    }

    /// Register an identity with the fake provider and return its session.
    pub fn login(&self, id: &str, has_profile: bool) -> Session {
        let token = format!("tok-{id}");
        self.identity.register(
            &token,
            Identity {
                id: id.to_string(),
                email: format!("{id}@example.com"),
                image_url: format!("https://img.example/{id}.png"),
                has_profile,
            },
        );
        Session::bearer(token)
    }

    /// Fully onboarded caller: provider flag set and profile row present.
    pub fn login_with_profile(&self, id: &str) -> Session {
        let session = self.login(id, true);
        self.store.seed_profile(id);
        session
    }

    /// Create a listing through the real action and return its id.
    pub async fn seed_property(
        &self,
        session: &Session,
        name: &str,
        tagline: &str,
        category: &str,
    ) -> Uuid {
        let mut form = property_form();
        form.set("name", name);
        form.set("tagline", tagline);
        form.set("category", category);
        form.set_file("image", png_file(128));

        let result = crate::actions::property::create_property(&self.ctx, session, form).await;
        assert!(
            matches!(result, ActionResult::Redirect(_)),
            "seeding property failed: {result:?}"
        );

        self.store
            .properties()
            .into_iter()
            .find(|p| p.name == name)
            .expect("seeded property missing")
            .id
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn profile_form() -> RawForm {
    let mut form = RawForm::new();
    form.set("firstName", "Ada");
    form.set("lastName", "Lovelace");
    form.set("username", "ada");
    form
}

pub fn property_form() -> RawForm {
    let mut form = RawForm::new();
    form.set("name", "Cabin by the lake");
    form.set("tagline", "Quiet and green");
    form.set(
        "description",
        "A calm cabin with room for the whole family and a sauna by the water",
    );
    form.set("country", "NO");
    form.set("category", "cabin");
    form.set("price", "120");
    form.set("guests", "4");
    form.set("bedrooms", "2");
    form.set("beds", "3");
    form.set("baths", "1");
    form.set("amenities", "wifi,sauna");
    form
}

pub fn review_form(property_id: Uuid, rating: i32) -> RawForm {
    let mut form = RawForm::new();
    form.set("propertyId", property_id.to_string());
    form.set("rating", rating.to_string());
    form.set("comment", "A perfectly lovely stay, would book again.");
    form
}

pub fn png_file(len: usize) -> UploadedFile {
    UploadedFile {
        name: "photo.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0u8; len],
    }
}

#[derive(Default)]
struct MemState {
    profiles: Vec<Profile>,
    properties: Vec<Property>,
    favorites: Vec<Favorite>,
    reviews: Vec<Review>,
    bookings: Vec<(Uuid, BookingWindow)>,
    writes: usize,
}

/// Call-counting in-memory [`Store`] with the same uniqueness rules as the
/// real schema.
pub struct MemStore {
    state: Mutex<MemState>,
    fail_next_write: AtomicBool,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemState::default()),
            fail_next_write: AtomicBool::new(false),
        }
    }

    /// Make the next write attempt fail with an injected query error.
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// Number of store mutations performed or attempted.
    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    pub fn favorite_count(&self) -> usize {
        self.state.lock().unwrap().favorites.len()
    }

    pub fn profile(&self, identity_id: &str) -> Option<Profile> {
        self.state
            .lock()
            .unwrap()
            .profiles
            .iter()
            .find(|p| p.identity_id == identity_id)
            .cloned()
    }

    pub fn properties(&self) -> Vec<Property> {
        self.state.lock().unwrap().properties.clone()
    }

    pub fn reviews(&self) -> Vec<Review> {
        self.state.lock().unwrap().reviews.clone()
    }

    pub fn seed_profile(&self, identity_id: &str) {
        let mut state = self.state.lock().unwrap();
        if state.profiles.iter().any(|p| p.identity_id == identity_id) {
            return;
        }
        let now = Utc::now();
        state.profiles.push(Profile {
            id: Uuid::new_v4(),
            identity_id: identity_id.to_string(),
            email: format!("{identity_id}@example.com"),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: identity_id.to_string(),
            profile_image: format!("https://img.example/{identity_id}.png"),
            created_at: now,
            updated_at: now,
        });
    }

    pub fn seed_booking(&self, property_id: Uuid, nights: i64) {
        let check_in = Utc::now();
        self.state.lock().unwrap().bookings.push((
            property_id,
            BookingWindow {
                check_in,
                check_out: check_in + Duration::days(nights),
            },
        ));
    }

    fn begin_write(&self, state: &mut MemState) -> Result<(), StoreError> {
        state.writes += 1;
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(StoreError::QueryError("injected write failure".to_string()));
        }
        Ok(())
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

fn summary_of(property: &Property) -> PropertySummary {
    PropertySummary {
        id: property.id,
        name: property.name.clone(),
        tagline: property.tagline.clone(),
        country: property.country.clone(),
        image: property.image.clone(),
        price: property.price,
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_profile(&self, new: NewProfile) -> Result<Profile, StoreError> {
        let mut state = self.state.lock().unwrap();
        self.begin_write(&mut state)?;
        if state
            .profiles
            .iter()
            .any(|p| p.identity_id == new.identity_id)
        {
            return Err(StoreError::Conflict(
                "A profile already exists for this account".to_string(),
            ));
        }
        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            identity_id: new.identity_id,
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            username: new.username,
            profile_image: new.profile_image,
            created_at: now,
            updated_at: now,
        };
        state.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn find_profile(&self, identity_id: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self.profile(identity_id))
    }

    async fn update_profile(
        &self,
        identity_id: &str,
        update: ProfileUpdate,
    ) -> Result<Profile, StoreError> {
        let mut state = self.state.lock().unwrap();
        self.begin_write(&mut state)?;
        let profile = state
            .profiles
            .iter_mut()
            .find(|p| p.identity_id == identity_id)
            .ok_or_else(|| StoreError::NotFound("Profile not found".to_string()))?;
        profile.first_name = update.first_name;
        profile.last_name = update.last_name;
        profile.username = update.username;
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn update_profile_image(
        &self,
        identity_id: &str,
        image_url: &str,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        self.begin_write(&mut state)?;
        let profile = state
            .profiles
            .iter_mut()
            .find(|p| p.identity_id == identity_id)
            .ok_or_else(|| StoreError::NotFound("Profile not found".to_string()))?;
        profile.profile_image = image_url.to_string();
        profile.updated_at = Utc::now();
        Ok(())
    }

    async fn create_property(&self, new: NewProperty) -> Result<Property, StoreError> {
        let mut state = self.state.lock().unwrap();
        self.begin_write(&mut state)?;
        let property = Property {
            id: Uuid::new_v4(),
            profile_id: new.profile_id,
            name: new.name,
            tagline: new.tagline,
            description: new.description,
            country: new.country,
            category: new.category,
            price: new.price,
            guests: new.guests,
            bedrooms: new.bedrooms,
            beds: new.beds,
            baths: new.baths,
            amenities: new.amenities,
            image: new.image,
            created_at: Utc::now(),
        };
        state.properties.push(property.clone());
        Ok(property)
    }

    async fn list_properties(
        &self,
        search: &str,
        category: Option<&str>,
    ) -> Result<Vec<PropertySummary>, StoreError> {
        let state = self.state.lock().unwrap();
        let needle = search.to_lowercase();
        Ok(state
            .properties
            .iter()
            .rev() // newest first
            .filter(|p| category.map_or(true, |c| p.category == c))
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.tagline.to_lowercase().contains(&needle)
            })
            .map(summary_of)
            .collect())
    }

    async fn property_details(&self, id: Uuid) -> Result<Option<PropertyDetails>, StoreError> {
        let state = self.state.lock().unwrap();
        let property = match state.properties.iter().find(|p| p.id == id) {
            Some(p) => p.clone(),
            None => return Ok(None),
        };
        let host = state
            .profiles
            .iter()
            .find(|p| p.identity_id == property.profile_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("Host profile not found".to_string()))?;
        let bookings = state
            .bookings
            .iter()
            .filter(|(pid, _)| *pid == id)
            .map(|(_, window)| window.clone())
            .collect();
        Ok(Some(PropertyDetails {
            property,
            host,
            bookings,
        }))
    }

    async fn find_favorite_id(
        &self,
        profile_id: &str,
        property_id: Uuid,
    ) -> Result<Option<Uuid>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .favorites
            .iter()
            .find(|f| f.profile_id == profile_id && f.property_id == property_id)
            .map(|f| f.id))
    }

    async fn create_favorite(
        &self,
        profile_id: &str,
        property_id: Uuid,
    ) -> Result<Favorite, StoreError> {
        let mut state = self.state.lock().unwrap();
        self.begin_write(&mut state)?;
        if state
            .favorites
            .iter()
            .any(|f| f.profile_id == profile_id && f.property_id == property_id)
        {
            return Err(StoreError::Conflict(
                "Property is already in your favorites".to_string(),
            ));
        }
        let favorite = Favorite {
            id: Uuid::new_v4(),
            profile_id: profile_id.to_string(),
            property_id,
            created_at: Utc::now(),
        };
        state.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn delete_favorite(&self, favorite_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        self.begin_write(&mut state)?;
        let before = state.favorites.len();
        state.favorites.retain(|f| f.id != favorite_id);
        if state.favorites.len() == before {
            return Err(StoreError::NotFound("Favorite not found".to_string()));
        }
        Ok(())
    }

    async fn list_favorites(&self, profile_id: &str) -> Result<Vec<PropertySummary>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .favorites
            .iter()
            .rev()
            .filter(|f| f.profile_id == profile_id)
            .filter_map(|f| {
                state
                    .properties
                    .iter()
                    .find(|p| p.id == f.property_id)
                    .map(summary_of)
            })
            .collect())
    }

    async fn create_review(&self, new: NewReview) -> Result<Review, StoreError> {
        let mut state = self.state.lock().unwrap();
        self.begin_write(&mut state)?;
        if state
            .reviews
            .iter()
            .any(|r| r.profile_id == new.profile_id && r.property_id == new.property_id)
        {
            return Err(StoreError::Conflict(
                "You have already reviewed this property".to_string(),
            ));
        }
        let review = Review {
            id: Uuid::new_v4(),
            profile_id: new.profile_id,
            property_id: new.property_id,
            rating: new.rating,
            comment: new.comment,
            created_at: Utc::now(),
        };
        state.reviews.push(review.clone());
        Ok(review)
    }

    async fn delete_review(&self, review_id: Uuid, profile_id: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        self.begin_write(&mut state)?;
        let before = state.reviews.len();
        state
            .reviews
            .retain(|r| !(r.id == review_id && r.profile_id == profile_id));
        if state.reviews.len() == before {
            return Err(StoreError::NotFound("Review not found".to_string()));
        }
        Ok(())
    }

    async fn property_reviews(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<PropertyReview>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reviews
            .iter()
            .rev()
            .filter(|r| r.property_id == property_id)
            .map(|r| {
                let reviewer = state
                    .profiles
                    .iter()
                    .find(|p| p.identity_id == r.profile_id);
                PropertyReview {
                    id: r.id,
                    rating: r.rating,
                    comment: r.comment.clone(),
                    reviewer_first_name: reviewer
                        .map(|p| p.first_name.clone())
                        .unwrap_or_default(),
                    reviewer_image: reviewer
                        .map(|p| p.profile_image.clone())
                        .unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn reviews_by_profile(
        &self,
        profile_id: &str,
    ) -> Result<Vec<ReviewWithProperty>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reviews
            .iter()
            .rev()
            .filter(|r| r.profile_id == profile_id)
            .filter_map(|r| {
                state
                    .properties
                    .iter()
                    .find(|p| p.id == r.property_id)
                    .map(|p| ReviewWithProperty {
                        id: r.id,
                        rating: r.rating,
                        comment: r.comment.clone(),
                        property_id: p.id,
                        property_name: p.name.clone(),
                        property_image: p.image.clone(),
                    })
            })
            .collect())
    }

    async fn find_review(
        &self,
        profile_id: &str,
        property_id: Uuid,
    ) -> Result<Option<Review>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reviews
            .iter()
            .find(|r| r.profile_id == profile_id && r.property_id == property_id)
            .cloned())
    }

    async fn property_rating(&self, property_id: Uuid) -> Result<PropertyRating, StoreError> {
        let state = self.state.lock().unwrap();
        let ratings: Vec<i32> = state
            .reviews
            .iter()
            .filter(|r| r.property_id == property_id)
            .map(|r| r.rating)
            .collect();
        Ok(PropertyRating::from_ratings(&ratings))
    }
}

/// Token-keyed identity provider fake.
pub struct FakeIdentityProvider {
    users: Mutex<HashMap<String, Identity>>,
    completed: Mutex<Vec<String>>,
}

impl FakeIdentityProvider {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            completed: Mutex::new(Vec::new()),
        }
    }

    pub fn register(&self, token: &str, identity: Identity) {
        self.users.lock().unwrap().insert(token.to_string(), identity);
    }

    /// Ids whose onboarding flag was written back to the provider.
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

impl Default for FakeIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn current_user(&self, session: &Session) -> Result<Option<Identity>, IdentityError> {
        let users = self.users.lock().unwrap();
        Ok(session
            .token
            .as_deref()
            .and_then(|t| users.get(t))
            .cloned())
    }

    async fn mark_profile_complete(&self, user_id: &str) -> Result<(), IdentityError> {
        let mut users = self.users.lock().unwrap();
        for identity in users.values_mut() {
            if identity.id == user_id {
                identity.has_profile = true;
            }
        }
        self.completed.lock().unwrap().push(user_id.to_string());
        Ok(())
    }
}

/// Recording bucket fake; URLs are `mem://` paths.
pub struct MemObjectStore {
    uploads: Mutex<Vec<String>>,
}

impl MemObjectStore {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

impl Default for MemObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MemObjectStore {
    async fn upload(&self, file: &UploadedFile) -> Result<String, BlobError> {
        let mut uploads = self.uploads.lock().unwrap();
        let url = format!("mem://uploads/{}-{}", uploads.len(), file.name);
        uploads.push(url.clone());
        Ok(url)
    }
}

/// Records every stale-path signal.
pub struct RecordingRevalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingRevalidator {
    pub fn new() -> Self {
        Self {
            paths: Mutex::new(Vec::new()),
        }
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Default for RecordingRevalidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl crate::cache::Revalidator for RecordingRevalidator {
    async fn revalidate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}
