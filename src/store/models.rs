use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Application user record, linked 1:1 to a provider identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    /// Provider-stable id; unique, and the owner key on every other entity.
    pub identity_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub identity_id: String,
    pub email: String,
    pub profile_image: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: Uuid,
    pub profile_id: String,
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub country: String,
    pub category: String,
    pub price: i32,
    pub guests: i32,
    pub bedrooms: i32,
    pub beds: i32,
    pub baths: i32,
    pub amenities: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProperty {
    pub profile_id: String,
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub country: String,
    pub category: String,
    pub price: i32,
    pub guests: i32,
    pub bedrooms: i32,
    pub beds: i32,
    pub baths: i32,
    pub amenities: String,
    pub image: String,
}

/// Fixed listing projection; never leaks more columns than declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PropertySummary {
    pub id: Uuid,
    pub name: String,
    pub tagline: String,
    pub country: String,
    pub image: String,
    pub price: i32,
}

/// Detail view: the property, its host, and booked date windows.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyDetails {
    pub property: Property,
    pub host: Profile,
    pub bookings: Vec<BookingWindow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingWindow {
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Favorite {
    pub id: Uuid,
    pub profile_id: String,
    pub property_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub profile_id: String,
    pub property_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub profile_id: String,
    pub property_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

/// A property's review as shown on its detail page.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PropertyReview {
    pub id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub reviewer_first_name: String,
    pub reviewer_image: String,
}

/// A caller's own review, joined with the property it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewWithProperty {
    pub id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub property_id: Uuid,
    pub property_name: String,
    pub property_image: String,
}

/// Grouped aggregate over a property's reviews. The empty case is pinned to
/// zero on both fields rather than left to the database's NULL average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PropertyRating {
    pub rating: f64,
    pub count: i64,
}

impl PropertyRating {
    pub fn empty() -> Self {
        Self {
            rating: 0.0,
            count: 0,
        }
    }

    /// Average rounded to one decimal place.
    pub fn from_ratings(ratings: &[i32]) -> Self {
        if ratings.is_empty() {
            return Self::empty();
        }
        let avg = ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64;
        Self {
            rating: (avg * 10.0).round() / 10.0,
            count: ratings.len() as i64,
        }
    }
}
