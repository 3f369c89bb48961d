//! One validation schema per user-facing submission.

use uuid::Uuid;

use super::{non_negative_int, text, text_max, word_bounded_text, RawForm, UploadedFile,
    ValidationError};
use crate::config;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePayload {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

pub fn validate_profile(form: &RawForm) -> Result<ProfilePayload, ValidationError> {
    let mut errors = Vec::new();

    let first_name = text(form, "firstName", "First name is required", &mut errors);
    let last_name = text(form, "lastName", "Last name is required!", &mut errors);
    let username = text(form, "username", "Username is required!!", &mut errors);

    if !errors.is_empty() {
        return Err(ValidationError::new(errors));
    }
    Ok(ProfilePayload {
        first_name: first_name.unwrap(),
        last_name: last_name.unwrap(),
        username: username.unwrap(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPayload {
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
}

pub fn validate_property(form: &RawForm) -> Result<PropertyPayload, ValidationError> {
    let mut errors = Vec::new();

    let name = text_max(
        form,
        "name",
        "Name is required",
        100,
        "Name must be 100 characters or less",
        &mut errors,
    );
    let tagline = text_max(
        form,
        "tagline",
        "Tagline is required",
        100,
        "Tagline must be 100 characters or less",
        &mut errors,
    );
    let description = word_bounded_text(
        form,
        "description",
        "Description is required",
        10,
        1000,
        "Description must be between 10 and 1000 words",
        &mut errors,
    );
    let country = text(form, "country", "Country is required", &mut errors);
    let category = text(form, "category", "Category is required", &mut errors);
    let price = non_negative_int(form, "price", "Price", &mut errors);
    let guests = non_negative_int(form, "guests", "Guests", &mut errors);
    let bedrooms = non_negative_int(form, "bedrooms", "Bedrooms", &mut errors);
    let beds = non_negative_int(form, "beds", "Beds", &mut errors);
    let baths = non_negative_int(form, "baths", "Baths", &mut errors);
    let amenities = text(form, "amenities", "Amenities are required", &mut errors);

    if !errors.is_empty() {
        return Err(ValidationError::new(errors));
    }
    Ok(PropertyPayload {
        name: name.unwrap(),
        tagline: tagline.unwrap(),
        description: description.unwrap(),
        country: country.unwrap(),
        category: category.unwrap(),
        price: price.unwrap(),
        guests: guests.unwrap(),
        bedrooms: bedrooms.unwrap(),
        beds: beds.unwrap(),
        baths: baths.unwrap(),
        amenities: amenities.unwrap(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewPayload {
    pub property_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

pub fn validate_review(form: &RawForm) -> Result<ReviewPayload, ValidationError> {
    let mut errors = Vec::new();

    let property_id = match form.get("propertyId").and_then(|v| Uuid::parse_str(v).ok()) {
        Some(id) => Some(id),
        None => {
            errors.push("Property id is required".to_string());
            None
        }
    };
    let rating = match form.get("rating").and_then(|v| v.trim().parse::<i32>().ok()) {
        Some(n) if (1..=5).contains(&n) => Some(n),
        _ => {
            errors.push("Rating must be between 1 and 5".to_string());
            None
        }
    };
    let comment = match text(form, "comment", "Comment is required", &mut errors) {
        Some(c) if (10..=1000).contains(&c.chars().count()) => Some(c),
        Some(_) => {
            errors.push("Comment must be between 10 and 1000 characters".to_string());
            None
        }
        None => None,
    };

    if !errors.is_empty() {
        return Err(ValidationError::new(errors));
    }
    Ok(ReviewPayload {
        property_id: property_id.unwrap(),
        rating: rating.unwrap(),
        comment: comment.unwrap(),
    })
}

#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub image: UploadedFile,
}

pub fn validate_image(form: &RawForm) -> Result<ImagePayload, ValidationError> {
    let mut errors = Vec::new();
    let max_bytes = config::config().uploads.max_image_bytes;

    let image = match form.file("image") {
        Some(file) => {
            if file.bytes.len() > max_bytes {
                errors.push("File size must be less than 1 MB".to_string());
            }
            if !file.content_type.starts_with("image/") {
                errors.push("File must be an image".to_string());
            }
            Some(file.clone())
        }
        None => {
            errors.push("Image is required".to_string());
            None
        }
    };

    if !errors.is_empty() {
        return Err(ValidationError::new(errors));
    }
    Ok(ImagePayload {
        image: image.unwrap(),
    })
}
