//! Listing submission validation

use super::model::{Listing, Location};
use crate::error::{Result, TurftapError};
use serde::{Deserialize, Serialize};

/// Submission payload for a new ground
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitListingRequest {
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub lat: f64,
    pub lng: f64,
    pub timings: String,
    pub is_paid: bool,
    pub price: Option<u64>,
    pub images: Vec<String>,
}

/// Partial edit of an existing ground; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub timings: Option<String>,
    pub is_paid: Option<bool>,
    pub price: Option<u64>,
    pub images: Option<Vec<String>>,
}

impl UpdateListingRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.categories.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.lat.is_none()
            && self.lng.is_none()
            && self.timings.is_none()
            && self.is_paid.is_none()
            && self.price.is_none()
            && self.images.is_none()
    }

    /// The full submission that results from applying this edit to `current`
    pub fn merge(self, current: &Listing) -> SubmitListingRequest {
        let location = &current.location;
        let is_paid = self.is_paid.unwrap_or(current.is_paid);
        let price = self
            .price
            .or_else(|| current.is_paid.then_some(current.price));

        SubmitListingRequest {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            categories: self
                .categories
                .unwrap_or_else(|| current.categories.clone()),
            address: self.address.unwrap_or_else(|| location.address.clone()),
            city: self.city.unwrap_or_else(|| location.city.clone()),
            state: self.state.unwrap_or_else(|| location.state.clone()),
            lat: self.lat.unwrap_or(location.lat),
            lng: self.lng.unwrap_or(location.lng),
            timings: self.timings.unwrap_or_else(|| current.timings.clone()),
            is_paid,
            price,
            images: self.images.unwrap_or_else(|| current.images.clone()),
        }
    }
}

/// Submission after validation, with whitespace normalized
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    pub location: Location,
    pub timings: String,
    pub is_paid: bool,
    pub price: u64,
    pub images: Vec<String>,
}

/// Validate a submission, reporting the first problem found
pub fn validate_submission(request: SubmitListingRequest) -> Result<ValidSubmission> {
    let title = required(&request.title, "title")?;
    let description = required(&request.description, "description")?;
    let timings = required(&request.timings, "timings")?;
    let address = required(&request.address, "address")?;
    let city = required(&request.city, "city")?;
    let state = required(&request.state, "state")?;

    let categories = non_empty_list(request.categories, "category")?;
    let images = non_empty_list(request.images, "image")?;

    if !(-90.0..=90.0).contains(&request.lat) || !(-180.0..=180.0).contains(&request.lng) {
        return Err(TurftapError::Validation(format!(
            "Coordinates out of range: {}, {}",
            request.lat, request.lng
        )));
    }

    let price = if request.is_paid {
        match request.price {
            Some(price) if price > 0 => price,
            _ => {
                return Err(TurftapError::Validation(
                    "Price must be provided for paid grounds".to_string(),
                ))
            }
        }
    } else {
        0
    };

    Ok(ValidSubmission {
        title,
        description,
        categories,
        location: Location {
            address,
            state,
            city,
            lat: request.lat,
            lng: request.lng,
        },
        timings,
        is_paid: request.is_paid,
        price,
        images,
    })
}

fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TurftapError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn non_empty_list(values: Vec<String>, field: &str) -> Result<Vec<String>> {
    let values: Vec<String> = values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if values.is_empty() {
        return Err(TurftapError::Validation(format!(
            "At least one {} is required",
            field
        )));
    }
    Ok(values)
}

#[cfg(test)]
pub(crate) fn sample_request() -> SubmitListingRequest {
    SubmitListingRequest {
        title: "Riverside Turf".to_string(),
        description: "Seven-a-side astroturf".to_string(),
        categories: vec!["Football".to_string(), "Cricket".to_string()],
        address: "4 River Lane".to_string(),
        city: "Pune".to_string(),
        state: "Maharashtra".to_string(),
        lat: 18.52,
        lng: 73.85,
        timings: "24 hours".to_string(),
        is_paid: true,
        price: Some(800),
        images: vec!["https://img.example/riverside.jpg".to_string()],
    }
}
