//! RSVP models and submission validation.
//!
//! One canonical schema: name, will_attend, number_of_guests,
//! dietary_restrictions, message, is_confirmed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use shared::validation::{normalize_optional_text, validate_display_name, validate_guest_count};

/// One guest's attendance response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rsvp {
    pub id: i64,
    pub name: String,
    pub will_attend: bool,
    /// Required and >= 1 when attending; absent otherwise.
    pub number_of_guests: Option<i32>,
    pub dietary_restrictions: Option<String>,
    pub message: Option<String>,
    /// Administrator-controlled "verified" flag.
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// Request body for submitting an RSVP.
///
/// Guest count is validated against the attendance choice at the schema
/// level: attending without a count is rejected before any backend call.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_attendance", skip_on_field_errors = false))]
pub struct SubmitRsvpRequest {
    #[validate(custom(function = "validate_display_name"))]
    pub name: String,

    pub will_attend: bool,

    pub number_of_guests: Option<i32>,

    #[validate(length(max = 2000, message = "Dietary restrictions must be at most 2000 characters"))]
    pub dietary_restrictions: Option<String>,

    #[validate(length(max = 2000, message = "Message must be at most 2000 characters"))]
    pub message: Option<String>,
}

fn validate_attendance(request: &SubmitRsvpRequest) -> Result<(), ValidationError> {
    if !request.will_attend {
        // Declining guests may leave (or mistakenly fill) the count; it is
        // discarded during normalization either way.
        return Ok(());
    }
    match request.number_of_guests {
        None => {
            let mut err = ValidationError::new("guest_count_required");
            err.message = Some("Number of guests is required when attending".into());
            Err(err)
        }
        Some(count) => validate_guest_count(count),
    }
}

/// Normalized values ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRsvp {
    pub name: String,
    pub will_attend: bool,
    pub number_of_guests: Option<i32>,
    pub dietary_restrictions: Option<String>,
    pub message: Option<String>,
}

impl SubmitRsvpRequest {
    /// Trims text fields and nulls the guest count for declining guests.
    pub fn normalize(self) -> NewRsvp {
        let number_of_guests = if self.will_attend {
            self.number_of_guests
        } else {
            None
        };
        NewRsvp {
            name: self.name.trim().to_string(),
            will_attend: self.will_attend,
            number_of_guests,
            dietary_restrictions: normalize_optional_text(self.dietary_restrictions),
            message: normalize_optional_text(self.message),
        }
    }
}
