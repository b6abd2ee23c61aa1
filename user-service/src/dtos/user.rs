use serde::{Deserialize, Serialize};
use service_core::utils::validation::{not_blank, null_as_blank};
use validator::Validate;

/// Client-facing view of a user. Carries no server-managed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(default, deserialize_with = "null_as_blank")]
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(max = 100, message = "Name must not exceed 100 characters")
    )]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_blank")]
    #[validate(
        custom(function = "not_blank", message = "Email is required"),
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email must not exceed 255 characters")
    )]
    pub email: String,

    #[validate(length(max = 255, message = "Google ID must not exceed 255 characters"))]
    pub google_id: Option<String>,

    #[validate(length(max = 500, message = "Image URL must not exceed 500 characters"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameSearchQuery {
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct EmailSearchQuery {
    pub email: String,
}
