//! Field error records and the team field validators.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

use crate::slug::make_slug;

/// Minimum number of characters in a team name.
pub const TEAM_NAME_MIN_LEN: usize = 3;
/// Maximum number of characters in a team description.
pub const TEAM_DESCRIPTION_MAX_LEN: usize = 1024;

/// One validation failure, addressed to the offending input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InvalidField {
    /// Name of the field, or a comma separated group for cross-field rules (`"home, away"`).
    pub field: String,
    /// Human readable reason.
    pub message: String,
}

impl InvalidField {
    /// Error record for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates that a team name is long enough and yields a non-empty slug.
///
/// # Examples
///
/// ```ignore
/// validate_team_name("Valur") // Ok
/// validate_team_name("KR")    // Err - too short
/// validate_team_name("???")   // Err - no usable characters for the slug
/// ```
pub fn validate_team_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() < TEAM_NAME_MIN_LEN {
        return Err(error_with_message(
            "team_name_length",
            "Team name must be >= 3 characters long",
        ));
    }

    if make_slug(name).is_empty() {
        return Err(error_with_message(
            "team_name_slug",
            "Team name must contain letters or digits",
        ));
    }

    Ok(())
}

/// Validates that a team description does not exceed [`TEAM_DESCRIPTION_MAX_LEN`] characters.
pub fn validate_team_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > TEAM_DESCRIPTION_MAX_LEN {
        return Err(error_with_message(
            "team_description_length",
            "Description exceeds max length of 1024 characters",
        ));
    }
    Ok(())
}

/// Error used when a required team name is absent.
pub fn missing_team_name() -> ValidationError {
    error_with_message("team_name_missing", "Missing team name")
}

/// Error used when the submitted team name is not a JSON string.
pub fn team_name_not_text() -> ValidationError {
    error_with_message("team_name_type", "Team name must be a string")
}

/// Error used when the submitted team description is not a JSON string.
pub fn team_description_not_text() -> ValidationError {
    error_with_message("team_description_type", "Description must be a string")
}

/// Flatten `errors` into field records, listing fields in the order given by `fields`.
pub fn invalid_fields(errors: &ValidationErrors, fields: &[&str]) -> Vec<InvalidField> {
    let by_field = errors.field_errors();
    fields
        .iter()
        .filter_map(|field| by_field.get(*field).map(|errors| (*field, errors)))
        .flat_map(|(field, errors)| {
            errors.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                InvalidField::new(field, message)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_team_name() {
        assert!(validate_team_name("Valur").is_ok());
        assert!(validate_team_name("Þór").is_ok());
        assert!(validate_team_name("KR").is_err());
        assert!(validate_team_name("").is_err());
        assert!(validate_team_name("?!?").is_err());
    }

    #[test]
    fn test_validate_team_description_length() {
        assert!(validate_team_description("").is_ok());
        assert!(validate_team_description(&"a".repeat(1024)).is_ok());
        assert!(validate_team_description(&"a".repeat(1025)).is_err());
        assert!(validate_team_description(&"é".repeat(1024)).is_ok());
    }

    #[test]
    fn test_invalid_fields_follow_requested_order() {
        let mut errors = ValidationErrors::new();
        errors.add("description", validate_team_description(&"x".repeat(2000)).unwrap_err());
        errors.add("name", validate_team_name("ab").unwrap_err());

        let fields = invalid_fields(&errors, &["name", "description"]);
        assert_eq!(
            fields,
            vec![
                InvalidField::new("name", "Team name must be >= 3 characters long"),
                InvalidField::new(
                    "description",
                    "Description exceeds max length of 1024 characters"
                ),
            ]
        );
    }
}
