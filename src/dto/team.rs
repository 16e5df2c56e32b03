//! Team payloads of the REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{TeamDraft, TeamEntity},
    dto::validation::{
        missing_team_name, team_description_not_text, team_name_not_text,
        validate_team_description, validate_team_name,
    },
    slug::make_slug,
};

/// Payload creating a new team.
///
/// Values are kept untyped so that a non-string field is reported as a field error.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateTeamRequest {
    /// Display name; the slug is derived from it.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Valur")]
    pub name: Option<Value>,
    /// Defaults to an empty description.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
}

/// Sparse team patch; absent (or `null`) fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTeamRequest {
    /// New display name; renaming re-derives the slug.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    /// New description.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
}

/// Public projection of a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TeamResponse {
    /// Identifier used in `/teams/{slug}`.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

impl From<TeamEntity> for TeamResponse {
    fn from(team: TeamEntity) -> Self {
        Self {
            slug: team.slug,
            name: team.name,
            description: team.description,
        }
    }
}

/// Complete team proposal checked against the creation rules, whether it comes from a
/// creation request or from a patch merged over a stored team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamCandidate {
    /// Raw name; must be a string.
    pub name: Option<Value>,
    /// `None` stands for an empty description.
    pub description: Option<Value>,
}

impl TeamCandidate {
    /// Field names in the order their errors are reported.
    pub const FIELDS: [&'static str; 2] = ["name", "description"];

    /// Merge `patch` over the stored `team`.
    pub fn merged(team: &TeamEntity, patch: UpdateTeamRequest) -> Self {
        Self {
            name: Some(patch.name.unwrap_or_else(|| team.name.clone().into())),
            description: Some(
                patch
                    .description
                    .unwrap_or_else(|| team.description.clone().into()),
            ),
        }
    }

    /// Turn a validated candidate into the fields to persist.
    ///
    /// Returns `None` when the name is missing or a field is not a string, which validation
    /// reports.
    pub fn into_draft(self) -> Option<TeamDraft> {
        let Value::String(name) = self.name? else {
            return None;
        };
        let description = match self.description {
            None => String::new(),
            Some(Value::String(description)) => description,
            Some(_) => return None,
        };
        Some(TeamDraft {
            slug: make_slug(&name),
            name,
            description,
        })
    }
}

impl From<CreateTeamRequest> for TeamCandidate {
    fn from(request: CreateTeamRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
        }
    }
}

impl Validate for TeamCandidate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match &self.name {
            None => errors.add("name", missing_team_name()),
            Some(Value::String(name)) => {
                if let Err(e) = validate_team_name(name) {
                    errors.add("name", e);
                }
            }
            Some(_) => errors.add("name", team_name_not_text()),
        }

        match &self.description {
            None => {}
            Some(Value::String(description)) => {
                if let Err(e) = validate_team_description(description) {
                    errors.add("description", e);
                }
            }
            Some(_) => errors.add("description", team_description_not_text()),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> TeamEntity {
        TeamEntity {
            id: 1,
            slug: "alpha".into(),
            name: "Alpha".into(),
            description: "desc".into(),
        }
    }

    #[test]
    fn test_merged_keeps_unspecified_fields() {
        let candidate = TeamCandidate::merged(
            &stored(),
            UpdateTeamRequest {
                name: None,
                description: Some("new".into()),
            },
        );
        assert_eq!(candidate.name, Some("Alpha".into()));
        assert_eq!(candidate.description, Some("new".into()));
    }

    #[test]
    fn test_rename_rederives_slug() {
        let candidate = TeamCandidate::merged(
            &stored(),
            UpdateTeamRequest {
                name: Some("Foo Bar".into()),
                description: None,
            },
        );
        let draft = candidate.into_draft().unwrap();
        assert_eq!(draft.slug, "foo-bar");
        assert_eq!(draft.description, "desc");
    }

    #[test]
    fn test_missing_name_and_long_description_both_reported() {
        let candidate = TeamCandidate::from(CreateTeamRequest {
            name: None,
            description: Some("x".repeat(1025).into()),
        });
        let errors = candidate.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_non_string_fields_are_field_errors() {
        use crate::dto::validation::{InvalidField, invalid_fields};

        let request: CreateTeamRequest =
            serde_json::from_value(serde_json::json!({"name": 12345, "description": ["x"]}))
                .unwrap();
        let candidate = TeamCandidate::from(request);
        let errors = candidate.validate().unwrap_err();

        assert_eq!(
            invalid_fields(&errors, &TeamCandidate::FIELDS),
            vec![
                InvalidField::new("name", "Team name must be a string"),
                InvalidField::new("description", "Description must be a string"),
            ]
        );
        assert_eq!(candidate.into_draft(), None);
    }

    #[test]
    fn test_null_fields_count_as_absent() {
        let request: UpdateTeamRequest =
            serde_json::from_value(serde_json::json!({"name": null, "description": "new"}))
                .unwrap();
        let draft = TeamCandidate::merged(&stored(), request)
            .into_draft()
            .unwrap();
        assert_eq!(draft.name, "Alpha");
        assert_eq!(draft.description, "new");
    }
}
