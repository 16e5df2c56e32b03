//! Team management operations.

use tracing::info;
use validator::Validate;

use crate::{
    dao::models::{TeamDraft, TeamRemoval, TeamWrite},
    dto::{
        team::{CreateTeamRequest, TeamCandidate, TeamResponse, UpdateTeamRequest},
        validation::invalid_fields,
    },
    error::ServiceError,
    state::SharedState,
};

const TEAM_EXISTS: &str = "Team exists";

fn team_not_found(slug: &str) -> ServiceError {
    ServiceError::NotFound(format!("Team {slug} does not exist"))
}

/// Run the creation rules over `candidate` and turn it into the fields to persist.
fn checked(candidate: TeamCandidate) -> Result<TeamDraft, ServiceError> {
    if let Err(errors) = candidate.validate() {
        return Err(ServiceError::Validation(invalid_fields(
            &errors,
            &TeamCandidate::FIELDS,
        )));
    }
    candidate
        .into_draft()
        .ok_or_else(|| ServiceError::InvalidInput("Missing team name".into()))
}

/// Every stored team.
pub async fn list_teams(state: &SharedState) -> Result<Vec<TeamResponse>, ServiceError> {
    let store = state.require_league_store().await?;
    let teams = store.list_teams().await?;
    Ok(teams.into_iter().map(TeamResponse::from).collect())
}

/// The team stored under `slug`.
pub async fn get_team(state: &SharedState, slug: String) -> Result<TeamResponse, ServiceError> {
    let store = state.require_league_store().await?;
    let team = store
        .find_team(slug.clone())
        .await?
        .ok_or_else(|| team_not_found(&slug))?;
    Ok(team.into())
}

/// Validate and store a new team, deriving its slug from the name.
pub async fn create_team(
    state: &SharedState,
    request: CreateTeamRequest,
) -> Result<TeamResponse, ServiceError> {
    let store = state.require_league_store().await?;
    let draft = checked(TeamCandidate::from(request))?;

    match store.insert_team(draft).await? {
        TeamWrite::Written(team) => {
            info!(slug = %team.slug, id = team.id, "team created");
            Ok(team.into())
        }
        TeamWrite::SlugTaken | TeamWrite::Missing => {
            Err(ServiceError::Conflict(TEAM_EXISTS.into()))
        }
    }
}

/// Merge `patch` over the team stored under `slug` and persist the result.
///
/// The merged team must pass the creation rules; a rename moves the team to the re-derived slug.
pub async fn update_team(
    state: &SharedState,
    slug: String,
    patch: UpdateTeamRequest,
) -> Result<TeamResponse, ServiceError> {
    let store = state.require_league_store().await?;
    let current = store
        .find_team(slug.clone())
        .await?
        .ok_or_else(|| team_not_found(&slug))?;

    let draft = checked(TeamCandidate::merged(&current, patch))?;

    match store.update_team(slug.clone(), draft).await? {
        TeamWrite::Written(team) => {
            info!(old_slug = %slug, slug = %team.slug, "team updated");
            Ok(team.into())
        }
        TeamWrite::Missing => Err(team_not_found(&slug)),
        TeamWrite::SlugTaken => Err(ServiceError::Conflict(TEAM_EXISTS.into())),
    }
}

/// Remove the team stored under `slug`; teams that took part in games are kept.
pub async fn delete_team(state: &SharedState, slug: String) -> Result<(), ServiceError> {
    let store = state.require_league_store().await?;

    match store.delete_team(slug.clone()).await? {
        TeamRemoval::Removed => {
            info!(slug = %slug, "team deleted");
            Ok(())
        }
        TeamRemoval::Missing => Err(team_not_found(&slug)),
        TeamRemoval::InUse => Err(ServiceError::Conflict(format!(
            "Team {slug} has recorded games"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig, dao::league_store::memory::MemoryLeagueStore,
        dto::validation::InvalidField, state::AppState,
    };
    use std::sync::Arc;

    async fn state() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state
            .set_league_store(Arc::new(MemoryLeagueStore::new()))
            .await;
        state
    }

    fn create(name: &str, description: &str) -> CreateTeamRequest {
        CreateTeamRequest {
            name: Some(name.into()),
            description: Some(description.into()),
        }
    }

    #[tokio::test]
    async fn test_create_then_fetch_by_slug() {
        let state = state().await;
        let created = create_team(&state, create("Foo Bar", "")).await.unwrap();
        assert_eq!(created.slug, "foo-bar");

        let fetched = get_team(&state, "foo-bar".into()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let state = state().await;
        let team = create_team(&state, create("Alpha", "desc")).await.unwrap();
        assert_eq!(team.slug, "alpha");
        assert_eq!(team.description, "desc");

        let err = create_team(&state, create("Alpha", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(message) if message == "Team exists"));
    }

    #[tokio::test]
    async fn test_create_reports_all_invalid_fields() {
        let state = state().await;
        let err = create_team(
            &state,
            CreateTeamRequest {
                name: None,
                description: Some("x".repeat(1025).into()),
            },
        )
        .await
        .unwrap_err();

        let ServiceError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["name", "description"]);
    }

    #[tokio::test]
    async fn test_rename_too_short_leaves_team_unchanged() {
        let state = state().await;
        let original = create_team(&state, create("Alpha", "desc")).await.unwrap();

        let err = update_team(
            &state,
            "alpha".into(),
            UpdateTeamRequest {
                name: Some("AB".into()),
                description: None,
            },
        )
        .await
        .unwrap_err();
        let ServiceError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            fields,
            vec![InvalidField::new(
                "name",
                "Team name must be >= 3 characters long"
            )]
        );

        assert_eq!(get_team(&state, "alpha".into()).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_rename_moves_slug() {
        let state = state().await;
        create_team(&state, create("Alpha", "desc")).await.unwrap();

        let renamed = update_team(
            &state,
            "alpha".into(),
            UpdateTeamRequest {
                name: Some("Alpha United".into()),
                description: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.slug, "alpha-united");
        assert_eq!(renamed.description, "desc");

        assert!(matches!(
            get_team(&state, "alpha".into()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_slug_is_conflict() {
        let state = state().await;
        create_team(&state, create("Alpha", "")).await.unwrap();
        create_team(&state, create("Beta", "")).await.unwrap();

        let err = update_team(
            &state,
            "beta".into(),
            UpdateTeamRequest {
                name: Some("alpha".into()),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_missing_team_is_reported_before_validation() {
        let state = state().await;
        let err = update_team(
            &state,
            "ghost".into(),
            UpdateTeamRequest {
                name: Some("x".into()),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound(message) if message == "Team ghost does not exist"
        ));

        assert!(matches!(
            delete_team(&state, "ghost".into()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_degraded_state_rejects_calls() {
        let state = AppState::new(AppConfig::default());
        assert!(matches!(
            list_teams(&state).await,
            Err(ServiceError::Degraded)
        ));
    }
}
