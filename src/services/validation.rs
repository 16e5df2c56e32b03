//! Field validators and the aggregate game validation pipeline.
//!
//! Every check of a pass runs and every failure is collected; a pass yields either a complete
//! [`ProtoGame`] or the full list of [`InvalidField`]s, never a partial result.

use futures::future::join;
use serde_json::Value;
use time::{Date, Month, OffsetDateTime, format_description::well_known::Rfc3339, util};

use crate::{
    dao::{
        league_store::LeagueStore,
        models::{GameEntity, ProtoGame, TeamId},
        storage::StorageResult,
    },
    dto::{ISO_DATE, game::GameInput, validation::InvalidField},
    error::ServiceError,
};

/// Games may only be recorded for this many months back.
pub const DATE_WINDOW_MONTHS: u8 = 2;

/// Date is unparsable, in the future or older than the window.
pub const INVALID_DATE: &str = "invalid date";
/// Score below zero.
pub const NEGATIVE_SCORE: &str = "score cannot be negative";
/// Score that is not an integer or a string holding one.
pub const MALFORMED_SCORE: &str = "score must be a whole number";
/// Score that does not fit the stored type.
pub const OVERSIZED_SCORE: &str = "score is too large";
/// Slug that names no stored team.
pub const UNKNOWN_TEAM: &str = "team does not exist";
/// Home and away resolve to the same team.
pub const SAME_TEAM: &str = "home and away team cannot be the same team";
/// Field label of the home/away cross-field rule.
pub const HOME_AWAY_FIELD: &str = "home, away";

/// Outcome of a single field check: the normalized value or a message.
pub type FieldResult<T> = Result<T, String>;

/// Ordered accumulator of field errors for one validation pass.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<InvalidField>);

impl FieldErrors {
    /// Record the failure of `result` against `field` and pass its value through.
    pub fn check<T>(&mut self, field: &str, result: FieldResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.push(field, message);
                None
            }
        }
    }

    /// Record `message` against `field`.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(InvalidField::new(field, message));
    }

    /// `true` while nothing failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every recorded failure as a validation error.
    pub fn into_error(self) -> ServiceError {
        ServiceError::Validation(self.0)
    }
}

/// Current calendar day in UTC.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// First day of the recording window ending on `today`.
///
/// Subtracting months clamps the day to the end of the target month, so 31 May yields 31 March
/// and 30 April yields the last day of February.
pub fn earliest_game_date(today: Date) -> Date {
    let mut year = today.year();
    let mut month = today.month();
    for _ in 0..DATE_WINDOW_MONTHS {
        if month == Month::January {
            year -= 1;
        }
        month = month.previous();
    }

    let day = today.day().min(util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN)
}

/// Valid iff `today - 2 months <= date <= today`.
pub fn validate_date(date: Date, today: Date) -> FieldResult<Date> {
    if date < earliest_game_date(today) || date > today {
        return Err(INVALID_DATE.into());
    }
    Ok(date)
}

/// Valid iff `score >= 0`.
pub fn validate_score(score: i64) -> FieldResult<u32> {
    if score < 0 {
        return Err(NEGATIVE_SCORE.into());
    }
    u32::try_from(score).map_err(|_| OVERSIZED_SCORE.to_string())
}

/// Resolve `slug` to the identifier of an existing team.
///
/// The outer result carries storage failures, the inner one the field outcome.
pub async fn validate_team(
    store: &dyn LeagueStore,
    slug: &str,
) -> StorageResult<FieldResult<TeamId>> {
    let id = store.find_team_id(slug.to_owned()).await?;
    Ok(id.ok_or_else(|| UNKNOWN_TEAM.to_string()))
}

/// Interpret a raw JSON date: `YYYY-MM-DD` or an RFC 3339 timestamp, taken in UTC.
pub fn parse_date(raw: Option<&Value>) -> FieldResult<Date> {
    let text = raw
        .and_then(Value::as_str)
        .map(str::trim)
        .ok_or_else(|| INVALID_DATE.to_string())?;

    Date::parse(text, ISO_DATE)
        .or_else(|_| {
            OffsetDateTime::parse(text, &Rfc3339)
                .map(|timestamp| timestamp.to_offset(time::UtcOffset::UTC).date())
        })
        .map_err(|_| INVALID_DATE.to_string())
}

/// Interpret a raw JSON score: an integer or a string holding a base-10 integer.
pub fn parse_score(raw: Option<&Value>) -> FieldResult<i64> {
    match raw {
        Some(Value::Number(number)) => number.as_i64().ok_or_else(|| {
            if number.as_u64().is_some() {
                OVERSIZED_SCORE.to_string()
            } else {
                MALFORMED_SCORE.to_string()
            }
        }),
        Some(Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| MALFORMED_SCORE.to_string()),
        _ => Err(MALFORMED_SCORE.into()),
    }
}

fn check_date(raw: Option<&Value>, today: Date) -> FieldResult<Date> {
    parse_date(raw).and_then(|date| validate_date(date, today))
}

fn check_score(raw: Option<&Value>) -> FieldResult<u32> {
    parse_score(raw).and_then(validate_score)
}

/// Look up the team named by a raw slug; non-string values name no team.
async fn check_team(
    store: &dyn LeagueStore,
    raw: Option<&Value>,
) -> StorageResult<FieldResult<TeamId>> {
    match raw.and_then(Value::as_str) {
        Some(slug) => validate_team(store, slug).await,
        None => Ok(Err(UNKNOWN_TEAM.into())),
    }
}

/// Validate a complete game submission.
///
/// Errors are reported in the order `date`, `home_score`, `away_score`, `home, away`, `home`,
/// `away`. Storage failures during team lookups abort the pass with
/// [`ServiceError::Unavailable`].
pub async fn validate_game(
    store: &dyn LeagueStore,
    input: &GameInput,
    today: Date,
) -> Result<ProtoGame, ServiceError> {
    let (home_lookup, away_lookup) = join(
        check_team(store, input.home.as_ref()),
        check_team(store, input.away.as_ref()),
    )
    .await;

    let mut errors = FieldErrors::default();
    let date = errors.check("date", check_date(input.date.as_ref(), today));
    let home_score = errors.check("home_score", check_score(input.home_score.as_ref()));
    let away_score = errors.check("away_score", check_score(input.away_score.as_ref()));
    if input.home == input.away {
        errors.push(HOME_AWAY_FIELD, SAME_TEAM);
    }
    let home = errors.check("home", home_lookup?);
    let away = errors.check("away", away_lookup?);

    match (date, home, away, home_score, away_score) {
        (Some(date), Some(home), Some(away), Some(home_score), Some(away_score))
            if errors.is_empty() =>
        {
            Ok(ProtoGame {
                date,
                home,
                away,
                home_score,
                away_score,
            })
        }
        _ => Err(errors.into_error()),
    }
}

/// Validate a sparse game patch against the stored `current` game and return the merged
/// candidate.
///
/// Supplied fields are checked with the creation rules; absent ones keep their stored value
/// unchecked. The home/away rule applies to the merged slugs whenever either team is supplied.
pub async fn validate_game_patch(
    store: &dyn LeagueStore,
    current: &GameEntity,
    patch: &GameInput,
    today: Date,
) -> Result<ProtoGame, ServiceError> {
    let (home_lookup, away_lookup) = join(
        async {
            match patch.home.as_ref() {
                Some(raw) => check_team(store, Some(raw)).await,
                None => Ok(Ok(current.home.id)),
            }
        },
        async {
            match patch.away.as_ref() {
                Some(raw) => check_team(store, Some(raw)).await,
                None => Ok(Ok(current.away.id)),
            }
        },
    )
    .await;

    let mut errors = FieldErrors::default();
    let date = match patch.date.as_ref() {
        Some(raw) => errors.check("date", check_date(Some(raw), today)),
        None => Some(current.date),
    };
    let home_score = match patch.home_score.as_ref() {
        Some(raw) => errors.check("home_score", check_score(Some(raw))),
        None => Some(current.home_score),
    };
    let away_score = match patch.away_score.as_ref() {
        Some(raw) => errors.check("away_score", check_score(Some(raw))),
        None => Some(current.away_score),
    };

    if patch.home.is_some() || patch.away.is_some() {
        let home_slug = patch
            .home
            .as_ref()
            .map_or(Some(current.home.slug.as_str()), Value::as_str);
        let away_slug = patch
            .away
            .as_ref()
            .map_or(Some(current.away.slug.as_str()), Value::as_str);
        if home_slug == away_slug {
            errors.push(HOME_AWAY_FIELD, SAME_TEAM);
        }
    }

    let home = errors.check("home", home_lookup?);
    let away = errors.check("away", away_lookup?);

    match (date, home, away, home_score, away_score) {
        (Some(date), Some(home), Some(away), Some(home_score), Some(away_score))
            if errors.is_empty() =>
        {
            Ok(ProtoGame {
                date,
                home,
                away,
                home_score,
                away_score,
            })
        }
        _ => Err(errors.into_error()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::{
        league_store::memory::MemoryLeagueStore,
        models::{TeamDraft, TeamWrite},
    };
    use serde_json::json;
    use time::{Duration, macros::date};

    const TODAY: Date = date!(2024 - 05 - 31);

    async fn store_with_teams(slugs: &[&str]) -> MemoryLeagueStore {
        let store = MemoryLeagueStore::new();
        for slug in slugs {
            let outcome = LeagueStore::insert_team(
                &store,
                TeamDraft {
                    slug: (*slug).into(),
                    name: (*slug).into(),
                    description: String::new(),
                },
            )
            .await
            .unwrap();
            assert!(matches!(outcome, TeamWrite::Written(_)));
        }
        store
    }

    fn submission(
        date: &str,
        home: &str,
        home_score: Value,
        away: &str,
        away_score: Value,
    ) -> GameInput {
        GameInput {
            date: Some(json!(date)),
            home: Some(json!(home)),
            home_score: Some(home_score),
            away: Some(json!(away)),
            away_score: Some(away_score),
        }
    }

    fn fields(err: ServiceError) -> Vec<InvalidField> {
        match err {
            ServiceError::Validation(fields) => fields,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_earliest_game_date_clamps_to_month_end() {
        assert_eq!(earliest_game_date(date!(2024 - 05 - 31)), date!(2024 - 03 - 31));
        assert_eq!(earliest_game_date(date!(2024 - 04 - 30)), date!(2024 - 02 - 29));
        assert_eq!(earliest_game_date(date!(2023 - 04 - 30)), date!(2023 - 02 - 28));
        assert_eq!(earliest_game_date(date!(2024 - 01 - 15)), date!(2023 - 11 - 15));
        assert_eq!(earliest_game_date(date!(2024 - 02 - 10)), date!(2023 - 12 - 10));
    }

    #[test]
    fn test_validate_date_window_boundaries() {
        let earliest = earliest_game_date(TODAY);
        assert_eq!(validate_date(earliest, TODAY), Ok(earliest));
        assert_eq!(validate_date(TODAY, TODAY), Ok(TODAY));
        assert!(validate_date(earliest - Duration::days(1), TODAY).is_err());
        assert_eq!(
            validate_date(TODAY + Duration::days(1), TODAY),
            Err(INVALID_DATE.to_string())
        );
    }

    #[test]
    fn test_validate_score() {
        assert_eq!(validate_score(0), Ok(0));
        assert_eq!(validate_score(7), Ok(7));
        assert_eq!(validate_score(-1), Err(NEGATIVE_SCORE.to_string()));
        assert_eq!(validate_score(i64::MAX), Err(OVERSIZED_SCORE.to_string()));
    }

    #[test]
    fn test_parse_score_accepts_integers_and_numeric_strings() {
        assert_eq!(parse_score(Some(&json!(3))), Ok(3));
        assert_eq!(parse_score(Some(&json!("12"))), Ok(12));
        assert_eq!(parse_score(Some(&json!(" -4 "))), Ok(-4));
    }

    #[test]
    fn test_parse_score_rejects_malformed_values() {
        for raw in [json!("abc"), json!("1.5"), json!(2.5), json!(true), json!(null), json!([1])] {
            assert_eq!(parse_score(Some(&raw)), Err(MALFORMED_SCORE.to_string()));
        }
        assert_eq!(parse_score(None), Err(MALFORMED_SCORE.to_string()));
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date(Some(&json!("2024-05-01"))), Ok(date!(2024 - 05 - 01)));
        assert_eq!(
            parse_date(Some(&json!("2024-05-01T23:30:00-02:00"))),
            Ok(date!(2024 - 05 - 02))
        );
        assert!(parse_date(Some(&json!("yesterday"))).is_err());
        assert!(parse_date(Some(&json!(20240501))).is_err());
        assert!(parse_date(None).is_err());
    }

    #[tokio::test]
    async fn test_validate_team_unknown_slug() {
        let store = store_with_teams(&["alpha"]).await;
        assert_eq!(validate_team(&store, "alpha").await.unwrap(), Ok(1));
        assert_eq!(
            validate_team(&store, "omega").await.unwrap(),
            Err(UNKNOWN_TEAM.to_string())
        );
    }

    #[tokio::test]
    async fn test_validate_game_builds_proto_game() {
        let store = store_with_teams(&["alpha", "beta"]).await;
        let input = submission("2024-05-01", "alpha", json!(1), "beta", json!("2"));

        let game = validate_game(&store, &input, TODAY).await.unwrap();
        assert_eq!(
            game,
            ProtoGame {
                date: date!(2024 - 05 - 01),
                home: 1,
                away: 2,
                home_score: 1,
                away_score: 2,
            }
        );

        let again = validate_game(&store, &input, TODAY).await.unwrap();
        assert_eq!(again, game);
    }

    #[tokio::test]
    async fn test_validate_game_aggregates_without_short_circuit() {
        let store = store_with_teams(&["alpha"]).await;
        let input = submission("2020-01-01", "alpha", json!(-1), "alpha", json!(0));

        let errors = fields(validate_game(&store, &input, TODAY).await.unwrap_err());
        assert_eq!(
            errors,
            vec![
                InvalidField::new("date", INVALID_DATE),
                InvalidField::new("home_score", NEGATIVE_SCORE),
                InvalidField::new(HOME_AWAY_FIELD, SAME_TEAM),
            ]
        );
    }

    #[tokio::test]
    async fn test_validate_game_same_team_reported_even_when_unknown() {
        let store = store_with_teams(&[]).await;
        let input = submission("2024-05-01", "ghost", json!(1), "ghost", json!(2));

        let errors = fields(validate_game(&store, &input, TODAY).await.unwrap_err());
        let names: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(names, vec![HOME_AWAY_FIELD, "home", "away"]);
    }

    #[tokio::test]
    async fn test_validate_game_malformed_scores_are_field_errors() {
        let store = store_with_teams(&["alpha", "beta"]).await;
        let input = submission("2024-05-01", "alpha", json!("three"), "beta", json!(1.5));

        let errors = fields(validate_game(&store, &input, TODAY).await.unwrap_err());
        assert_eq!(
            errors,
            vec![
                InvalidField::new("home_score", MALFORMED_SCORE),
                InvalidField::new("away_score", MALFORMED_SCORE),
            ]
        );
    }

    #[tokio::test]
    async fn test_validate_game_empty_submission_reports_every_field() {
        let store = store_with_teams(&["alpha"]).await;
        let errors = fields(
            validate_game(&store, &GameInput::default(), TODAY)
                .await
                .unwrap_err(),
        );
        let names: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            names,
            vec!["date", "home_score", "away_score", HOME_AWAY_FIELD, "home", "away"]
        );
    }

    async fn stored_game(store: &MemoryLeagueStore) -> GameEntity {
        let input = submission("2024-05-01", "alpha", json!(1), "beta", json!(2));
        let proto = validate_game(store, &input, TODAY).await.unwrap();
        LeagueStore::insert_game(store, proto).await.unwrap()
    }

    #[tokio::test]
    async fn test_validate_game_patch_merges_supplied_fields() {
        let store = store_with_teams(&["alpha", "beta", "gamma"]).await;
        let current = stored_game(&store).await;

        let patch = GameInput {
            away: Some(json!("gamma")),
            home_score: Some(json!(0)),
            ..GameInput::default()
        };
        let merged = validate_game_patch(&store, &current, &patch, TODAY)
            .await
            .unwrap();
        assert_eq!(merged.date, current.date);
        assert_eq!(merged.home, current.home.id);
        assert_eq!(merged.away, 3);
        assert_eq!(merged.home_score, 0);
        assert_eq!(merged.away_score, current.away_score);
    }

    #[tokio::test]
    async fn test_validate_game_patch_skips_absent_fields() {
        let store = store_with_teams(&["alpha", "beta"]).await;
        let mut current = stored_game(&store).await;
        // Stored date has fallen out of the window since the game was recorded.
        current.date = date!(2023 - 01 - 01);

        let patch = GameInput {
            away_score: Some(json!(5)),
            ..GameInput::default()
        };
        let merged = validate_game_patch(&store, &current, &patch, TODAY)
            .await
            .unwrap();
        assert_eq!(merged.date, date!(2023 - 01 - 01));
        assert_eq!(merged.away_score, 5);
    }

    #[tokio::test]
    async fn test_validate_game_patch_accumulates_errors() {
        let store = store_with_teams(&["alpha", "beta"]).await;
        let current = stored_game(&store).await;

        let patch = GameInput {
            date: Some(json!("2099-01-01")),
            home: Some(json!("beta")),
            away_score: Some(json!(-3)),
            ..GameInput::default()
        };
        let errors = fields(
            validate_game_patch(&store, &current, &patch, TODAY)
                .await
                .unwrap_err(),
        );
        assert_eq!(
            errors,
            vec![
                InvalidField::new("date", INVALID_DATE),
                InvalidField::new("away_score", NEGATIVE_SCORE),
                InvalidField::new(HOME_AWAY_FIELD, SAME_TEAM),
            ]
        );
    }
}
