use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    auth::{repo::User, services::AuthUser},
    badges::{
        dto::{BadgeProgressResponse, LangQuery},
        engine::compute_badge_progress,
        repo::{Badge, BadgeStoreError, UnlockOutcome},
    },
    state::AppState,
};

pub fn badge_routes() -> Router<AppState> {
    Router::new()
        .route("/badges", get(list_badges))
        .route("/badges/progress", get(badge_progress))
}

/// GET /badges returns the raw catalog with both language variants.
#[instrument(skip(state))]
pub async fn list_badges(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Badge>>, (StatusCode, String)> {
    let catalog = state.badges.list_badges().await.map_err(internal)?;
    Ok(Json(catalog))
}

/// GET /badges/progress?lang=
/// Computes the streak report and persists any badges that crossed their
/// threshold since the last call. Safe to hit concurrently: the insert is
/// conflict-ignoring, so a raced unlock degrades to `AlreadyExists`.
#[instrument(skip(state))]
pub async fn badge_progress(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<LangQuery>,
) -> Result<Json<BadgeProgressResponse>, (StatusCode, String)> {
    let joined_at = match state.badges.joined_at(user_id).await {
        Ok(t) => t,
        Err(e) if e.downcast_ref::<BadgeStoreError>().is_some() => {
            warn!(%user_id, "badge progress requested for unknown user");
            return Err((StatusCode::NOT_FOUND, "User not found".into()));
        }
        Err(e) => return Err(internal(e)),
    };

    let catalog = state.badges.list_badges().await.map_err(internal)?;
    let unlocked = state
        .badges
        .unlocked_badge_ids(user_id)
        .await
        .map_err(internal)?;

    let now = OffsetDateTime::now_utc();
    let (newly_unlocked, progress) = compute_badge_progress(joined_at, now, &catalog, &unlocked);

    for badge_id in &newly_unlocked {
        match state.badges.record_unlock(user_id, *badge_id).await {
            Ok(UnlockOutcome::Created) => {
                info!(%user_id, %badge_id, "badge unlocked");
            }
            Ok(UnlockOutcome::AlreadyExists) => {
                debug!(%user_id, %badge_id, "unlock raced, row already present");
            }
            Err(e) => return Err(internal(e)),
        }
    }

    let lang = match q.lang {
        Some(lang) => lang,
        None => User::find_by_id(&state.db, user_id)
            .await
            .ok()
            .flatten()
            .map(|u| u.locale)
            .unwrap_or_else(|| "en".into()),
    };

    Ok(Json(BadgeProgressResponse::from_progress(
        newly_unlocked,
        progress,
        &lang,
    )))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "badge store error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[cfg(test)]
mod progress_tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn fake_store_unlocks_first_week_badge() {
        let state = AppState::fake();
        let Json(report) = badge_progress(
            State(state),
            AuthUser(Uuid::new_v4()),
            Query(LangQuery {
                lang: Some("en".into()),
            }),
        )
        .await
        .expect("progress should compute");

        assert_eq!(report.current_streak, 10);
        assert_eq!(report.earned_badges.len(), 1);
        assert_eq!(report.earned_badges[0].name, "First Week");
        assert_eq!(report.newly_unlocked, vec![report.earned_badges[0].id]);
        assert_eq!(report.locked_badges.len(), 2);

        let milestone = report.next_milestone.expect("30-day badge ahead");
        assert_eq!(milestone.badge.days_required, 30);
        assert_eq!(milestone.days_remaining, 20);
        assert!((milestone.progress - 100.0 * 10.0 / 30.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn catalog_endpoint_returns_ordered_badges() {
        let state = AppState::fake();
        let Json(catalog) = list_badges(State(state), AuthUser(Uuid::new_v4()))
            .await
            .expect("catalog should list");
        let days: Vec<i32> = catalog.iter().map(|b| b.days_required).collect();
        assert_eq!(days, vec![7, 30, 90]);
    }
}
