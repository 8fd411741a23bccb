use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::badges::{engine::BadgeProgress, repo::Badge};

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Option<String>,
}

/// Badge with display strings already resolved for one language.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub days_required: i32,
}

impl BadgeView {
    pub fn for_lang(badge: &Badge, lang: &str) -> Self {
        let localized = lang.starts_with("ko");
        Self {
            id: badge.id,
            name: if localized {
                badge.name_localized.clone()
            } else {
                badge.name.clone()
            },
            description: if localized {
                badge.description_localized.clone()
            } else {
                badge.description.clone()
            },
            icon: badge.icon.clone(),
            days_required: badge.days_required,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextMilestoneView {
    pub badge: BadgeView,
    pub days_remaining: i64,
    pub progress: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeProgressResponse {
    pub current_streak: i64,
    pub earned_badges: Vec<BadgeView>,
    pub locked_badges: Vec<BadgeView>,
    pub next_milestone: Option<NextMilestoneView>,
    pub newly_unlocked: Vec<Uuid>,
}

impl BadgeProgressResponse {
    pub fn from_progress(newly_unlocked: Vec<Uuid>, progress: BadgeProgress, lang: &str) -> Self {
        Self {
            current_streak: progress.current_streak,
            earned_badges: progress
                .earned
                .iter()
                .map(|b| BadgeView::for_lang(b, lang))
                .collect(),
            locked_badges: progress
                .locked
                .iter()
                .map(|b| BadgeView::for_lang(b, lang))
                .collect(),
            next_milestone: progress.next_milestone.map(|m| NextMilestoneView {
                badge: BadgeView::for_lang(&m.badge, lang),
                days_remaining: m.days_remaining,
                progress: m.progress,
            }),
            newly_unlocked,
        }
    }
}
