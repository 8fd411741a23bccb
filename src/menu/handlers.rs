use axum::{routing::post, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::services::AuthUser,
    menu::{
        classifier,
        dto::{ClassifyRequest, ClassifyResponse},
    },
    state::AppState,
};

pub fn classify_routes() -> Router<AppState> {
    Router::new().route("/menu/classify", post(classify_menu_items))
}

/// POST /menu/classify
/// Accepts `{itemName, description?}` or `{items: [...]}` and answers in kind.
#[instrument(skip(payload))]
pub async fn classify_menu_items(
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ClassifyRequest>,
) -> Json<ClassifyResponse> {
    match payload {
        ClassifyRequest::Single(req) => {
            let rec = classifier::classify(&req.item_name, req.description.as_deref());
            info!(%user_id, item = %req.item_name, score = ?rec.score, "menu item classified");
            Json(ClassifyResponse::Single(rec))
        }
        ClassifyRequest::Batch(req) => {
            let recs = classifier::classify_menu(&req.items);
            info!(%user_id, items = req.items.len(), "menu classified");
            Json(ClassifyResponse::Batch(recs))
        }
    }
}

#[cfg(test)]
mod classify_endpoint_tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn single_and_batch_shapes_round_trip() {
        let user = AuthUser(Uuid::new_v4());
        let Json(single) = classify_menu_items(
            user,
            Json(ClassifyRequest::Single(crate::menu::dto::SingleClassifyRequest {
                item_name: "Grilled salmon".into(),
                description: None,
            })),
        )
        .await;
        let json = serde_json::to_value(&single).unwrap();
        assert_eq!(json["score"], "great");

        let user = AuthUser(Uuid::new_v4());
        let Json(batch) = classify_menu_items(
            user,
            Json(ClassifyRequest::Batch(crate::menu::dto::BatchClassifyRequest {
                items: vec!["Donut".into(), "Salad".into()],
            })),
        )
        .await;
        let json = serde_json::to_value(&batch).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 2);
    }
}
