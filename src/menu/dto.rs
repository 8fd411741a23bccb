use serde::{Deserialize, Serialize};

use crate::menu::classifier::MenuRecommendation;

/// Classify either one item or a whole menu in a single POST body.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ClassifyRequest {
    Batch(BatchClassifyRequest),
    Single(SingleClassifyRequest),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleClassifyRequest {
    pub item_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchClassifyRequest {
    pub items: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ClassifyResponse {
    Single(MenuRecommendation),
    Batch(Vec<MenuRecommendation>),
}
