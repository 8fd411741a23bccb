use serde::Serialize;
use tracing::debug;

/// Diabetes-friendliness tier assigned to a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Great,
    Moderate,
    Caution,
}

/// Recommendation for a single menu item. Built fresh per call, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuRecommendation {
    pub name: String,
    pub score: Tier,
    pub reason: String,
    pub tips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_carbs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_calories: Option<u32>,
}

// Lean protein, non-starchy vegetables, low-glycemic grains.
const GREAT_KEYWORDS: &[&str] = &[
    "grilled",
    "baked",
    "steamed",
    "roasted",
    "salad",
    "salmon",
    "tuna",
    "chicken",
    "turkey",
    "tofu",
    "quinoa",
    "lentil",
    "broccoli",
    "spinach",
    "kale",
    "cauliflower",
    "zucchini",
    "vegetable",
    "greens",
];

// High-glycemic, fried or sugary terms. Matching is substring-based, so
// "breaded" hits "bread" and "sugar-free" still hits "sugar".
const CAUTION_KEYWORDS: &[&str] = &[
    "fried",
    "crispy",
    "battered",
    "bread",
    "pasta",
    "noodle",
    "pizza",
    "burger",
    "fries",
    "white rice",
    "dessert",
    "cake",
    "cookie",
    "donut",
    "pastry",
    "syrup",
    "sugar",
    "sweetened",
    "honey",
    "candy",
    "chocolate",
    "milkshake",
    "soda",
    "creamy",
    "alfredo",
    "cheese",
    "bacon",
    "sausage",
];

// Counted and logged, but the tier policy below never consults this set.
const MODERATE_KEYWORDS: &[&str] = &[
    "whole grain",
    "whole wheat",
    "brown rice",
    "oat",
    "beans",
    "avocado",
    "yogurt",
    "hummus",
    "nuts",
    "berries",
    "banana",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeywordCounts {
    pub great: usize,
    pub caution: usize,
    pub moderate: usize,
}

fn count_occurrences(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().map(|kw| text.matches(kw).count()).sum()
}

pub(crate) fn keyword_counts(text: &str) -> KeywordCounts {
    KeywordCounts {
        great: count_occurrences(text, GREAT_KEYWORDS),
        caution: count_occurrences(text, CAUTION_KEYWORDS),
        moderate: count_occurrences(text, MODERATE_KEYWORDS),
    }
}

impl Tier {
    fn reason(self) -> &'static str {
        match self {
            Tier::Great => {
                "Lean protein and non-starchy vegetables tend to have a gentle effect on blood sugar."
            }
            Tier::Moderate => {
                "This looks balanced, but portion size will drive the glucose response."
            }
            Tier::Caution => "Fried or sugary items like this often cause a sharp glucose spike.",
        }
    }

    fn tips(self) -> &'static [&'static str] {
        match self {
            Tier::Great => &[
                "Ask for dressings and sauces on the side.",
                "Pair it with water or an unsweetened drink.",
            ],
            Tier::Moderate => &[
                "Keep the portion moderate and eat slowly.",
                "Add a side of vegetables or a small salad.",
                "Check your glucose about two hours after eating.",
            ],
            Tier::Caution => &[
                "Consider sharing the dish or saving half for later.",
                "A short walk after the meal helps blunt the spike.",
                "If you order it, skip other carbs in the same meal.",
            ],
        }
    }

    /// Coarse per-tier defaults, (carbs g, calories kcal).
    fn estimates(self) -> (u32, u32) {
        match self {
            Tier::Great => (15, 300),
            Tier::Moderate => (30, 400),
            Tier::Caution => (60, 700),
        }
    }
}

/// Scores a free-text menu item into a tier using keyword heuristics.
/// Case-insensitive and deterministic; empty input lands on `Moderate`.
pub fn classify(item_name: &str, description: Option<&str>) -> MenuRecommendation {
    let text = format!("{} {}", item_name, description.unwrap_or("")).to_lowercase();
    let counts = keyword_counts(&text);
    debug!(
        great = counts.great,
        caution = counts.caution,
        moderate = counts.moderate,
        "keyword counts"
    );

    let score = if counts.great > counts.caution {
        Tier::Great
    } else if counts.caution > 1 {
        Tier::Caution
    } else {
        Tier::Moderate
    };

    let (carbs, calories) = score.estimates();
    MenuRecommendation {
        name: item_name.to_string(),
        score,
        reason: score.reason().to_string(),
        tips: score.tips().iter().map(|t| t.to_string()).collect(),
        estimated_carbs: Some(carbs),
        estimated_calories: Some(calories),
    }
}

/// Classifies each item independently, preserving input order.
pub fn classify_menu(items: &[String]) -> Vec<MenuRecommendation> {
    items.iter().map(|item| classify(item, None)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grilled_chicken_salad_is_great() {
        let rec = classify("Grilled chicken salad", None);
        assert_eq!(rec.score, Tier::Great);
        assert_eq!(rec.name, "Grilled chicken salad");
        assert_eq!(rec.estimated_carbs, Some(15));
        assert_eq!(rec.estimated_calories, Some(300));
    }

    #[test]
    fn fried_and_creamy_is_caution() {
        let rec = classify("Fried calamari with creamy alfredo sauce", None);
        assert_eq!(rec.score, Tier::Caution);
        assert_eq!(rec.estimated_carbs, Some(60));
        assert_eq!(rec.estimated_calories, Some(700));
    }

    #[test]
    fn quinoa_bowl_is_great() {
        let rec = classify("Grilled quinoa bowl with roasted vegetables", None);
        assert_eq!(rec.score, Tier::Great);
        assert_eq!(rec.estimated_carbs, Some(15));
        assert_eq!(rec.estimated_calories, Some(300));
    }

    #[test]
    fn classification_is_case_insensitive() {
        let upper = classify("GRILLED Chicken", None);
        let lower = classify("grilled chicken", None);
        assert_eq!(upper.score, lower.score);
        assert_eq!(upper.reason, lower.reason);
        assert_eq!(upper.tips, lower.tips);
    }

    #[test]
    fn empty_input_falls_back_to_moderate() {
        let rec = classify("", None);
        assert_eq!(rec.score, Tier::Moderate);
        assert_eq!(rec.estimated_carbs, Some(30));
        assert_eq!(rec.estimated_calories, Some(400));
    }

    #[test]
    fn description_text_is_inspected_too() {
        let rec = classify(
            "House special",
            Some("crispy fried pork belly with maple syrup"),
        );
        assert_eq!(rec.score, Tier::Caution);
    }

    #[test]
    fn single_caution_match_stays_moderate() {
        // One great, one caution: neither branch wins the tie.
        let rec = classify("Grilled cheese sandwich", None);
        assert_eq!(rec.score, Tier::Moderate);
    }

    #[test]
    fn moderate_matches_never_decide_the_tier() {
        // Two caution hits outweigh any number of moderate hits.
        let rec = classify("Whole grain pasta in creamy sauce with beans", None);
        assert_eq!(rec.score, Tier::Caution);

        let counts = keyword_counts("whole grain pasta in creamy sauce with beans");
        assert!(counts.moderate >= 2);
        assert_eq!(counts.caution, 2);
    }

    #[test]
    fn substring_matching_has_no_word_boundaries() {
        let counts = keyword_counts("breaded pork cutlet");
        assert_eq!(counts.caution, 1); // "breaded" contains "bread"
    }

    #[test]
    fn batch_preserves_order_and_length() {
        let items = vec![
            "Grilled salmon".to_string(),
            "Chocolate milkshake".to_string(),
            "Rice bowl".to_string(),
        ];
        let recs = classify_menu(&items);
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].name, "Grilled salmon");
        assert_eq!(recs[0].score, Tier::Great);
        assert_eq!(recs[1].name, "Chocolate milkshake");
        assert_eq!(recs[1].score, Tier::Caution);
        assert_eq!(recs[2].score, Tier::Moderate);
    }

    #[test]
    fn recommendation_serializes_camel_case() {
        let rec = classify("Grilled salmon", None);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["score"], "great");
        assert!(json["estimatedCarbs"].is_number());
        assert!(json["estimatedCalories"].is_number());
        assert!(json["tips"].is_array());
    }
}
