use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCORE_PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nominee {
    pub id: i64,
    pub category: String,
    pub title: String,
    pub anime_name: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Display fields joined in from the nominee a result points at. Absent when
// the referenced nominee row is missing from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NomineeInfo {
    pub title: String,
    pub anime_name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardResult {
    pub id: i64,
    pub nominee_id: i64,
    pub category: String,
    pub rank: i64,
    pub public_votes: i64,
    pub jury_votes: i64,
    pub final_score: Option<f64>,
    pub nominee: Option<NomineeInfo>,
}

impl AwardResult {
    pub fn is_winner(&self) -> bool {
        self.rank == 1
    }

    // Title to show on a result card, with a fallback when the join found nothing
    pub fn display_title(&self) -> &str {
        self.nominee
            .as_ref()
            .map(|n| n.title.as_str())
            .unwrap_or("Unknown Nominee")
    }

    // Score rounded to one decimal place; placeholder when the store gave us
    // nothing usable
    pub fn formatted_score(&self) -> String {
        match self.final_score {
            Some(score) if score.is_finite() => format!("{:.1}", score),
            _ => SCORE_PLACEHOLDER.to_string(),
        }
    }
}

// Everything the fetcher hands to the view-model builder in one piece.
// A retry replaces the whole snapshot; there is no partial state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub results: Vec<AwardResult>,
    pub nominees: Vec<Nominee>,
}
