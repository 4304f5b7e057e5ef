use crate::models::{AwardResult, Nominee};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// One award category, render-ready: the ranked outcomes plus the full
// nominee roster, with the rank-1 result pulled out as the winner banner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryView {
    pub category: String,
    pub winner: Option<AwardResult>,
    pub top_results: Vec<AwardResult>,
    pub all_nominees: Vec<Nominee>,
}

impl CategoryView {
    // A category with nominees but no finalized results yet
    pub fn is_pending(&self) -> bool {
        self.top_results.is_empty()
    }

    // Where a nominee placed, if it placed at all. Linear scan is fine here:
    // the ranked list is bounded by the award slots per category.
    pub fn placement(&self, nominee_id: i64) -> Option<&AwardResult> {
        self.top_results.iter().find(|r| r.nominee_id == nominee_id)
    }

    pub fn nominee(&self, nominee_id: i64) -> Option<&Nominee> {
        self.all_nominees.iter().find(|n| n.id == nominee_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsViewModel {
    pub categories: Vec<CategoryView>,
}

impl ResultsViewModel {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, name: &str) -> Option<&CategoryView> {
        self.categories.iter().find(|c| c.category == name)
    }

    // The nominee behind a detail view, searched across every category
    pub fn find_nominee(&self, nominee_id: i64) -> Option<(&CategoryView, &Nominee)> {
        self.categories
            .iter()
            .find_map(|c| c.nominee(nominee_id).map(|n| (c, n)))
    }
}

// Shape the two flat row lists into the nested view the page renders from.
// Pure and deterministic: same rows in, same view model out.
pub fn build_view_model(results: &[AwardResult], nominees: &[Nominee]) -> ResultsViewModel {
    // BTreeMap keys give the lexicographic category order the navigation
    // relies on; within a category, input order is preserved (the results
    // query already sorted by rank, nominees by created_at)
    let mut by_category: BTreeMap<String, (Vec<AwardResult>, Vec<Nominee>)> = BTreeMap::new();

    for result in results {
        by_category
            .entry(result.category.clone())
            .or_default()
            .0
            .push(result.clone());
    }

    for nominee in nominees {
        by_category
            .entry(nominee.category.clone())
            .or_default()
            .1
            .push(nominee.clone());
    }

    let categories = by_category
        .into_iter()
        .map(|(category, (top_results, all_nominees))| {
            let winner = top_results.iter().find(|r| r.is_winner()).cloned();
            CategoryView {
                category,
                winner,
                top_results,
                all_nominees,
            }
        })
        .collect();

    ResultsViewModel { categories }
}
