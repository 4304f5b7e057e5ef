use crate::fetcher::FetchError;
use crate::models::Snapshot;
use crate::viewmodel::{build_view_model, ResultsViewModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write as _;

// Ephemeral per-view state: which categories are expanded and which nominee
// sits in the detail panel. Serializable so it can round-trip through the
// page URL; nothing here survives a reload on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub expanded: BTreeSet<String>,
    pub selected: Option<i64>,
}

impl ViewState {
    pub fn is_expanded(&self, category: &str) -> bool {
        self.expanded.contains(category)
    }

    // Rebuild view state from already-decoded query parameters
    pub fn from_query(expanded: Option<&str>, nominee: Option<i64>) -> Self {
        let expanded = expanded
            .unwrap_or("")
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        Self {
            expanded,
            selected: nominee,
        }
    }

    // The state after flipping one category, everything else untouched
    pub fn toggled(&self, category: &str) -> ViewState {
        let mut next = self.clone();
        if !next.expanded.remove(category) {
            next.expanded.insert(category.to_string());
        }
        next
    }

    pub fn with_selected(&self, selected: Option<i64>) -> ViewState {
        let mut next = self.clone();
        next.selected = selected;
        next
    }

    // Serialize back into a query string ("" when nothing is set), so every
    // toggle and detail link is a plain GET back to the page
    pub fn to_query(&self) -> String {
        let mut query = String::new();
        if !self.expanded.is_empty() {
            let joined = self
                .expanded
                .iter()
                .map(|c| encode_component(c))
                .collect::<Vec<_>>()
                .join(",");
            let _ = write!(query, "expanded={}", joined);
        }
        if let Some(id) = self.selected {
            if !query.is_empty() {
                query.push('&');
            }
            let _ = write!(query, "nominee={}", id);
        }
        if query.is_empty() {
            query
        } else {
            format!("?{}", query)
        }
    }
}

// Percent-encode a single query component. Commas are reserved as the
// separator of the expanded list, so they get encoded like everything else.
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulatedPage {
    pub view: ResultsViewModel,
    pub state: ViewState,
}

// The page lifecycle: Loading -> {Error, Empty, Populated}. Expand/collapse
// and the detail panel only exist inside Populated; retry only exists inside
// Error. Every mutation is a whole-value replacement of the variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PageState {
    Loading,
    Error { message: String },
    Empty,
    Populated(PopulatedPage),
}

impl PageState {
    pub fn new() -> Self {
        PageState::Loading
    }

    // Apply the fetch outcome in one swap; the renderer never sees a
    // half-built view model
    pub fn apply_outcome(&mut self, outcome: Result<Snapshot, FetchError>) {
        *self = match outcome {
            Ok(snapshot) => {
                let view = build_view_model(&snapshot.results, &snapshot.nominees);
                if view.is_empty() {
                    // No categories derived at all: "results not yet
                    // available", a named display state rather than an error
                    PageState::Empty
                } else {
                    PageState::Populated(PopulatedPage {
                        view,
                        state: ViewState::default(),
                    })
                }
            }
            Err(e) => PageState::Error {
                message: e.to_string(),
            },
        };
    }

    // Layer in view state carried by the request URL
    pub fn set_view_state(&mut self, state: ViewState) {
        if let PageState::Populated(page) = self {
            page.state = state;
        }
    }

    // Collapsed <-> Expanded for one category, independent of all others
    pub fn toggle_category(&mut self, category: &str) {
        if let PageState::Populated(page) = self {
            page.state = page.state.toggled(category);
        }
    }

    pub fn open_nominee(&mut self, nominee_id: i64) {
        if let PageState::Populated(page) = self {
            page.state = page.state.with_selected(Some(nominee_id));
        }
    }

    // Closing the detail panel leaves everything else exactly as it was
    pub fn close_modal(&mut self) {
        if let PageState::Populated(page) = self {
            page.state = page.state.with_selected(None);
        }
    }

    // Manual retry back to Loading; only meaningful from the error state.
    // Returns whether the caller should re-run the fetch from scratch.
    pub fn retry(&mut self) -> bool {
        if matches!(self, PageState::Error { .. }) {
            *self = PageState::Loading;
            true
        } else {
            false
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}
