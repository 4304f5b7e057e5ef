use crate::models::{AwardResult, Nominee};
use crate::state::{PageState, PopulatedPage, ViewState};
use crate::viewmodel::CategoryView;
use std::fmt::Write as _;

// Deterministic, asset-free HTML for the results page. Everything coming
// from the store goes through esc(); all interactivity is plain links that
// carry the serialized view state back to the page route.

const PAGE_TITLE: &str = "r/AnimeIndian Awards Results";

// Escape text for HTML
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn medal(rank: i64) -> &'static str {
    match rank {
        1 => "🥇",
        2 => "🥈",
        3 => "🥉",
        _ => "",
    }
}

fn page_start(buf: &mut String) {
    let _ = write!(
        buf,
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\
         <title>{}</title>\
         <style>\
         body{{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu,Arial,sans-serif;\
         background:#020617;color:#fff;margin:0;padding:24px}}\
         main{{max-width:72rem;margin:0 auto}}\
         h1{{text-align:center}}\
         .card{{background:#0f172a;border:1px solid rgba(255,255,255,.1);border-radius:16px;\
         padding:16px;margin:8px 0}}\
         .winner{{border-color:#facc15}}\
         .muted{{opacity:.7}}\
         .scores{{font-size:.9em}}\
         .panel{{background:#1e293b;border:1px solid rgba(255,255,255,.2);border-radius:16px;\
         padding:16px;margin:16px 0}}\
         nav a{{margin-right:12px}}\
         a{{color:#f9a8d4}}\
         </style></head><body><main>",
        esc(PAGE_TITLE)
    );
}

fn page_end(mut buf: String) -> String {
    buf.push_str("</main></body></html>");
    buf
}

fn result_card(buf: &mut String, result: &AwardResult, winner: bool) {
    let class = if winner { "card winner" } else { "card" };
    let _ = write!(buf, "<div class=\"{}\">", class);

    if let Some(info) = &result.nominee {
        if let Some(url) = &info.image_url {
            let _ = write!(
                buf,
                "<img src=\"{}\" alt=\"{}\" width=\"96\" height=\"96\">",
                esc(url),
                esc(&info.title)
            );
        }
    }

    let _ = write!(
        buf,
        "<h3>{} {}</h3>",
        medal(result.rank),
        esc(result.display_title())
    );
    if let Some(anime) = result.nominee.as_ref().and_then(|n| n.anime_name.as_deref()) {
        let _ = write!(buf, "<p class=\"muted\">{}</p>", esc(anime));
    }

    let _ = write!(
        buf,
        "<div class=\"scores\">\
         Public votes: <b>{}</b><br>\
         Jury votes: <b>{}</b><br>\
         Final score: <b>{}</b>\
         </div></div>",
        result.public_votes,
        result.jury_votes,
        esc(&result.formatted_score())
    );
}

fn nominee_row(buf: &mut String, category: &CategoryView, nominee: &Nominee, state: &ViewState) {
    let href = state.with_selected(Some(nominee.id)).to_query();
    let placement = match category.placement(nominee.id) {
        Some(result) => format!("placed #{}", result.rank),
        None => "no vote data".to_string(),
    };
    let _ = write!(
        buf,
        "<li><a href=\"/{}\">{}</a> <span class=\"muted\">({})</span></li>",
        href,
        esc(&nominee.title),
        esc(&placement)
    );
}

// The nominee detail panel, shown when a nominee link was followed
fn detail_panel(buf: &mut String, page: &PopulatedPage, nominee_id: i64) {
    let Some((category, nominee)) = page.view.find_nominee(nominee_id) else {
        // Selection pointing at nothing (stale link): render nothing
        return;
    };

    buf.push_str("<div class=\"panel\">");
    let _ = write!(buf, "<h2>{}</h2>", esc(&nominee.title));
    if let Some(anime) = &nominee.anime_name {
        let _ = write!(buf, "<p class=\"muted\">{}</p>", esc(anime));
    }
    let _ = write!(buf, "<p class=\"muted\">{}</p>", esc(&category.category));

    match category.placement(nominee.id) {
        Some(result) => {
            let _ = write!(
                buf,
                "<p>{} Rank {}: public {}, jury {}, score {}</p>",
                medal(result.rank),
                result.rank,
                result.public_votes,
                result.jury_votes,
                esc(&result.formatted_score())
            );
        }
        None => buf.push_str("<p class=\"muted\">No vote data for this nominee.</p>"),
    }

    let close = page.state.with_selected(None).to_query();
    let _ = write!(buf, "<p><a href=\"/{}\">Close</a></p></div>", close);
}

fn category_section(buf: &mut String, category: &CategoryView, state: &ViewState) {
    let _ = write!(
        buf,
        "<section id=\"{}\"><h2>🏆 {}</h2>",
        esc(&category.category),
        esc(&category.category)
    );

    if category.is_pending() {
        buf.push_str("<p class=\"muted\">Results pending — nominees so far:</p>");
    } else if let Some(winner) = &category.winner {
        result_card(buf, winner, true);
    }

    let toggle = state.toggled(&category.category).to_query();
    if state.is_expanded(&category.category) {
        // Remaining ranked results beyond the winner banner
        for result in category.top_results.iter().filter(|r| !r.is_winner()) {
            result_card(buf, result, false);
        }

        if !category.all_nominees.is_empty() {
            buf.push_str("<h3>All nominees</h3><ul>");
            for nominee in &category.all_nominees {
                nominee_row(buf, category, nominee, state);
            }
            buf.push_str("</ul>");
        }

        let _ = write!(buf, "<p><a href=\"/{}\">Collapse</a></p>", toggle);
    } else {
        let _ = write!(buf, "<p><a href=\"/{}\">Show full results</a></p>", toggle);
    }

    buf.push_str("</section>");
}

fn populated_page(buf: &mut String, page: &PopulatedPage) {
    buf.push_str("<h1>🏆 WINNERS 🏆</h1>");

    // Category navigation in stable lexicographic order
    buf.push_str("<nav>");
    for category in &page.view.categories {
        let _ = write!(
            buf,
            "<a href=\"#{}\">{}</a>",
            esc(&category.category),
            esc(&category.category)
        );
    }
    buf.push_str("</nav>");

    if let Some(id) = page.state.selected {
        detail_panel(buf, page, id);
    }

    for category in &page.view.categories {
        category_section(buf, category, &page.state);
    }
}

pub fn render_page(state: &PageState) -> String {
    let mut buf = String::with_capacity(16 * 1024);
    page_start(&mut buf);

    match state {
        PageState::Loading => {
            buf.push_str("<p>Loading results...</p>");
        }
        PageState::Error { message } => {
            let _ = write!(
                buf,
                "<h1>Something went wrong</h1><p>{}</p><p><a href=\"/\">Retry</a></p>",
                esc(message)
            );
        }
        PageState::Empty => {
            buf.push_str(
                "<h1>Results Not Yet Available</h1>\
                 <p class=\"muted\">Winners will be announced after the voting deadline.</p>",
            );
        }
        PageState::Populated(page) => populated_page(&mut buf, page),
    }

    page_end(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AwardResult, Nominee, NomineeInfo, Snapshot};
    use chrono::{TimeZone, Utc};

    fn nominee(id: i64, category: &str, title: &str) -> Nominee {
        Nominee {
            id,
            category: category.to_string(),
            title: title.to_string(),
            anime_name: None,
            image_url: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn result(id: i64, nominee_id: i64, category: &str, rank: i64, title: &str) -> AwardResult {
        AwardResult {
            id,
            nominee_id,
            category: category.to_string(),
            rank,
            public_votes: 50,
            jury_votes: 10,
            final_score: Some(8.5),
            nominee: Some(NomineeInfo {
                title: title.to_string(),
                anime_name: None,
                image_url: None,
            }),
        }
    }

    fn populated(results: Vec<AwardResult>, nominees: Vec<Nominee>) -> PageState {
        let mut state = PageState::new();
        state.apply_outcome(Ok(Snapshot { results, nominees }));
        state
    }

    #[test]
    fn empty_state_renders_the_not_yet_available_copy() {
        let mut state = PageState::new();
        state.apply_outcome(Ok(Snapshot {
            results: vec![],
            nominees: vec![],
        }));
        let html = render_page(&state);
        assert!(html.contains("Results Not Yet Available"));
        assert!(!html.contains("Retry"));
    }

    #[test]
    fn error_state_renders_the_message_and_a_retry_link() {
        let state = PageState::Error {
            message: "Could not load results: store unreachable".to_string(),
        };
        let html = render_page(&state);
        assert!(html.contains("store unreachable"));
        assert!(html.contains("Retry"));
    }

    #[test]
    fn winner_banner_carries_the_gold_medal() {
        let state = populated(
            vec![result(10, 1, "Best OP", 1, "Opening A")],
            vec![nominee(1, "Best OP", "Opening A")],
        );
        let html = render_page(&state);
        assert!(html.contains("🥇"));
        assert!(html.contains("Opening A"));
    }

    #[test]
    fn collapsed_category_shows_only_the_winner() {
        let state = populated(
            vec![
                result(10, 1, "Best OP", 1, "First"),
                result(11, 2, "Best OP", 2, "Second"),
            ],
            vec![],
        );
        let html = render_page(&state);
        assert!(html.contains("First"));
        assert!(!html.contains("Second"));
        assert!(html.contains("Show full results"));
    }

    #[test]
    fn expanded_category_shows_runners_up_and_the_roster() {
        let mut state = populated(
            vec![
                result(10, 1, "Best OP", 1, "First"),
                result(11, 2, "Best OP", 2, "Second"),
            ],
            vec![nominee(1, "Best OP", "First"), nominee(3, "Best OP", "Unplaced")],
        );
        state.toggle_category("Best OP");

        let html = render_page(&state);
        assert!(html.contains("Second"));
        assert!(html.contains("All nominees"));
        assert!(html.contains("Unplaced"));
        assert!(html.contains("no vote data"));
        assert!(html.contains("Collapse"));
    }

    #[test]
    fn pending_category_renders_nominees_without_a_winner_banner() {
        let state = populated(vec![], vec![nominee(1, "Best Girl", "A")]);
        let html = render_page(&state);
        assert!(html.contains("Results pending"));
        assert!(!html.contains("🥇"));
    }

    #[test]
    fn selected_nominee_renders_the_detail_panel() {
        let mut state = populated(
            vec![result(10, 1, "Best OP", 1, "Opening A")],
            vec![nominee(1, "Best OP", "Opening A")],
        );
        state.open_nominee(1);

        let html = render_page(&state);
        assert!(html.contains("class=\"panel\""));
        assert!(html.contains("Rank 1"));
        assert!(html.contains("Close"));
    }

    #[test]
    fn store_text_is_html_escaped() {
        let state = populated(
            vec![result(10, 1, "Best OP", 1, "<script>alert(1)</script>")],
            vec![],
        );
        let html = render_page(&state);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn missing_score_renders_the_placeholder() {
        let mut winner = result(10, 1, "Best OP", 1, "Opening A");
        winner.final_score = None;
        let state = populated(vec![winner], vec![]);
        let html = render_page(&state);
        assert!(html.contains("—"));
    }
}
