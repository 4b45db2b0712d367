//! JSON rendering of the current snapshot.
//!
//! Only the articles that pass the UI filters are included, so the output
//! matches what the text listing would show.

use crate::models::Article;
use crate::store::Snapshot;
use crate::view::{UiState, visible_articles};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Report<'a> {
    current_page: u32,
    total_pages: u32,
    total: u64,
    page_size: u32,
    is_loading: bool,
    is_refreshing: bool,
    error: Option<&'a str>,
    ui: &'a UiState,
    articles: Vec<&'a Article>,
}

pub fn render(snapshot: &Snapshot, ui: &UiState) -> Result<String, serde_json::Error> {
    let report = Report {
        current_page: snapshot.current_page,
        total_pages: snapshot.total_pages,
        total: snapshot.total,
        page_size: snapshot.page_size,
        is_loading: snapshot.is_loading,
        is_refreshing: snapshot.is_refreshing,
        error: snapshot.error.as_deref(),
        ui,
        articles: visible_articles(&snapshot.articles, ui),
    };
    serde_json::to_string_pretty(&report)
}
