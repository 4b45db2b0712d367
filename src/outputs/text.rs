//! Plain-text listing of the current page.

use crate::models::{Article, Category};
use crate::store::Snapshot;
use crate::view::{Layout, UiState};
use std::fmt::Write;

const EXCERPT_CHARS: usize = 160;

fn card(out: &mut String, article: &Article) {
    let _ = writeln!(out, "{}", article.title);
    let _ = writeln!(
        out,
        "  {} | {} | {} | {} min read",
        article.category,
        if article.author.is_empty() { "Unknown author" } else { article.author.as_str() },
        article.display_date(),
        article.read_time_minutes()
    );
    let excerpt = article.excerpt(EXCERPT_CHARS);
    if !excerpt.is_empty() {
        let _ = writeln!(out, "  {excerpt}");
    }
    let _ = writeln!(out, "  {}", article.url);
}

pub fn render(snapshot: &Snapshot, ui: &UiState) -> String {
    let mut out = String::new();

    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "! {error}");
    }

    let _ = writeln!(
        out,
        "Page {} of {} ({} articles)",
        snapshot.current_page,
        snapshot.total_pages.max(1),
        snapshot.total
    );
    if ui.active_category != Category::All || !ui.search_query.trim().is_empty() {
        let _ = writeln!(
            out,
            "Filter: {} / \"{}\"",
            ui.active_category,
            ui.search_query.trim()
        );
    }
    let _ = writeln!(out);

    let layout = Layout::arrange(&snapshot.articles, ui);
    match layout.featured {
        None => {
            let _ = writeln!(out, "No articles to show.");
        }
        Some(featured) => {
            let _ = write!(out, "[Featured] ");
            card(&mut out, featured);
            for article in &layout.grid {
                let _ = writeln!(out);
                card(&mut out, article);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleId;
    use chrono::{TimeZone, Utc};

    fn snapshot(articles: Vec<Article>, error: Option<&str>) -> Snapshot {
        Snapshot {
            total: articles.len() as u64,
            articles,
            current_page: 1,
            total_pages: 1,
            page_size: 6,
            is_loading: false,
            is_refreshing: false,
            error: error.map(str::to_string),
        }
    }

    fn article(id: i64, title: &str, category: Category) -> Article {
        Article {
            id: ArticleId::Number(id),
            title: title.to_string(),
            content: "Exploring the latest trends in web development.".to_string(),
            author: "Alex Rivera".to_string(),
            date: Utc.with_ymd_and_hms(2025, 2, 15, 0, 0, 0).unwrap(),
            url: format!("https://example.com/{id}"),
            category,
        }
    }

    #[test]
    fn test_featured_first() {
        let snap = snapshot(
            vec![
                article(1, "The Future of Web Development", Category::Technology),
                article(2, "Minimalist Design Principles", Category::Design),
            ],
            None,
        );
        let text = render(&snap, &UiState::default());

        assert!(text.starts_with("Page 1 of 1 (2 articles)"));
        assert!(text.contains("[Featured] The Future of Web Development"));
        assert!(text.contains("Technology | Alex Rivera | Feb 15, 2025 | 1 min read"));
        let featured = text.find("The Future").unwrap();
        let second = text.find("Minimalist").unwrap();
        assert!(featured < second);
    }

    #[test]
    fn test_error_and_empty_listing() {
        let snap = snapshot(vec![], Some("Could not reach the content server."));
        let text = render(&snap, &UiState::default());

        assert!(text.starts_with("! Could not reach the content server."));
        assert!(text.contains("No articles to show."));
    }

    #[test]
    fn test_filter_line_shown_when_filtering() {
        let snap = snapshot(vec![article(1, "A", Category::Design)], None);
        let mut ui = UiState::default();
        ui.set_search("design");
        let text = render(&snap, &ui);
        assert!(text.contains("Filter: All / \"design\""));
    }
}
