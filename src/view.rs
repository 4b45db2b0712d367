//! View-layer contract.
//!
//! The view renders a [`Snapshot`](crate::store::Snapshot) together with its
//! own cosmetic [`UiState`], and turns user actions into [`Intent`]s. The
//! [`Dispatcher`] routes page and refresh intents to the store and applies
//! everything else locally.

use crate::api::ContentApi;
use crate::models::{Article, ArticleId, Category};
use crate::scroll::ScrollView;
use crate::store::{ContentStore, LoadOutcome};
use serde::Serialize;
use tracing::{debug, info};

/// Cosmetic state owned by the view. Nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UiState {
    pub dark_mode: bool,
    pub active_category: Category,
    pub search_query: String,
    pub scroll: ScrollView,
}

impl UiState {
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    pub fn set_category(&mut self, category: Category) {
        self.active_category = category;
    }

    /// Replace the search query. Matching is case-insensitive over title, body and author.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Recompute the scroll-derived values for `offset` pixels.
    pub fn set_scroll(&mut self, offset: f64) {
        self.scroll = ScrollView::from_offset(offset);
    }

    /// Whether `article` passes the category filter and the search box.
    pub fn shows(&self, article: &Article) -> bool {
        if !self.active_category.matches(article.category) {
            return false;
        }
        let query = self.search_query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [&article.title, &article.content, &article.author]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Things the user can ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    RequestPage(u32),
    RequestRefresh,
    SetCategory(Category),
    SetSearch(String),
    ToggleDarkMode,
    /// Fire-and-forget; logged, never stored.
    Bookmark(ArticleId),
    Scroll(f64),
}

/// Articles of the held page that pass the current filters, in server order.
pub fn visible_articles<'a>(articles: &'a [Article], ui: &UiState) -> Vec<&'a Article> {
    articles.iter().filter(|a| ui.shows(a)).collect()
}

/// The featured article plus the rest of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout<'a> {
    pub featured: Option<&'a Article>,
    pub grid: Vec<&'a Article>,
}

impl<'a> Layout<'a> {
    /// The first visible article is featured; the others fill the grid.
    pub fn arrange(articles: &'a [Article], ui: &UiState) -> Self {
        let mut visible = visible_articles(articles, ui).into_iter();
        let featured = visible.next();
        Self {
            featured,
            grid: visible.collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.featured.is_none()
    }
}

/// Routes intents to the store or to the local [`UiState`].
#[derive(Debug)]
pub struct Dispatcher<'s, A> {
    store: &'s ContentStore<A>,
    ui: UiState,
}

impl<'s, A: ContentApi> Dispatcher<'s, A> {
    /// Dispatcher over `store` with default UI state: light mode, all categories, no search.
    pub fn new(store: &'s ContentStore<A>) -> Self {
        Self::with_ui(store, UiState::default())
    }

    /// Dispatcher that starts from an existing `ui`.
    pub fn with_ui(store: &'s ContentStore<A>, ui: UiState) -> Self {
        Self { store, ui }
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn store(&self) -> &ContentStore<A> {
        self.store
    }

    /// Apply `intent`.
    ///
    /// # Returns
    ///
    /// `Some(outcome)` for intents that reach the store (page changes and
    /// refresh), `None` for those handled locally on the [`UiState`].
    pub async fn dispatch(&mut self, intent: Intent) -> Option<LoadOutcome> {
        debug!(?intent, "Dispatching intent");
        match intent {
            Intent::RequestPage(n) => Some(self.store.set_page(n).await),
            Intent::RequestRefresh => Some(self.store.refresh().await),
            Intent::SetCategory(category) => {
                self.ui.set_category(category);
                None
            }
            Intent::SetSearch(query) => {
                self.ui.set_search(query);
                None
            }
            Intent::ToggleDarkMode => {
                self.ui.toggle_dark_mode();
                None
            }
            Intent::Bookmark(id) => {
                info!(article_id = %id, "Bookmark requested");
                None
            }
            Intent::Scroll(offset) => {
                self.ui.set_scroll(offset);
                None
            }
        }
    }
}
