//! Paginated content store.
//!
//! [`ContentStore`] holds exactly one page of articles at a time and drives
//! every load and refresh against a [`ContentApi`].
//!
//! # Lifecycle
//!
//! Each dispatched operation moves a single [`Status`] value:
//!
//! ```text
//! Idle ─load_page─▶ Loading ─ok─▶ Idle
//!                          └err─▶ Failed(message)
//! Idle ─refresh──▶ Refreshing(Scraping) ─ok─▶ Refreshing(Reloading) ─▶ Idle | Failed
//!                                       └err─▶ Failed(message)
//! ```
//!
//! `Failed` is idle with an error attached. The message stays visible while a
//! retry is in flight and is cleared only by the next successful load.
//!
//! # Overlapping requests
//!
//! Every dispatch takes the next request number. A response that arrives for
//! a request older than the latest dispatch is discarded, so rapid page
//! changes settle on the page that was asked for last. Superseded requests
//! are not cancelled; their responses are simply dropped.
//!
//! A failed load never touches the held page: stale but valid content is
//! preferred over an empty view.

use crate::api::ContentApi;
use crate::error::ContentError;
use crate::models::{Article, ContentPage};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Which half of a refresh is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStage {
    Scraping,
    Reloading,
}

/// The one status value of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading {
        request: u64,
        page: u32,
        /// Error of the previous attempt, kept until a load succeeds.
        previous_error: Option<String>,
    },
    Refreshing {
        request: u64,
        stage: RefreshStage,
        previous_error: Option<String>,
    },
    Failed {
        message: String,
    },
}

impl Status {
    /// Message the view should show, if any.
    ///
    /// # Returns
    ///
    /// The failure message while [`Status::Failed`], or the previous attempt's
    /// message while a retry is loading or refreshing. `None` when idle.
    pub fn error(&self) -> Option<&str> {
        match self {
            Status::Idle => None,
            Status::Failed { message } => Some(message),
            Status::Loading { previous_error, .. } | Status::Refreshing { previous_error, .. } => {
                previous_error.as_deref()
            }
        }
    }

    /// True while a plain page load is in flight. Refreshes report through
    /// [`is_refreshing`](Self::is_refreshing) instead.
    pub fn is_loading(&self) -> bool {
        matches!(self, Status::Loading { .. })
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(self, Status::Refreshing { .. })
    }
}

/// What became of a dispatched operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the held page.
    Applied,
    /// A newer request was dispatched first; the response was dropped.
    Stale,
    /// The request failed; the held page is unchanged.
    Failed(ContentError),
    /// The request was out of range and never dispatched.
    Rejected,
}

/// Everything the view needs to render, detached from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub articles: Vec<Article>,
    pub total: u64,
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
struct Inner {
    page: Option<ContentPage>,
    /// Size the held page was fetched with.
    page_size: u32,
    status: Status,
    latest_request: u64,
}

impl Inner {
    fn total(&self) -> u64 {
        self.page.as_ref().map_or(0, |p| p.total)
    }

    fn total_pages(&self) -> u32 {
        let pages = self.total().div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Pages the controls may navigate to. Page 1 is always reachable.
    fn last_navigable_page(&self) -> u32 {
        self.total_pages().max(1)
    }

    fn current_page(&self) -> u32 {
        let number = self.page.as_ref().map_or(1, |p| p.number);
        number.clamp(1, self.last_navigable_page())
    }

    fn next_request(&mut self) -> u64 {
        self.latest_request += 1;
        self.latest_request
    }
}

/// Holds the current page and orchestrates loads and refreshes.
#[derive(Debug)]
pub struct ContentStore<A> {
    api: A,
    inner: Mutex<Inner>,
}

/// Result of settling a response under the state lock.
enum Settled {
    Done(LoadOutcome),
    /// The page landed past the end of the listing; `request` has already
    /// been dispatched for `page`, the last valid page.
    FollowUp { request: u64, page: u32 },
}

impl<A: ContentApi> ContentStore<A> {
    /// Create an empty store over `api`.
    ///
    /// # Arguments
    ///
    /// * `api` - Backend the store fetches from and triggers scrapes on
    /// * `page_size` - Articles per page used by [`set_page`](Self::set_page)
    ///   and [`refresh`](Self::refresh) until a load adopts another size.
    ///   Zero is raised to one.
    pub fn new(api: A, page_size: u32) -> Self {
        Self {
            api,
            inner: Mutex::new(Inner {
                page: None,
                page_size: page_size.max(1),
                status: Status::Idle,
                latest_request: 0,
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn state(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> Status {
        self.state().status.clone()
    }

    /// Copy out everything the view renders.
    ///
    /// # Returns
    ///
    /// A [`Snapshot`] of the held articles, paging figures and status flags.
    /// Before the first successful load the article list is empty, `total`
    /// is zero and `current_page` is 1.
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.state();
        Snapshot {
            articles: inner
                .page
                .as_ref()
                .map(|p| p.articles.clone())
                .unwrap_or_default(),
            total: inner.total(),
            current_page: inner.current_page(),
            total_pages: inner.total_pages(),
            page_size: inner.page_size,
            is_loading: inner.status.is_loading(),
            is_refreshing: inner.status.is_refreshing(),
            error: inner.status.error().map(str::to_string),
        }
    }

    /// Page size of the held page (or the configured size before any load).
    pub fn page_size(&self) -> u32 {
        self.state().page_size
    }

    /// `ceil(total / page_size)`; zero while nothing is loaded or the listing is empty.
    pub fn total_pages(&self) -> u32 {
        self.state().total_pages()
    }

    /// The 1-based page on display, always within `[1, total_pages]` when the listing is non-empty.
    pub fn current_page(&self) -> u32 {
        self.state().current_page()
    }

    pub fn has_next(&self) -> bool {
        let inner = self.state();
        inner.current_page() < inner.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.state().current_page() > 1
    }

    /// Request one page of the listing.
    ///
    /// On success the held page is replaced and the error cleared. On failure
    /// the held page is kept and the error message set. A page past the end
    /// of a non-empty listing is followed up with the last page.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based page number
    /// * `page_size` - Articles per page; adopted by the store on success
    ///
    /// # Returns
    ///
    /// [`LoadOutcome::Rejected`] when either argument is zero, otherwise how
    /// the dispatched request settled.
    #[instrument(level = "info", skip(self))]
    pub async fn load_page(&self, page: u32, page_size: u32) -> LoadOutcome {
        if page == 0 || page_size == 0 {
            debug!("Ignoring load with zero page or page size");
            return LoadOutcome::Rejected;
        }
        let request = self.begin_load(page);
        self.run_load(request, page, page_size).await
    }

    /// Navigate to page `n`. Out-of-range pages are a no-op.
    ///
    /// # Returns
    ///
    /// [`LoadOutcome::Rejected`] without touching any state when `n` is
    /// outside `[1, total_pages]` (only page 1 before anything is loaded).
    #[instrument(level = "info", skip(self))]
    pub async fn set_page(&self, n: u32) -> LoadOutcome {
        let (last, page_size) = {
            let inner = self.state();
            (inner.last_navigable_page(), inner.page_size)
        };
        if n < 1 || n > last {
            debug!(last, "Page out of range; ignoring");
            return LoadOutcome::Rejected;
        }
        self.load_page(n, page_size).await
    }

    pub async fn next_page(&self) -> LoadOutcome {
        let current = self.current_page();
        self.set_page(current.saturating_add(1)).await
    }

    pub async fn previous_page(&self) -> LoadOutcome {
        let current = self.current_page();
        self.set_page(current.saturating_sub(1)).await
    }

    /// Trigger a backend scrape, then reload the current page.
    ///
    /// A failed scrape skips the reload and surfaces the error. If another
    /// load was dispatched while the scrape ran, the refresh ends without
    /// reloading.
    #[instrument(level = "info", skip(self))]
    pub async fn refresh(&self) -> LoadOutcome {
        self.scrape_then_load(None).await
    }

    /// Trigger a backend scrape, then load `page` of the refreshed listing.
    ///
    /// Unlike [`refresh`](Self::refresh) the page is taken as given, not from
    /// what is on display, so it may lie beyond the pre-scrape listing. The
    /// scrape runs even when nothing has been loaded yet.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based page to show once the scrape completes
    /// * `page_size` - Articles per page; adopted by the store on success
    ///
    /// # Returns
    ///
    /// [`LoadOutcome::Rejected`] when either argument is zero, otherwise the
    /// outcome of the scrape-and-load sequence.
    #[instrument(level = "info", skip(self))]
    pub async fn refresh_page(&self, page: u32, page_size: u32) -> LoadOutcome {
        if page == 0 || page_size == 0 {
            debug!("Ignoring refresh with zero page or page size");
            return LoadOutcome::Rejected;
        }
        self.scrape_then_load(Some((page, page_size))).await
    }

    async fn scrape_then_load(&self, target: Option<(u32, u32)>) -> LoadOutcome {
        let request = {
            let mut inner = self.state();
            let request = inner.next_request();
            let previous_error = inner.status.error().map(str::to_string);
            inner.status = Status::Refreshing {
                request,
                stage: RefreshStage::Scraping,
                previous_error,
            };
            request
        };

        let scraped = self.api.trigger_scrape().await;

        let (page, page_size) = {
            let mut inner = self.state();
            if inner.latest_request != request {
                debug!(request, latest = inner.latest_request, "Refresh superseded during scrape");
                return LoadOutcome::Stale;
            }
            if let Err(e) = scraped {
                warn!(error = %e, "Scrape failed; skipping reload");
                inner.status = Status::Failed {
                    message: e.user_message(),
                };
                return LoadOutcome::Failed(e);
            }
            let previous_error = inner.status.error().map(str::to_string);
            inner.status = Status::Refreshing {
                request,
                stage: RefreshStage::Reloading,
                previous_error,
            };
            target.unwrap_or_else(|| (inner.current_page(), inner.page_size))
        };

        info!(page, "Scrape complete; reloading");
        self.run_load(request, page, page_size).await
    }

    fn begin_load(&self, page: u32) -> u64 {
        let mut inner = self.state();
        let request = inner.next_request();
        let previous_error = inner.status.error().map(str::to_string);
        inner.status = Status::Loading {
            request,
            page,
            previous_error,
        };
        request
    }

    async fn run_load(&self, mut request: u64, mut page: u32, page_size: u32) -> LoadOutcome {
        loop {
            let result = self.api.fetch_page(page, page_size).await;
            match self.settle(request, page, page_size, result) {
                Settled::Done(outcome) => return outcome,
                Settled::FollowUp {
                    request: next,
                    page: last,
                } => {
                    info!(requested = page, last, "Page beyond end of listing; loading last page");
                    request = next;
                    page = last;
                }
            }
        }
    }

    /// Apply `result` if `request` is still the latest dispatch.
    ///
    /// The listing can shrink between requests (a scrape, deletions). When an
    /// applied page lies past the end, the follow-up for the last page is
    /// dispatched under the same guard so no newer request can slip in between.
    fn settle(
        &self,
        request: u64,
        page: u32,
        page_size: u32,
        result: Result<ContentPage, ContentError>,
    ) -> Settled {
        let mut inner = self.state();
        if request != inner.latest_request {
            debug!(request, latest = inner.latest_request, page, "Discarding stale response");
            return Settled::Done(LoadOutcome::Stale);
        }

        match result {
            Ok(mut content) => {
                let limit = page_size as usize;
                if content.articles.len() > limit {
                    warn!(
                        received = content.articles.len(),
                        page_size, "Server returned more articles than requested; truncating"
                    );
                    content.articles.truncate(limit);
                }
                content.number = page;
                info!(page, count = content.articles.len(), total = content.total, "Page loaded");
                inner.page = Some(content);
                inner.page_size = page_size;
                inner.status = Status::Idle;

                let total_pages = inner.total_pages();
                if total_pages > 0 && page > total_pages {
                    let request = inner.next_request();
                    inner.status = Status::Loading {
                        request,
                        page: total_pages,
                        previous_error: None,
                    };
                    return Settled::FollowUp {
                        request,
                        page: total_pages,
                    };
                }
                Settled::Done(LoadOutcome::Applied)
            }
            Err(e) => {
                warn!(page, error = %e, "Page load failed; keeping previous content");
                inner.status = Status::Failed {
                    message: e.user_message(),
                };
                Settled::Done(LoadOutcome::Failed(e))
            }
        }
    }
}
