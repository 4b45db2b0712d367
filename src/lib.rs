//! # blogverse
//!
//! Content acquisition for a blog reading interface: one page of articles at a
//! time, fetched from a local content API, with an explicit loading/refresh
//! lifecycle the view layer renders from.
//!
//! ## Architecture
//!
//! - [`api`]: the [`ContentApi`] seam and its HTTP implementation
//! - [`store`]: [`ContentStore`], which owns the current page and its status
//! - [`view`]: UI state, intents, filtering and the intent dispatcher
//! - [`scroll`] / [`newsletter`]: pure helpers for the remaining page widgets
//! - [`outputs`]: text and JSON renderings used by the CLI
//!
//! ## Usage
//!
//! ```ignore
//! let api = HttpContentApi::new("http://localhost:5000")?;
//! let store = ContentStore::new(api, 6);
//! store.load_page(1, 6).await;
//! store.set_page(2).await;
//! let snapshot = store.snapshot();
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod newsletter;
pub mod outputs;
pub mod scroll;
pub mod store;
pub mod utils;
pub mod view;

pub use api::{ContentApi, HttpContentApi};
pub use config::ClientConfig;
pub use error::{ContentError, Result};
pub use models::{Article, ArticleId, Category, ContentPage};
pub use store::{ContentStore, LoadOutcome, Snapshot, Status};
pub use view::{Dispatcher, Intent, UiState};
