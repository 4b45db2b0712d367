//! # blogverse
//!
//! Console reader for the blog content API. It loads one page, optionally
//! asks the backend to re-scrape first, applies the category and search
//! filters, and prints the result as text or JSON.
//!
//! ## Usage
//!
//! ```sh
//! blogverse --page 2 --category design
//! ```

use blogverse::cli::Cli;
use blogverse::outputs::{json, text};
use blogverse::{ContentStore, Dispatcher, HttpContentApi, Intent, LoadOutcome};
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = args.resolve_config().await?;
    info!(base_url = %config.base_url, page_size = config.page_size, "blogverse starting up");

    let api = HttpContentApi::from_config(&config)?;
    let store = ContentStore::new(api, config.page_size);
    let mut dispatcher = Dispatcher::new(&store);

    if let Some(category) = args.category {
        dispatcher.dispatch(Intent::SetCategory(category)).await;
    }
    if let Some(query) = &args.search {
        dispatcher.dispatch(Intent::SetSearch(query.clone())).await;
    }

    // The scrape goes first so the requested page is read from the refreshed
    // listing. Pages past the end are followed up with the last page.
    let outcome = if args.refresh {
        store.refresh_page(args.page, config.page_size).await
    } else {
        store.load_page(args.page, config.page_size).await
    };

    let snapshot = store.snapshot();
    let rendered = if args.json {
        json::render(&snapshot, dispatcher.ui())?
    } else {
        text::render(&snapshot, dispatcher.ui())
    };
    println!("{rendered}");

    let elapsed = start_time.elapsed();
    match outcome {
        LoadOutcome::Failed(e) => {
            error!(error = %e, ?elapsed, "Could not load content");
            Err(e.into())
        }
        other => {
            info!(?other, ?elapsed, articles = snapshot.articles.len(), "Execution complete");
            Ok(())
        }
    }
}
