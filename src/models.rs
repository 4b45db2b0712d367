//! Data models for articles and pages of articles.
//!
//! This module defines the core data structures used throughout the crate:
//! - [`ArticleRecord`] / [`ContentResponse`]: the listing payload as the backend sends it
//! - [`Article`]: an immutable article as held by the store
//! - [`ContentPage`]: one page of articles plus the total across all pages
//! - [`Category`]: the fixed set of categories the filter bar offers
//!
//! The backend does not classify articles. When a record carries no usable
//! category, one is assigned client-side by rotating over the concrete
//! categories in page order. That value is a placeholder, not a fact about
//! the article.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Words per minute used for the "N min read" estimate.
const READING_WPM: usize = 200;

/// Opaque article identifier. The backend may send it as a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ArticleId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleId::Number(n) => write!(f, "{n}"),
            ArticleId::Text(s) => f.write_str(s),
        }
    }
}

/// Categories offered by the filter bar. [`Category::All`] matches everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Category {
    #[default]
    All,
    Technology,
    Design,
    Travel,
    Lifestyle,
}

impl Category {
    /// Every category in filter-bar order, `All` first.
    pub const ALL: [Category; 5] = [
        Category::All,
        Category::Technology,
        Category::Design,
        Category::Travel,
        Category::Lifestyle,
    ];

    /// The categories an article can actually belong to.
    pub const CONCRETE: [Category; 4] = [
        Category::Technology,
        Category::Design,
        Category::Travel,
        Category::Lifestyle,
    ];

    /// Rotating placeholder for the article at `index` within its page.
    pub fn placeholder_for(index: usize) -> Category {
        Self::CONCRETE[index % Self::CONCRETE.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Technology => "Technology",
            Category::Design => "Design",
            Category::Travel => "Travel",
            Category::Lifestyle => "Lifestyle",
        }
    }

    /// Whether an article in `other` passes a filter set to `self`.
    pub fn matches(&self, other: Category) -> bool {
        *self == Category::All || *self == other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown category: {wanted}"))
    }
}

/// An article exactly as the listing endpoint returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleRecord {
    pub id: ArticleId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
    pub url: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Naive layouts tried after RFC 3339 and RFC 2822; read as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a publication timestamp in any of the shapes backends emit.
///
/// Accepted, in order:
/// - RFC 3339 (`2025-02-15T10:00:00+02:00`)
/// - RFC 2822 / HTTP dates (`Sat, 15 Feb 2025 00:00:00 GMT`)
/// - offset-less date-times (`2025-02-15 10:00:00`, optional fraction), taken as UTC
/// - bare dates (`2025-02-15`), taken as midnight UTC
///
/// # Returns
///
/// The instant normalised to UTC, or `None` when no layout matches.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    /// Seconds since the Unix epoch.
    Epoch(i64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Epoch(secs) => DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {secs}"))),
        RawTimestamp::Text(raw) => parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised date: {raw}"))),
    }
}

impl ArticleRecord {
    /// Convert into an [`Article`], resolving the category for position `index`.
    pub fn into_article(self, index: usize) -> Article {
        let category = match self.category.as_deref().map(Category::from_str) {
            Some(Ok(c)) if c != Category::All => c,
            Some(Err(e)) => {
                debug!(id = %self.id, error = %e, "Ignoring unrecognised category");
                Category::placeholder_for(index)
            }
            _ => Category::placeholder_for(index),
        };

        Article {
            id: self.id,
            title: self.title,
            content: self.content,
            author: self.author,
            date: self.date,
            url: self.url,
            category,
        }
    }
}

/// Body of `GET /api/content`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentResponse {
    pub articles: Vec<ArticleRecord>,
    pub total: u64,
}

impl ContentResponse {
    /// Build the [`ContentPage`] answering page `number`.
    pub fn into_page(self, number: u32) -> ContentPage {
        let articles = self
            .articles
            .into_iter()
            .enumerate()
            .map(|(i, record)| record.into_article(i))
            .collect();
        ContentPage {
            number,
            articles,
            total: self.total,
        }
    }
}

/// A single article held by the store. Never mutated after it is received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    /// Body text, also used for the card excerpt.
    pub content: String,
    pub author: String,
    pub date: DateTime<Utc>,
    /// Link to the original source.
    pub url: String,
    pub category: Category,
}

impl Article {
    /// The first `max_chars` characters of the body, with an ellipsis when cut.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let body = self.content.trim();
        match body.char_indices().nth(max_chars) {
            None => body.to_string(),
            Some((cut, _)) => format!("{}...", body[..cut].trim_end()),
        }
    }

    /// Estimated reading time in whole minutes, never less than one.
    pub fn read_time_minutes(&self) -> usize {
        let words = self.content.split_whitespace().count();
        words.div_ceil(READING_WPM).max(1)
    }

    /// Publication date in the card format, e.g. `Feb 15, 2025`.
    pub fn display_date(&self) -> String {
        self.date.format("%b %-d, %Y").to_string()
    }
}

/// One page of articles, replaced wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentPage {
    /// The 1-based page this content answers.
    pub number: u32,
    /// Articles in server order.
    pub articles: Vec<Article>,
    /// Count of all articles across all pages.
    pub total: u64,
}

impl ContentPage {
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
