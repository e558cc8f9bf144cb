use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Headline served by `/api/news`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: String,
    /// positive, negative or neutral.
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(with = "super::time")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub symbols: Vec<String>,
}
