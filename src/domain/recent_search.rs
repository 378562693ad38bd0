use serde::{Deserialize, Serialize};

/// One remembered search query, deduplicated by exact text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearch {
    pub query: String,
    /// Epoch millis of the most recent use of this query
    pub timestamp: i64,
}
