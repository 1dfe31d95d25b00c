//! Current search query and recent searches.

use serde::{Deserialize, Serialize};

use super::{Container, Persisted};
use crate::models::session_keys;

/// Number of recent searches kept.
pub const MAX_RECENT: usize = 5;

/// The last query and the most recent distinct queries, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistory {
    pub query: String,
    pub recent: Vec<String>,
}

impl SearchHistory {
    /// Record a query.
    ///
    /// Blank queries reset the current query but are not remembered. A query
    /// already in the list (ignoring case) moves to the front.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        self.query = query.to_string();
        if query.is_empty() {
            return;
        }
        let folded = query.to_lowercase();
        self.recent
            .retain(|previous| previous.to_lowercase() != folded);
        self.recent.insert(0, query.to_string());
        self.recent.truncate(MAX_RECENT);
    }

    /// Forget recent searches.
    pub fn clear_recent(&mut self) {
        self.recent.clear();
    }
}

impl Persisted for SearchHistory {
    const KEY: &'static str = session_keys::SEARCH;
}

pub type SearchContainer = Container<SearchHistory>;

impl Container<SearchHistory> {
    /// Record a query and persist the history.
    pub async fn record(&mut self, query: &str) {
        self.update(|history| history.record(query)).await;
    }

    /// Forget recent searches.
    pub async fn clear_recent(&mut self) {
        self.update(SearchHistory::clear_recent).await;
    }
}
