// src/repositories/recent_search_repository.rs
//
// Recent-search persistence

use std::sync::Arc;

use rusqlite::params;

use crate::db::ConnectionPool;
use crate::domain::RecentSearch;
use crate::error::AppResult;

/// How many searches the history surfaces
const RECENT_SEARCH_LIMIT: i64 = 10;

pub trait RecentSearchRepository: Send + Sync {
    /// Insert-or-replace by query text (re-searching bumps recency)
    fn insert(&self, search: &RecentSearch) -> AppResult<()>;
    /// The 10 most recent searches, newest first
    fn recent(&self) -> AppResult<Vec<RecentSearch>>;
    fn delete_by_query(&self, query: &str) -> AppResult<()>;
}

pub struct SqliteRecentSearchRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteRecentSearchRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl RecentSearchRepository for SqliteRecentSearchRepository {
    fn insert(&self, search: &RecentSearch) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO recent_searches (query, timestamp) VALUES (?1, ?2)",
            params![search.query, search.timestamp],
        )?;
        Ok(())
    }

    fn recent(&self) -> AppResult<Vec<RecentSearch>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT query, timestamp FROM recent_searches
             ORDER BY timestamp DESC
             LIMIT ?1",
        )?;

        let searches: Vec<RecentSearch> = stmt
            .query_map(params![RECENT_SEARCH_LIMIT], |row| {
                Ok(RecentSearch {
                    query: row.get(0)?,
                    timestamp: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(searches)
    }

    fn delete_by_query(&self, query: &str) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM recent_searches WHERE query = ?1", params![query])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, initialize_database};

    fn test_repo() -> SqliteRecentSearchRepository {
        let pool = create_test_pool().unwrap();
        {
            let conn = pool.get().unwrap();
            initialize_database(&conn).unwrap();
        }
        SqliteRecentSearchRepository::new(Arc::new(pool))
    }

    fn search(query: &str, timestamp: i64) -> RecentSearch {
        RecentSearch {
            query: query.to_string(),
            timestamp,
        }
    }

    #[test]
    fn test_insert_and_recency_order() {
        let repo = test_repo();

        repo.insert(&search("henry", 1_000)).unwrap();
        repo.insert(&search("zidane", 3_000)).unwrap();
        repo.insert(&search("shearer", 2_000)).unwrap();

        let recent = repo.recent().unwrap();
        let queries: Vec<&str> = recent.iter().map(|s| s.query.as_str()).collect();
        assert_eq!(queries, vec!["zidane", "shearer", "henry"]);
    }

    #[test]
    fn test_dedup_by_exact_query_bumps_recency() {
        let repo = test_repo();

        repo.insert(&search("henry", 1_000)).unwrap();
        repo.insert(&search("shearer", 2_000)).unwrap();
        repo.insert(&search("henry", 3_000)).unwrap();

        let recent = repo.recent().unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].query, "henry");
        assert_eq!(recent[0].timestamp, 3_000);
    }

    #[test]
    fn test_capped_to_ten_most_recent() {
        let repo = test_repo();

        for i in 0..15 {
            repo.insert(&search(&format!("query-{}", i), i)).unwrap();
        }

        let recent = repo.recent().unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].query, "query-14");
        assert_eq!(recent[9].query, "query-5");
    }

    #[test]
    fn test_delete_by_query() {
        let repo = test_repo();

        repo.insert(&search("henry", 1_000)).unwrap();
        repo.insert(&search("shearer", 2_000)).unwrap();

        repo.delete_by_query("henry").unwrap();

        let recent = repo.recent().unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].query, "shearer");
    }
}
