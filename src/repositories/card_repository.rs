// src/repositories/card_repository.rs
//
// Card persistence

use std::sync::Arc;

use rusqlite::{params, params_from_iter, Row};

use crate::db::ConnectionPool;
use crate::domain::{Card, SortOrder, WC2002_SEASON};
use crate::error::{AppError, AppResult};

const CARD_COLUMNS: &str = "id, season, card_number, player_name, team, card_image_url, \
     is_favorite, last_viewed_timestamp, position_in_formation";

/// The user-attached slice of a card row, snapshotted by catalog sync so
/// favorites and formation slots survive the full-catalog replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardUserState {
    pub id: String,
    pub is_favorite: bool,
    pub position_in_formation: Option<i64>,
}

/// A filtered, sorted view over the card table.
///
/// Every filter is optional except the mode partition: a query always sees
/// exactly one of the two card universes (WC2002 vs everything else).
/// `None`/empty allow-lists mean unrestricted.
#[derive(Debug, Clone, Default)]
pub struct CardQuery {
    /// Case-insensitive substring over player_name OR team OR season;
    /// empty matches everything
    pub text: String,
    pub sort: SortOrder,
    pub teams: Option<Vec<String>>,
    pub seasons: Option<Vec<String>>,
    pub wc2002_mode: bool,
}

impl CardQuery {
    pub fn everything(wc2002_mode: bool) -> Self {
        Self {
            wc2002_mode,
            ..Self::default()
        }
    }
}

pub trait CardRepository: Send + Sync {
    /// Insert-or-replace by id, one transaction. Does NOT delete rows
    /// absent from `cards`.
    fn upsert_all(&self, cards: &[Card]) -> AppResult<()>;
    fn get_by_id(&self, id: &str) -> AppResult<Option<Card>>;
    /// Lookup a curated id list; player-name ascending, mode partition
    /// applied. Ids absent from the store are silently skipped.
    fn get_by_ids(&self, ids: &[String], wc2002_mode: bool) -> AppResult<Vec<Card>>;
    /// `{id, is_favorite, position_in_formation}` for every row - the
    /// catalog sync merge input.
    fn all_user_state(&self) -> AppResult<Vec<CardUserState>>;
    fn set_favorite(&self, id: &str, is_favorite: bool) -> AppResult<()>;
    /// Clear favorite flag AND formation slot in a single statement, so
    /// no reader can observe assigned-but-unfavorited.
    fn unfavorite_and_clear_slot(&self, id: &str) -> AppResult<()>;
    fn set_last_viewed(&self, id: &str, timestamp: i64) -> AppResult<()>;
    fn set_position(&self, id: &str, position: Option<i64>) -> AppResult<()>;
    /// Total row count; 0 is the first-launch signal
    fn count(&self) -> AppResult<i64>;
    fn favorites(&self) -> AppResult<Vec<Card>>;
    /// One page of the dynamic query; the full query is re-issued per page
    fn query_page(&self, query: &CardQuery, offset: i64, limit: i64) -> AppResult<Vec<Card>>;
    fn query_count(&self, query: &CardQuery) -> AppResult<i64>;
    fn recently_viewed(&self, wc2002_mode: bool, limit: i64) -> AppResult<Vec<Card>>;
    fn distinct_teams(&self, wc2002_mode: bool) -> AppResult<Vec<String>>;
    fn distinct_seasons(&self, wc2002_mode: bool) -> AppResult<Vec<String>>;
    fn search_suggestions(&self, prefix: &str, limit: i64) -> AppResult<Vec<String>>;
}

pub struct SqliteCardRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCardRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_card(row: &Row) -> Result<Card, rusqlite::Error> {
        Ok(Card {
            id: row.get("id")?,
            season: row.get("season")?,
            card_number: row.get("card_number")?,
            player_name: row.get("player_name")?,
            team: row.get("team")?,
            card_image_url: row.get("card_image_url")?,
            is_favorite: row.get("is_favorite")?,
            last_viewed_timestamp: row.get("last_viewed_timestamp")?,
            position_in_formation: row.get("position_in_formation")?,
        })
    }

    /// SQL fragment selecting exactly one card universe
    fn mode_clause(wc2002_mode: bool) -> &'static str {
        if wc2002_mode {
            "season = ?"
        } else {
            "season != ?"
        }
    }

    /// Compose the WHERE clause for a CardQuery: each filter contributes a
    /// clause only when present, the mode partition always does.
    fn build_where(query: &CardQuery) -> (String, Vec<String>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if !query.text.is_empty() {
            clauses.push(
                "(player_name LIKE '%' || ? || '%' \
                 OR team LIKE '%' || ? || '%' \
                 OR season LIKE '%' || ? || '%')"
                    .to_string(),
            );
            params.push(query.text.clone());
            params.push(query.text.clone());
            params.push(query.text.clone());
        }

        if let Some(teams) = query.teams.as_ref().filter(|t| !t.is_empty()) {
            clauses.push(format!("team IN ({})", placeholders(teams.len())));
            params.extend(teams.iter().cloned());
        }

        if let Some(seasons) = query.seasons.as_ref().filter(|s| !s.is_empty()) {
            clauses.push(format!("season IN ({})", placeholders(seasons.len())));
            params.extend(seasons.iter().cloned());
        }

        clauses.push(Self::mode_clause(query.wc2002_mode).to_string());
        params.push(WC2002_SEASON.to_string());

        (clauses.join(" AND "), params)
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

impl CardRepository for SqliteCardRepository {
    fn upsert_all(&self, cards: &[Card]) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO cards (
                    id, season, card_number, player_name, team, card_image_url,
                    is_favorite, last_viewed_timestamp, position_in_formation
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for card in cards {
                stmt.execute(params![
                    card.id,
                    card.season,
                    card.card_number,
                    card.player_name,
                    card.team,
                    card.card_image_url,
                    card.is_favorite,
                    card.last_viewed_timestamp,
                    card.position_in_formation,
                ])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    fn get_by_id(&self, id: &str) -> AppResult<Option<Card>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare(&format!("SELECT {} FROM cards WHERE id = ?1", CARD_COLUMNS))?;

        match stmt.query_row(params![id], Self::row_to_card) {
            Ok(card) => Ok(Some(card)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_by_ids(&self, ids: &[String], wc2002_mode: bool) -> AppResult<Vec<Card>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.pool.get()?;

        let sql = format!(
            "SELECT {} FROM cards WHERE id IN ({}) AND {} ORDER BY player_name ASC",
            CARD_COLUMNS,
            placeholders(ids.len()),
            Self::mode_clause(wc2002_mode),
        );

        let mut params: Vec<String> = ids.to_vec();
        params.push(WC2002_SEASON.to_string());

        let mut stmt = conn.prepare(&sql)?;
        let cards: Vec<Card> = stmt
            .query_map(params_from_iter(params), Self::row_to_card)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cards)
    }

    fn all_user_state(&self) -> AppResult<Vec<CardUserState>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare("SELECT id, is_favorite, position_in_formation FROM cards")?;

        let states: Vec<CardUserState> = stmt
            .query_map([], |row| {
                Ok(CardUserState {
                    id: row.get(0)?,
                    is_favorite: row.get(1)?,
                    position_in_formation: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(states)
    }

    fn set_favorite(&self, id: &str, is_favorite: bool) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE cards SET is_favorite = ?1 WHERE id = ?2",
            params![is_favorite, id],
        )?;
        Ok(())
    }

    fn unfavorite_and_clear_slot(&self, id: &str) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE cards SET is_favorite = 0, position_in_formation = NULL WHERE id = ?1",
            params![id],
        )?;
        Ok(())
    }

    fn set_last_viewed(&self, id: &str, timestamp: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE cards SET last_viewed_timestamp = ?1 WHERE id = ?2",
            params![timestamp, id],
        )?;
        Ok(())
    }

    fn set_position(&self, id: &str, position: Option<i64>) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE cards SET position_in_formation = ?1 WHERE id = ?2",
            params![position, id],
        )?;
        Ok(())
    }

    fn count(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(id) FROM cards", [], |row| row.get(0))?;
        Ok(count)
    }

    fn favorites(&self) -> AppResult<Vec<Card>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM cards WHERE is_favorite = 1 ORDER BY player_name ASC",
            CARD_COLUMNS
        ))?;

        let cards: Vec<Card> = stmt
            .query_map([], Self::row_to_card)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cards)
    }

    fn query_page(&self, query: &CardQuery, offset: i64, limit: i64) -> AppResult<Vec<Card>> {
        let conn = self.pool.get()?;

        let (where_clause, params) = Self::build_where(query);
        let sql = format!(
            "SELECT {} FROM cards WHERE {} ORDER BY {} LIMIT {} OFFSET {}",
            CARD_COLUMNS,
            where_clause,
            query.sort.sql_order_clause(),
            limit,
            offset,
        );

        let mut stmt = conn.prepare(&sql)?;
        let cards: Vec<Card> = stmt
            .query_map(params_from_iter(params), Self::row_to_card)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cards)
    }

    fn query_count(&self, query: &CardQuery) -> AppResult<i64> {
        let conn = self.pool.get()?;

        let (where_clause, params) = Self::build_where(query);
        let sql = format!("SELECT COUNT(id) FROM cards WHERE {}", where_clause);

        let count: i64 =
            conn.query_row(&sql, params_from_iter(params), |row| row.get(0))?;

        Ok(count)
    }

    fn recently_viewed(&self, wc2002_mode: bool, limit: i64) -> AppResult<Vec<Card>> {
        let conn = self.pool.get()?;

        let sql = format!(
            "SELECT {} FROM cards
             WHERE last_viewed_timestamp IS NOT NULL AND {}
             ORDER BY last_viewed_timestamp DESC
             LIMIT {}",
            CARD_COLUMNS,
            Self::mode_clause(wc2002_mode),
            limit,
        );

        let mut stmt = conn.prepare(&sql)?;
        let cards: Vec<Card> = stmt
            .query_map(params![WC2002_SEASON], Self::row_to_card)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cards)
    }

    fn distinct_teams(&self, wc2002_mode: bool) -> AppResult<Vec<String>> {
        let conn = self.pool.get()?;

        let sql = format!(
            "SELECT DISTINCT team FROM cards WHERE team != 'N/A' AND {} ORDER BY team ASC",
            Self::mode_clause(wc2002_mode),
        );

        let mut stmt = conn.prepare(&sql)?;
        let teams: Vec<String> = stmt
            .query_map(params![WC2002_SEASON], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(teams)
    }

    fn distinct_seasons(&self, wc2002_mode: bool) -> AppResult<Vec<String>> {
        let conn = self.pool.get()?;

        let sql = format!(
            "SELECT DISTINCT season FROM cards WHERE {} ORDER BY season DESC",
            Self::mode_clause(wc2002_mode),
        );

        let mut stmt = conn.prepare(&sql)?;
        let seasons: Vec<String> = stmt
            .query_map(params![WC2002_SEASON], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(seasons)
    }

    fn search_suggestions(&self, prefix: &str, limit: i64) -> AppResult<Vec<String>> {
        let conn = self.pool.get()?;

        let sql = format!(
            "SELECT DISTINCT player_name FROM cards
             WHERE player_name LIKE ?1 || '%'
             ORDER BY player_name ASC
             LIMIT {}",
            limit,
        );

        let mut stmt = conn.prepare(&sql)?;
        let names: Vec<String> = stmt
            .query_map(params![prefix], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, initialize_database};

    fn test_repo() -> SqliteCardRepository {
        let pool = create_test_pool().unwrap();
        {
            let conn = pool.get().unwrap();
            initialize_database(&conn).unwrap();
        }
        SqliteCardRepository::new(Arc::new(pool))
    }

    fn card(season: &str, number: &str, name: &str, team: &str) -> Card {
        Card::from_catalog(Some(season), Some(number), Some(name), Some(team), None)
    }

    fn seed(repo: &SqliteCardRepository) {
        repo.upsert_all(&[
            card("2003-04", "6", "Thierry Henry", "Arsenal"),
            card("1998-99", "7", "Dennis Bergkamp", "Arsenal"),
            card("1999-00", "337", "Alan Shearer", "Newcastle United"),
            card("2000-01", "1", "David Seaman", "Arsenal"),
            card("WC2002", "184", "Ronaldo", "Brazil"),
            card("WC2002", "38", "Zinedine Zidane", "France"),
        ])
        .unwrap();
    }

    #[test]
    fn test_upsert_and_get() {
        let repo = test_repo();
        seed(&repo);

        let henry = repo.get_by_id("2003-04-6").unwrap().unwrap();
        assert_eq!(henry.player_name, "Thierry Henry");
        assert_eq!(henry.team, "Arsenal");
        assert!(!henry.is_favorite);

        assert!(repo.get_by_id("missing").unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 6);
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let repo = test_repo();
        seed(&repo);

        let mut updated = card("2003-04", "6", "Thierry Henry", "Arsenal FC");
        updated.card_image_url = "http://img".to_string();
        repo.upsert_all(std::slice::from_ref(&updated)).unwrap();

        let henry = repo.get_by_id("2003-04-6").unwrap().unwrap();
        assert_eq!(henry.team, "Arsenal FC");
        assert_eq!(henry.card_image_url, "http://img");
        assert_eq!(repo.count().unwrap(), 6);
    }

    #[test]
    fn test_user_state_snapshot() {
        let repo = test_repo();
        seed(&repo);

        repo.set_favorite("2003-04-6", true).unwrap();
        repo.set_position("2003-04-6", Some(3)).unwrap();

        let states = repo.all_user_state().unwrap();
        assert_eq!(states.len(), 6);

        let henry = states.iter().find(|s| s.id == "2003-04-6").unwrap();
        assert!(henry.is_favorite);
        assert_eq!(henry.position_in_formation, Some(3));

        let ronaldo = states.iter().find(|s| s.id == "WC2002-184").unwrap();
        assert!(!ronaldo.is_favorite);
        assert_eq!(ronaldo.position_in_formation, None);
    }

    #[test]
    fn test_unfavorite_and_clear_slot_is_one_update() {
        let repo = test_repo();
        seed(&repo);

        repo.set_favorite("2003-04-6", true).unwrap();
        repo.set_position("2003-04-6", Some(5)).unwrap();

        repo.unfavorite_and_clear_slot("2003-04-6").unwrap();

        let henry = repo.get_by_id("2003-04-6").unwrap().unwrap();
        assert!(!henry.is_favorite);
        assert_eq!(henry.position_in_formation, None);
    }

    #[test]
    fn test_favorites_sorted_by_player_name() {
        let repo = test_repo();
        seed(&repo);

        repo.set_favorite("2003-04-6", true).unwrap();
        repo.set_favorite("1998-99-7", true).unwrap();

        let favorites = repo.favorites().unwrap();
        let names: Vec<&str> = favorites.iter().map(|c| c.player_name.as_str()).collect();
        assert_eq!(names, vec!["Dennis Bergkamp", "Thierry Henry"]);
    }

    #[test]
    fn test_mode_partition_is_disjoint_and_complete() {
        let repo = test_repo();
        seed(&repo);

        let regular = repo.query_page(&CardQuery::everything(false), 0, 100).unwrap();
        let wc = repo.query_page(&CardQuery::everything(true), 0, 100).unwrap();

        assert_eq!(regular.len(), 4);
        assert_eq!(wc.len(), 2);
        assert!(regular.iter().all(|c| c.season != "WC2002"));
        assert!(wc.iter().all(|c| c.season == "WC2002"));
        assert_eq!(regular.len() + wc.len(), repo.count().unwrap() as usize);
    }

    #[test]
    fn test_text_filter_matches_name_team_and_season() {
        let repo = test_repo();
        seed(&repo);

        let by_name = repo
            .query_page(
                &CardQuery {
                    text: "henry".to_string(),
                    ..CardQuery::everything(false)
                },
                0,
                100,
            )
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "2003-04-6");

        let by_team = repo
            .query_page(
                &CardQuery {
                    text: "arsenal".to_string(),
                    ..CardQuery::everything(false)
                },
                0,
                100,
            )
            .unwrap();
        assert_eq!(by_team.len(), 3);

        let by_season = repo
            .query_page(
                &CardQuery {
                    text: "1999".to_string(),
                    ..CardQuery::everything(false)
                },
                0,
                100,
            )
            .unwrap();
        assert_eq!(by_season.len(), 1);
        assert_eq!(by_season[0].id, "1999-00-337");
    }

    #[test]
    fn test_allow_list_filters() {
        let repo = test_repo();
        seed(&repo);

        let arsenal = repo
            .query_page(
                &CardQuery {
                    teams: Some(vec!["Arsenal".to_string()]),
                    ..CardQuery::everything(false)
                },
                0,
                100,
            )
            .unwrap();
        assert_eq!(arsenal.len(), 3);

        // Values absent from the store simply match nothing
        let unknown = repo
            .query_page(
                &CardQuery {
                    teams: Some(vec!["Real Madrid".to_string()]),
                    ..CardQuery::everything(false)
                },
                0,
                100,
            )
            .unwrap();
        assert!(unknown.is_empty());

        // Empty list means unrestricted
        let unrestricted = repo
            .query_page(
                &CardQuery {
                    teams: Some(Vec::new()),
                    ..CardQuery::everything(false)
                },
                0,
                100,
            )
            .unwrap();
        assert_eq!(unrestricted.len(), 4);
    }

    #[test]
    fn test_season_sort_is_numeric_on_year_prefix() {
        let repo = test_repo();
        seed(&repo);

        let oldest = repo
            .query_page(
                &CardQuery {
                    sort: SortOrder::SeasonOldest,
                    ..CardQuery::everything(false)
                },
                0,
                100,
            )
            .unwrap();
        let seasons: Vec<&str> = oldest.iter().map(|c| c.season.as_str()).collect();
        assert_eq!(seasons, vec!["1998-99", "1999-00", "2000-01", "2003-04"]);

        let newest = repo
            .query_page(
                &CardQuery {
                    sort: SortOrder::SeasonNewest,
                    ..CardQuery::everything(false)
                },
                0,
                100,
            )
            .unwrap();
        let seasons: Vec<&str> = newest.iter().map(|c| c.season.as_str()).collect();
        assert_eq!(seasons, vec!["2003-04", "2000-01", "1999-00", "1998-99"]);
    }

    #[test]
    fn test_pagination_windows() {
        let repo = test_repo();
        seed(&repo);

        let query = CardQuery::everything(false); // 4 cards, player-name ASC

        let page1 = repo.query_page(&query, 0, 2).unwrap();
        let page2 = repo.query_page(&query, 2, 2).unwrap();
        let page3 = repo.query_page(&query, 4, 2).unwrap();

        assert_eq!(page1.len(), 2);
        assert_eq!(page2.len(), 2);
        assert!(page3.is_empty());

        assert_eq!(page1[0].player_name, "Alan Shearer");
        assert_eq!(page1[1].player_name, "David Seaman");
        assert_eq!(page2[0].player_name, "Dennis Bergkamp");
        assert_eq!(page2[1].player_name, "Thierry Henry");

        assert_eq!(repo.query_count(&query).unwrap(), 4);
    }

    #[test]
    fn test_get_by_ids_respects_mode_partition() {
        let repo = test_repo();
        seed(&repo);

        let ids = vec![
            "2003-04-6".to_string(),
            "WC2002-184".to_string(),
            "missing".to_string(),
        ];

        let regular = repo.get_by_ids(&ids, false).unwrap();
        assert_eq!(regular.len(), 1);
        assert_eq!(regular[0].id, "2003-04-6");

        let wc = repo.get_by_ids(&ids, true).unwrap();
        assert_eq!(wc.len(), 1);
        assert_eq!(wc[0].id, "WC2002-184");
    }

    #[test]
    fn test_recently_viewed_ordering_and_limit() {
        let repo = test_repo();
        seed(&repo);

        repo.set_last_viewed("2003-04-6", 3_000).unwrap();
        repo.set_last_viewed("1998-99-7", 1_000).unwrap();
        repo.set_last_viewed("1999-00-337", 2_000).unwrap();
        repo.set_last_viewed("WC2002-184", 9_000).unwrap();

        let recent = repo.recently_viewed(false, 20).unwrap();
        let ids: Vec<&str> = recent.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2003-04-6", "1999-00-337", "1998-99-7"]);

        let capped = repo.recently_viewed(false, 2).unwrap();
        assert_eq!(capped.len(), 2);

        let wc = repo.recently_viewed(true, 20).unwrap();
        assert_eq!(wc.len(), 1);
        assert_eq!(wc[0].id, "WC2002-184");
    }

    #[test]
    fn test_distinct_teams_excludes_sentinel() {
        let repo = test_repo();
        seed(&repo);
        repo.upsert_all(&[Card::from_catalog(Some("2004-05"), Some("99"), Some("Mystery Man"), None, None)])
            .unwrap();

        let teams = repo.distinct_teams(false).unwrap();
        assert_eq!(teams, vec!["Arsenal", "Newcastle United"]);

        let wc_teams = repo.distinct_teams(true).unwrap();
        assert_eq!(wc_teams, vec!["Brazil", "France"]);
    }

    #[test]
    fn test_distinct_seasons_descending() {
        let repo = test_repo();
        seed(&repo);

        let seasons = repo.distinct_seasons(false).unwrap();
        assert_eq!(seasons, vec!["2003-04", "2000-01", "1999-00", "1998-99"]);
    }

    #[test]
    fn test_search_suggestions_prefix_match() {
        let repo = test_repo();
        seed(&repo);

        let suggestions = repo.search_suggestions("D", 10).unwrap();
        assert_eq!(suggestions, vec!["David Seaman", "Dennis Bergkamp"]);

        let limited = repo.search_suggestions("D", 1).unwrap();
        assert_eq!(limited, vec!["David Seaman"]);

        assert!(repo.search_suggestions("xyz", 10).unwrap().is_empty());
    }
}
