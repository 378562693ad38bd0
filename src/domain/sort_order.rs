use serde::{Deserialize, Serialize};

/// Sort orders supported by the card query engine.
///
/// Season sorts are numeric on the leading 4-digit year of the season
/// string, not lexical: "1999-00" must come after "1998-99" when sorting
/// oldest-first, which string comparison of the full token gets wrong once
/// the 2-digit suffix rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    PlayerNameAsc,
    PlayerNameDesc,
    SeasonNewest,
    SeasonOldest,
    TeamAsc,
    TeamDesc,
}

impl SortOrder {
    /// Parse a persisted settings key; unknown keys fall back to the
    /// default order rather than erroring.
    pub fn from_settings_key(key: &str) -> Self {
        match key {
            "player_name_asc" => Self::PlayerNameAsc,
            "player_name_desc" => Self::PlayerNameDesc,
            "season_newest" => Self::SeasonNewest,
            "season_oldest" => Self::SeasonOldest,
            "team_asc" => Self::TeamAsc,
            "team_desc" => Self::TeamDesc,
            _ => Self::PlayerNameAsc,
        }
    }

    pub fn settings_key(&self) -> &'static str {
        match self {
            Self::PlayerNameAsc => "player_name_asc",
            Self::PlayerNameDesc => "player_name_desc",
            Self::SeasonNewest => "season_newest",
            Self::SeasonOldest => "season_oldest",
            Self::TeamAsc => "team_asc",
            Self::TeamDesc => "team_desc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PlayerNameAsc => "Player A-Z",
            Self::PlayerNameDesc => "Player Z-A",
            Self::SeasonNewest => "Season (Newest)",
            Self::SeasonOldest => "Season (Oldest)",
            Self::TeamAsc => "Team A-Z",
            Self::TeamDesc => "Team Z-A",
        }
    }

    /// ORDER BY clause for card queries. Constant strings only; never
    /// interpolate user input here.
    pub fn sql_order_clause(&self) -> &'static str {
        match self {
            Self::PlayerNameAsc => "player_name ASC",
            Self::PlayerNameDesc => "player_name DESC",
            Self::SeasonNewest => "CAST(SUBSTR(season, 1, 4) AS INTEGER) DESC, player_name ASC",
            Self::SeasonOldest => "CAST(SUBSTR(season, 1, 4) AS INTEGER) ASC, player_name ASC",
            Self::TeamAsc => "team ASC",
            Self::TeamDesc => "team DESC",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::PlayerNameAsc
    }
}
