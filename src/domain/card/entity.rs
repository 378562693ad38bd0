use serde::{Deserialize, Serialize};

/// Season token marking the special World Cup 2002 edition. Cards carrying
/// this season form a disjoint universe from the regular catalog (the mode
/// partition applied by every query).
pub const WC2002_SEASON: &str = "WC2002";

/// Derive the stable card identifier from season and card number.
///
/// The id is immutable once created and acts as the primary key, so the
/// same remote record always maps to the same row across syncs.
pub fn card_id(season: &str, card_number: &str) -> String {
    format!("{}-{}", season, card_number)
}

/// One football trading card, plus the user-mutable state attached to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Stable identifier: "{season}-{card_number}"
    pub id: String,

    /// Season string, e.g. "2003-04", or the WC2002 tournament token
    pub season: String,

    /// Card number within the season
    pub card_number: String,

    /// Player display name
    pub player_name: String,

    /// Team name; "N/A" when the catalog carried none
    pub team: String,

    /// Image URL, possibly empty
    pub card_image_url: String,

    /// User-mutable favorite flag
    pub is_favorite: bool,

    /// Epoch millis of the last detail view; set by the viewed transition,
    /// never cleared
    pub last_viewed_timestamp: Option<i64>,

    /// Formation slot index; None means favorited-but-unassigned.
    /// A non-null slot implies is_favorite (service-enforced).
    pub position_in_formation: Option<i64>,
}

impl Card {
    /// Build a Card from raw catalog fields, applying the sanitization the
    /// remote data needs: missing strings fall back to sentinels, blank
    /// teams become "N/A", and the id is derived from season + number.
    pub fn from_catalog(
        season: Option<&str>,
        card_number: Option<&str>,
        player_name: Option<&str>,
        team: Option<&str>,
        card_image_url: Option<&str>,
    ) -> Self {
        let season = non_blank(season).unwrap_or("Unknown").to_string();
        let card_number = non_blank(card_number).unwrap_or("Unknown").to_string();
        let player_name = non_blank(player_name).unwrap_or("Unknown Player").to_string();
        let team = non_blank(team).unwrap_or("N/A").to_string();
        let card_image_url = card_image_url.unwrap_or("").to_string();

        Self {
            id: card_id(&season, &card_number),
            season,
            card_number,
            player_name,
            team,
            card_image_url,
            is_favorite: false,
            last_viewed_timestamp: None,
            position_in_formation: None,
        }
    }

    /// Whether this card belongs to the WC2002 universe
    pub fn is_wc2002(&self) -> bool {
        self.season == WC2002_SEASON
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
