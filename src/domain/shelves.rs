//! Curated, hand-authored shelf id lists for the browse surfaces.
//!
//! Each shelf exists in both universes: the regular catalog and the WC2002
//! tournament edition. `shelf_ids` returns the id list for a shelf in the
//! requested mode, or None when the shelf is query-backed in that mode
//! (recently-viewed in the regular catalog reads live view timestamps).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShelfKind {
    RecentlyViewed,
    Featured,
    GoldenBootWinners,
    ClubLegends,
    YoungStars,
    PremierLeagueIcons,
    ForgottenHeroes,
}

impl ShelfKind {
    pub fn title(&self, wc2002_mode: bool) -> &'static str {
        if wc2002_mode {
            match self {
                Self::RecentlyViewed => "Ireland at WC2002",
                Self::Featured => "Tournament Icons",
                Self::GoldenBootWinners => "Golden Boot Race",
                Self::ClubLegends => "Premier League Stars",
                Self::YoungStars => "Young Talents",
                Self::PremierLeagueIcons => "Group of Death",
                Self::ForgottenHeroes => "Surprise Packages",
            }
        } else {
            match self {
                Self::RecentlyViewed => "Recently Viewed",
                Self::Featured => "Featured Players",
                Self::GoldenBootWinners => "Golden Boot Winners",
                Self::ClubLegends => "Club Legends",
                Self::YoungStars => "Young Stars",
                Self::PremierLeagueIcons => "Premier League Icons",
                Self::ForgottenHeroes => "Forgotten Heroes",
            }
        }
    }
}

/// Id list backing a shelf in the given mode; None when the shelf is
/// query-backed rather than hand-authored.
pub fn shelf_ids(kind: ShelfKind, wc2002_mode: bool) -> Option<&'static [&'static str]> {
    if wc2002_mode {
        Some(match kind {
            ShelfKind::RecentlyViewed => IRELAND_AT_WC2002,
            ShelfKind::Featured => TOURNAMENT_ICONS,
            ShelfKind::GoldenBootWinners => GOLDEN_BOOT_RACE,
            ShelfKind::ClubLegends => PREMIER_LEAGUE_STARS,
            ShelfKind::YoungStars => YOUNG_TALENTS,
            ShelfKind::PremierLeagueIcons => GROUP_OF_DEATH,
            ShelfKind::ForgottenHeroes => SURPRISE_PACKAGES,
        })
    } else {
        match kind {
            ShelfKind::RecentlyViewed => None,
            ShelfKind::Featured => Some(FEATURED_SHELF),
            ShelfKind::GoldenBootWinners => Some(GOLDEN_BOOT_WINNERS),
            ShelfKind::ClubLegends => Some(MANU_LEGENDS),
            ShelfKind::YoungStars => Some(YOUNG_STARS),
            ShelfKind::PremierLeagueIcons => Some(PREMIER_LEAGUE_ICONS),
            ShelfKind::ForgottenHeroes => Some(FORGOTTEN_HEROES),
        }
    }
}

pub const FEATURED_SHELF: &[&str] = &[
    "2003-04-6",   // Thierry Henry
    "1999-00-337", // Alan Shearer
    "1998-99-7",   // Dennis Bergkamp
    "2002-03-24",  // Patrick Vieira
    "2004-05-187", // Frank Lampard
    "2005-06-239", // Steven Gerrard
    "2004-05-176", // John Terry
    "1999-00-85",  // Gianfranco Zola
    "1999-00-389", // Matt Le Tissier
    "1998-99-14",  // Tony Adams
];

pub const GOLDEN_BOOT_WINNERS: &[&str] = &[
    "1998-99-273", // Michael Owen
    "1999-00-285", // Dwight Yorke
    "1998-99-215", // Jimmy Floyd Hasselbaink
    "1999-00-415", // Kevin Phillips
    "2002-03-357", // Ruud van Nistelrooy
    "2006-07-151", // Didier Drogba
    "1998-99-155", // Dion Dublin
    "2004-05-28",  // Thierry Henry
];

pub const MANU_LEGENDS: &[&str] = &[
    "1999-00-293", // David Beckham
    "2003-04-401", // Ryan Giggs
    "1999-00-295", // Paul Scholes
    "1999-00-294", // Roy Keane
    "1998-99-274", // Peter Schmeichel
    "1999-00-289", // Jaap Stam
    "2006-07-282", // Rio Ferdinand
    "1999-00-300", // Ole Gunnar Solskjaer
    "2005-06-312", // Wayne Rooney
    "2006-07-287", // Cristiano Ronaldo
];

pub const YOUNG_STARS: &[&str] = &[
    "2002-03-226", // Wayne Rooney
    "2003-04-385", // Cristiano Ronaldo
    "2004-05-17",  // Cesc Fabregas
    "1999-00-252", // Steven Gerrard
    "1999-00-504", // Joe Cole
    "1998-99-71",  // Damien Duff
    "2003-04-276", // James Milner
    "2005-06-436", // Aaron Lennon
    "2006-07-27",  // Theo Walcott
    "1999-00-495", // Rio Ferdinand
];

pub const PREMIER_LEAGUE_ICONS: &[&str] = &[
    "1999-00-507", // Paolo Di Canio
    "1999-00-453", // David Ginola
    "1999-00-255", // Robbie Fowler
    "2002-03-135", // Jay-Jay Okocha
    "1999-00-196", // Lucas Radebe
    "1999-00-330", // Juninho Paulista
    "2002-03-330", // Peter Schmeichel
    "1999-00-440", // Sol Campbell
    "2003-04-470", // Teddy Sheringham
];

pub const FORGOTTEN_HEROES: &[&str] = &[
    "2002-03-109", // Tugay
    "1999-00-363", // Benito Carbone
    "1998-99-101", // Clive Mendonca
    "1998-99-163", // Paulo Wanchope
    "2004-05-222", // Andy Johnson
    "2003-04-138", // Kevin Davies
    "2002-03-230", // Steed Malbranque
    "1998-99-48",  // Stan Collymore
    "2005-06-106", // Morten Gamst Pedersen
    "1999-00-67",  // Peter Beagrie
];

pub const TOURNAMENT_ICONS: &[&str] = &[
    "WC2002-184", // Ronaldo (Brazil)
    "WC2002-315", // Oliver Kahn (Germany)
    "WC2002-38",  // Zinedine Zidane (France)
    "WC2002-307", // Figo (Portugal)
    "WC2002-183", // Rivaldo (Brazil)
    "WC2002-430", // David Beckham (England)
    "WC2002-176", // Roberto Carlos (Brazil)
    "WC2002-321", // Michael Ballack (Germany)
    "WC2002-460", // Paolo Maldini (Italy)
];

pub const PREMIER_LEAGUE_STARS: &[&str] = &[
    "WC2002-41",  // Thierry Henry (Arsenal / France)
    "WC2002-35",  // Patrick Vieira (Arsenal / France)
    "WC2002-427", // Rio Ferdinand (Leeds United / England)
    "WC2002-435", // Michael Owen (Liverpool / England)
    "WC2002-428", // Sol Campbell (Arsenal / England)
    "WC2002-450", // Fredrik Ljungberg (Arsenal / Sweden)
    "WC2002-395", // Juan Sebastian Veron (Manchester United / Argentina)
    "WC2002-27",  // Fabien Barthez (Manchester United / France)
    "WC2002-365", // Robbie Keane (Leeds United / Republic of Ireland)
    "WC2002-418", // Nwankwo Kanu (Arsenal / Nigeria)
];

pub const SURPRISE_PACKAGES: &[&str] = &[
    "WC2002-59",  // El-Hadji Diouf (Senegal)
    "WC2002-51",  // Pape Bouba Diop (Senegal)
    "WC2002-189", // Rustu Recber (Turkey)
    "WC2002-204", // Hakan Sukur (Turkey)
    "WC2002-202", // Hasan Sas (Turkey)
    "WC2002-253", // Ahn Jung-Hwan (Korea Republic)
    "WC2002-251", // Park Ji-Sung (Korea Republic)
    "WC2002-291", // Landon Donovan (USA)
    "WC2002-279", // Brad Friedel (USA)
];

pub const GROUP_OF_DEATH: &[&str] = &[
    "WC2002-402", // Hernan Crespo (Argentina)
    "WC2002-430", // David Beckham (England)
    "WC2002-414", // Jay-Jay Okocha (Nigeria)
    "WC2002-454", // Henrik Larsson (Sweden)
    "WC2002-435", // Michael Owen (England)
    "WC2002-395", // Juan Sebastian Veron (Argentina)
    "WC2002-418", // Nwankwo Kanu (Nigeria)
    "WC2002-450", // Fredrik Ljungberg (Sweden)
];

pub const GOLDEN_BOOT_RACE: &[&str] = &[
    "WC2002-184", // Ronaldo (Brazil)
    "WC2002-183", // Rivaldo (Brazil)
    "WC2002-320", // Miroslav Klose (Germany)
    "WC2002-291", // Jon Dahl Tomasson (Denmark)
    "WC2002-473", // Christian Vieri (Italy)
    "WC2002-176", // Ronaldinho (Brazil)
    "WC2002-435", // Michael Owen (England)
    "WC2002-204", // Hakan Sukur (Turkey)
];

pub const YOUNG_TALENTS: &[&str] = &[
    "WC2002-291", // Landon Donovan (USA)
    "WC2002-299", // Roque Santa Cruz (Paraguay)
    "WC2002-293", // John O'Brien (USA)
    "WC2002-292", // DaMarcus Beasley (USA)
    "WC2002-320", // Miroslav Klose (Germany)
    "WC2002-251", // Park Ji-Sung (Korea)
    "WC2002-253", // Ahn Jung-hwan (South Korea)
];

pub const IRELAND_AT_WC2002: &[&str] = &[
    "WC2002-365", // Robbie Keane
    "WC2002-369", // Damien Duff
    "WC2002-362", // Steve Finnan
    "WC2002-368", // Matt Holland
    "WC2002-364", // Ian Harte
];

/// First N ids of the featured shelf drive the home carousel
pub const CAROUSEL_SIZE: usize = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shelf_has_ids_in_wc2002_mode() {
        for kind in [
            ShelfKind::RecentlyViewed,
            ShelfKind::Featured,
            ShelfKind::GoldenBootWinners,
            ShelfKind::ClubLegends,
            ShelfKind::YoungStars,
            ShelfKind::PremierLeagueIcons,
            ShelfKind::ForgottenHeroes,
        ] {
            let ids = shelf_ids(kind, true).expect("WC2002 shelves are all hand-authored");
            assert!(!ids.is_empty());
            assert!(ids.iter().all(|id| id.starts_with("WC2002-")));
        }
    }

    #[test]
    fn test_recently_viewed_is_query_backed_in_default_mode() {
        assert!(shelf_ids(ShelfKind::RecentlyViewed, false).is_none());
        assert!(shelf_ids(ShelfKind::Featured, false).is_some());
    }

    #[test]
    fn test_default_shelves_never_reference_wc2002() {
        for kind in [
            ShelfKind::Featured,
            ShelfKind::GoldenBootWinners,
            ShelfKind::ClubLegends,
            ShelfKind::YoungStars,
            ShelfKind::PremierLeagueIcons,
            ShelfKind::ForgottenHeroes,
        ] {
            let ids = shelf_ids(kind, false).unwrap();
            assert!(ids.iter().all(|id| !id.starts_with("WC2002-")));
        }
    }
}
