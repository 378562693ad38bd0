use serde::{Deserialize, Serialize};

/// Tactical formation shapes for the starting XI.
///
/// Slot indices are positional: 0 is the goalkeeper, then defenders,
/// midfielders and forwards row by row. Changing the active shape never
/// rewrites stored slot indices; cards keep their number and a slot that
/// falls outside the new shape's range is simply not rendered (reported by
/// FormationService::orphaned_slots).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Formation {
    F442,
    F433,
    F343,
    F352,
    F451,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationRow {
    Goalkeeper,
    Defenders,
    Midfielders,
    Forwards,
}

impl Formation {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::F442 => "4-4-2",
            Self::F433 => "4-3-3",
            Self::F343 => "3-4-3",
            Self::F352 => "3-5-2",
            Self::F451 => "4-5-1",
        }
    }

    pub fn defenders(&self) -> i64 {
        match self {
            Self::F442 | Self::F433 | Self::F451 => 4,
            Self::F343 | Self::F352 => 3,
        }
    }

    pub fn midfielders(&self) -> i64 {
        match self {
            Self::F442 | Self::F343 => 4,
            Self::F433 => 3,
            Self::F352 | Self::F451 => 5,
        }
    }

    pub fn forwards(&self) -> i64 {
        match self {
            Self::F442 | Self::F352 => 2,
            Self::F433 | Self::F343 => 3,
            Self::F451 => 1,
        }
    }

    /// Total slot count including the goalkeeper
    pub fn slot_count(&self) -> i64 {
        1 + self.defenders() + self.midfielders() + self.forwards()
    }

    /// Which row a slot index belongs to, or None when the index is
    /// outside this shape (an orphaned assignment).
    pub fn row_of(&self, slot: i64) -> Option<FormationRow> {
        if slot < 0 || slot >= self.slot_count() {
            return None;
        }
        if slot == 0 {
            Some(FormationRow::Goalkeeper)
        } else if slot <= self.defenders() {
            Some(FormationRow::Defenders)
        } else if slot <= self.defenders() + self.midfielders() {
            Some(FormationRow::Midfielders)
        } else {
            Some(FormationRow::Forwards)
        }
    }
}

impl Default for Formation {
    fn default() -> Self {
        Self::F442
    }
}
