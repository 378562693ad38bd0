pub mod entity;
pub mod invariants;

pub use entity::{card_id, Card, WC2002_SEASON};
pub use invariants::validate_card;
