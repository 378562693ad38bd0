use super::entity::{card_id, Card};
use crate::domain::{DomainError, DomainResult};

/// Validates all Card invariants
/// These are the absolute rules that must hold for a Card to be valid
pub fn validate_card(card: &Card) -> DomainResult<()> {
    validate_id(card)?;
    validate_assignment(card)?;
    Ok(())
}

/// The id must be non-empty and must match its derivation
fn validate_id(card: &Card) -> DomainResult<()> {
    if card.id.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Card id cannot be empty".to_string(),
        ));
    }
    if card.id != card_id(&card.season, &card.card_number) {
        return Err(DomainError::InvariantViolation(format!(
            "Card id '{}' does not match season '{}' and number '{}'",
            card.id, card.season, card.card_number
        )));
    }
    Ok(())
}

/// A card holding a formation slot must be favorited
fn validate_assignment(card: &Card) -> DomainResult<()> {
    if card.position_in_formation.is_some() && !card.is_favorite {
        return Err(DomainError::InvariantViolation(format!(
            "Card '{}' is assigned to a slot but not favorited",
            card.id
        )));
    }
    Ok(())
}

/// Invariants that must hold true for the Card domain:
///
/// 1. Identity is immutable and derived from (season, card_number)
/// 2. Non-null slot indices are unique across all cards at any instant
///    (enforced by FormationService, not by the store)
/// 3. Assigned implies favorited
/// 4. last_viewed_timestamp is only ever set, never cleared
