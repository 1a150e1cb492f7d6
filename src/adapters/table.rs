use crate::domain::model::Card;
use crate::utils::error::{CardError, Result};
use serde::{Deserialize, Serialize};

/// The card table shared by the store backends. Callers provide the locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardTable {
    next_id: u64,
    cards: Vec<Card>,
}

impl Default for CardTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CardTable {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            cards: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn count_by_customer(&self, customer_id: &str) -> usize {
        self.cards
            .iter()
            .filter(|c| c.customer_id == customer_id)
            .count()
    }

    pub fn count_by_number(&self, card_number: &str) -> usize {
        self.cards
            .iter()
            .filter(|c| c.card_number == card_number)
            .count()
    }

    /// First card issued to the customer.
    pub fn find_by_customer(&self, customer_id: &str) -> Option<Card> {
        self.cards
            .iter()
            .find(|c| c.customer_id == customer_id)
            .cloned()
    }

    pub fn find_by_number(&self, card_number: &str) -> Option<Card> {
        self.cards
            .iter()
            .find(|c| c.card_number == card_number)
            .cloned()
    }

    pub fn find_by_id(&self, id: u64) -> Option<Card> {
        self.cards.iter().find(|c| c.id == Some(id)).cloned()
    }

    pub fn insert(&mut self, mut card: Card) -> Result<Card> {
        let id = match card.id {
            Some(id) => {
                if self.find_by_id(id).is_some() {
                    return Err(CardError::Store {
                        message: format!("card id {} already exists", id),
                    });
                }
                id
            }
            None => self.next_id,
        };
        let after = id.checked_add(1).ok_or_else(|| CardError::Store {
            message: format!("card id {} leaves no room for further ids", id),
        })?;
        card.id = Some(id);
        self.next_id = self.next_id.max(after);
        self.cards.push(card.clone());
        Ok(card)
    }

    pub fn insert_within_limit(&mut self, card: Card, max_per_customer: usize) -> Result<Card> {
        if self.count_by_customer(&card.customer_id) >= max_per_customer {
            return Err(CardError::LimitExceeded {
                customer_id: card.customer_id,
                max: max_per_customer,
            });
        }
        if self.count_by_number(&card.card_number) > 0 {
            return Err(CardError::DuplicateCardNumber {
                card_number: card.card_number,
            });
        }
        self.insert(card)
    }

    /// Writes back a stored card. Only `limit` may differ from the stored row.
    pub fn replace(&mut self, card: Card) -> Result<Card> {
        let id = card.id.ok_or_else(|| CardError::Store {
            message: "Cannot update card without ID".to_string(),
        })?;

        let slot = self
            .cards
            .iter_mut()
            .find(|c| c.id == Some(id))
            .ok_or_else(|| CardError::Store {
                message: format!("Cannot update missing card {}", id),
            })?;
        if slot.customer_id != card.customer_id
            || slot.card_number != card.card_number
            || slot.expiry != card.expiry
            || slot.cvv != card.cvv
        {
            return Err(CardError::Store {
                message: format!("Only the limit of card {} may change", id),
            });
        }
        slot.limit = card.limit;
        Ok(slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(customer_id: &str, card_number: &str) -> Card {
        Card {
            id: None,
            customer_id: customer_id.to_string(),
            limit: 500,
            card_number: card_number.to_string(),
            expiry: "12/24".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let mut table = CardTable::new();
        let first = table.insert(card("11111111111", "0000 0000 0000 1234")).unwrap();
        let second = table.insert(card("22222222222", "0000 0000 0001 1234")).unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_insert_keeps_explicit_id_and_moves_counter() {
        let mut table = CardTable::new();
        let mut explicit = card("11111111111", "0000 0000 0000 1234");
        explicit.id = Some(10);
        table.insert(explicit.clone()).unwrap();
        assert!(table.insert(explicit).is_err());

        let next = table.insert(card("11111111111", "0000 0000 0001 1234")).unwrap();
        assert_eq!(next.id, Some(11));
    }

    #[test]
    fn test_insert_within_limit_guards_both_invariants() {
        let mut table = CardTable::new();
        table
            .insert_within_limit(card("11111111111", "0000 0000 0000 1234"), 2)
            .unwrap();

        let duplicate = table
            .insert_within_limit(card("22222222222", "0000 0000 0000 1234"), 2)
            .unwrap_err();
        assert!(matches!(duplicate, CardError::DuplicateCardNumber { .. }));

        table
            .insert_within_limit(card("11111111111", "0000 0000 0001 1234"), 2)
            .unwrap();
        let over = table
            .insert_within_limit(card("11111111111", "0000 0000 0002 1234"), 2)
            .unwrap_err();
        assert!(matches!(over, CardError::LimitExceeded { max: 2, .. }));
        assert_eq!(table.count_by_customer("11111111111"), 2);
    }

    #[test]
    fn test_insert_rejects_id_at_the_top_of_the_range() {
        let mut table = CardTable::new();
        let mut last = card("11111111111", "0000 0000 0000 1234");
        last.id = Some(u64::MAX);

        let err = table.insert(last).unwrap_err();
        assert!(matches!(err, CardError::Store { .. }));
        assert!(table.is_empty());

        let next = table.insert(card("11111111111", "0000 0000 0001 1234")).unwrap();
        assert_eq!(next.id, Some(1));
    }

    #[test]
    fn test_replace_only_changes_limit() {
        let mut table = CardTable::new();
        let stored = table.insert(card("11111111111", "0000 0000 0000 1234")).unwrap();
        table.insert(card("22222222222", "0000 0000 0001 1234")).unwrap();

        let mut moved = stored.clone();
        moved.card_number = "0000 0000 0001 1234".to_string();
        assert!(matches!(table.replace(moved), Err(CardError::Store { .. })));

        let mut reassigned = stored.clone();
        reassigned.customer_id = "22222222222".to_string();
        reassigned.limit = 1;
        assert!(table.replace(reassigned).is_err());

        assert_eq!(table.find_by_id(1), Some(stored));
        assert_eq!(table.count_by_number("0000 0000 0001 1234"), 1);
        assert_eq!(table.count_by_customer("22222222222"), 1);
    }

    #[test]
    fn test_replace_requires_existing_id() {
        let mut table = CardTable::new();
        assert!(table.replace(card("11111111111", "0000 0000 0000 1234")).is_err());

        let mut stored = table.insert(card("11111111111", "0000 0000 0000 1234")).unwrap();
        stored.limit = 900;
        table.replace(stored).unwrap();
        assert_eq!(table.find_by_id(1).unwrap().limit, 900);

        let mut ghost = card("11111111111", "0000 0000 0000 1234");
        ghost.id = Some(42);
        assert!(table.replace(ghost).is_err());
    }
}
