use crate::adapters::table::CardTable;
use crate::domain::model::Card;
use crate::domain::ports::CardStore;
use crate::utils::error::{CardError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// In-memory card store for tests and throwaway runs. Clones share the same
/// table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCardStore {
    table: Arc<Mutex<CardTable>>,
}

impl InMemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `cards`, ids assigned in order.
    pub fn with_cards(cards: impl IntoIterator<Item = Card>) -> Result<Self> {
        let mut table = CardTable::new();
        for card in cards {
            table.insert(card)?;
        }
        Ok(Self {
            table: Arc::new(Mutex::new(table)),
        })
    }

    pub fn len(&self) -> usize {
        self.table().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table(&self) -> Result<MutexGuard<'_, CardTable>> {
        self.table.lock().map_err(|_| CardError::Store {
            message: "in-memory card table lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl CardStore for InMemoryCardStore {
    async fn count_by_customer(&self, customer_id: &str) -> Result<usize> {
        Ok(self.table()?.count_by_customer(customer_id))
    }

    async fn count_by_number(&self, card_number: &str) -> Result<usize> {
        Ok(self.table()?.count_by_number(card_number))
    }

    async fn find_by_customer(&self, customer_id: &str) -> Result<Option<Card>> {
        Ok(self.table()?.find_by_customer(customer_id))
    }

    async fn find_by_number(&self, card_number: &str) -> Result<Option<Card>> {
        Ok(self.table()?.find_by_number(card_number))
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Card>> {
        Ok(self.table()?.find_by_id(id))
    }

    async fn save(&self, card: Card) -> Result<Card> {
        let saved = self.table()?.insert(card)?;
        debug!("Saved card {:?} for customer {}", saved.id, saved.customer_id);
        Ok(saved)
    }

    async fn update(&self, card: Card) -> Result<Card> {
        let updated = self.table()?.replace(card)?;
        debug!("Updated card {:?}", updated.id);
        Ok(updated)
    }

    async fn save_within_limit(&self, card: Card, max_per_customer: usize) -> Result<Card> {
        let saved = self.table()?.insert_within_limit(card, max_per_customer)?;
        debug!("Saved card {:?} for customer {}", saved.id, saved.customer_id);
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(customer_id: &str, card_number: &str) -> Card {
        Card {
            id: None,
            customer_id: customer_id.to_string(),
            limit: 1000,
            card_number: card_number.to_string(),
            expiry: "12/24".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_and_lookups() {
        let store = InMemoryCardStore::new();
        let saved = store
            .save(card("11111111111", "5200 1211 1435 1234"))
            .await
            .unwrap();
        let id = saved.id.unwrap();

        assert_eq!(store.count_by_customer("11111111111").await.unwrap(), 1);
        assert_eq!(store.count_by_number("5200 1211 1435 1234").await.unwrap(), 1);
        assert_eq!(store.count_by_number("5200121114351234").await.unwrap(), 0);
        assert_eq!(store.find_by_id(id).await.unwrap(), Some(saved.clone()));
        assert_eq!(
            store.find_by_customer("11111111111").await.unwrap(),
            Some(saved.clone())
        );
        assert_eq!(
            store.find_by_number("5200 1211 1435 1234").await.unwrap(),
            Some(saved)
        );
        assert_eq!(store.find_by_customer("22222222222").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryCardStore::new();
        let other = store.clone();
        store
            .save(card("11111111111", "5200 1211 1435 1234"))
            .await
            .unwrap();
        assert_eq!(other.len(), 1);
    }

    #[tokio::test]
    async fn test_update_without_id_fails() {
        let store = InMemoryCardStore::new();
        let err = store
            .update(card("11111111111", "5200 1211 1435 1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, CardError::Store { .. }));
    }

    #[tokio::test]
    async fn test_with_cards_seeds_table() {
        let store = InMemoryCardStore::with_cards(vec![
            card("11111111111", "0000 0000 0000 1234"),
            card("11111111111", "0000 0000 0001 1234"),
        ])
        .unwrap();
        assert_eq!(store.count_by_customer("11111111111").await.unwrap(), 2);
        assert!(store.find_by_id(2).await.unwrap().is_some());
    }
}
