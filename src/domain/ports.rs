use crate::domain::model::Card;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Durable storage of cards. Each call is atomic on its own; nothing is
/// promised across calls except by `save_within_limit`.
#[async_trait]
pub trait CardStore: Send + Sync {
    async fn count_by_customer(&self, customer_id: &str) -> Result<usize>;
    async fn count_by_number(&self, card_number: &str) -> Result<usize>;
    async fn find_by_customer(&self, customer_id: &str) -> Result<Option<Card>>;
    async fn find_by_number(&self, card_number: &str) -> Result<Option<Card>>;
    async fn find_by_id(&self, id: u64) -> Result<Option<Card>>;

    /// Stores the card, assigning an id when it has none.
    async fn save(&self, card: Card) -> Result<Card>;

    /// Replaces a stored card. The card must carry the id of an existing row.
    async fn update(&self, card: Card) -> Result<Card>;

    /// Inserts the card only if its customer holds fewer than
    /// `max_per_customer` cards and its number is not stored yet. Both checks
    /// and the insert happen under one lock.
    async fn save_within_limit(&self, card: Card, max_per_customer: usize) -> Result<Card>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityStatus {
    Valid,
    Invalid,
}

/// External identity check. An unreachable service is reported as
/// `CardError::TransportFailure`, never as `IdentityStatus::Invalid`.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, customer_id: &str) -> Result<IdentityStatus>;
}
