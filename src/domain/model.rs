use crate::utils::error::Result;
use crate::utils::validation::{validate_digits, validate_expiry, validate_positive, Validate};
use serde::{Deserialize, Serialize};

pub const CUSTOMER_ID_DIGITS: usize = 11;
pub const CVV_DIGITS: usize = 3;

/// A request for a new card. Never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardApplication {
    pub customer_id: String,
    pub limit: u64,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl Validate for CardApplication {
    /// Field-level invariants. The card number is checked separately by the
    /// codec and suffix policy so each failure keeps its own error kind.
    fn validate(&self) -> Result<()> {
        validate_digits("customer_id", &self.customer_id, CUSTOMER_ID_DIGITS)?;
        validate_positive("limit", self.limit)?;
        validate_expiry("expiry", &self.expiry)?;
        validate_digits("cvv", &self.cvv, CVV_DIGITS)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Assigned by the store on first save.
    pub id: Option<u64>,
    pub customer_id: String,
    pub limit: u64,
    /// Canonical form: `dddd dddd dddd dddd`.
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl Card {
    pub fn from_application(application: CardApplication, canonical_number: String) -> Self {
        Self {
            id: None,
            customer_id: application.customer_id,
            limit: application.limit,
            card_number: canonical_number,
            expiry: application.expiry,
            cvv: application.cvv,
        }
    }
}

/// Which card a limit update targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardKey {
    Id(u64),
    Customer(String),
}

impl std::fmt::Display for CardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardKey::Id(id) => write!(f, "id {}", id),
            CardKey::Customer(customer_id) => write!(f, "customer {}", customer_id),
        }
    }
}

/// Outcome of a limit update. A missing target is a normal result here,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitUpdate {
    Updated(Card),
    NotFound,
}

impl LimitUpdate {
    pub fn card(&self) -> Option<&Card> {
        match self {
            LimitUpdate::Updated(card) => Some(card),
            LimitUpdate::NotFound => None,
        }
    }

    /// The update endpoint answers 200 either way; a missing card is sent
    /// back as a null body.
    pub fn status_code(&self) -> u16 {
        200
    }
}
