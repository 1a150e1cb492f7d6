use crate::core::codec;
use crate::core::suffix::SuffixPolicy;
use crate::domain::model::{Card, CardApplication, CardKey, LimitUpdate, CUSTOMER_ID_DIGITS};
use crate::domain::ports::{CardStore, IdentityStatus, IdentityVerifier};
use crate::utils::error::{CardError, Result};
use crate::utils::validation::{validate_digits, Validate};

pub const DEFAULT_MAX_CARDS_PER_CUSTOMER: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuancePolicy {
    pub suffix: SuffixPolicy,
    pub max_cards_per_customer: usize,
}

impl Default for IssuancePolicy {
    fn default() -> Self {
        Self {
            suffix: SuffixPolicy::default(),
            max_cards_per_customer: DEFAULT_MAX_CARDS_PER_CUSTOMER,
        }
    }
}

/// Decides on card applications and limit changes.
///
/// The service keeps no state between calls. The count checks in `issue`
/// give early, specific rejections; the store re-checks both invariants
/// atomically on insert, so concurrent applications cannot push a customer
/// past the limit.
pub struct IssuanceService<S: CardStore, V: IdentityVerifier> {
    store: S,
    verifier: V,
    policy: IssuancePolicy,
}

impl<S: CardStore, V: IdentityVerifier> IssuanceService<S, V> {
    pub fn new(store: S, verifier: V, policy: IssuancePolicy) -> Self {
        Self {
            store,
            verifier,
            policy,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &IssuancePolicy {
        &self.policy
    }

    pub async fn issue(&self, application: CardApplication) -> Result<Card> {
        let customer_id = application.customer_id.clone();
        tracing::debug!("Processing card application for customer {}", customer_id);

        match self.issue_checked(application).await {
            Ok(card) => {
                tracing::info!(
                    "✅ Issued card {:?} for customer {}",
                    card.id,
                    card.customer_id
                );
                Ok(card)
            }
            Err(e) if e.is_business_rejection() => {
                tracing::warn!("Rejected application for customer {}: {}", customer_id, e);
                Err(e)
            }
            Err(e) => {
                tracing::error!("❌ Application for customer {} failed: {}", customer_id, e);
                Err(e)
            }
        }
    }

    async fn issue_checked(&self, application: CardApplication) -> Result<Card> {
        // The customer id goes out to the identity service, so it is checked first.
        validate_digits("customer_id", &application.customer_id, CUSTOMER_ID_DIGITS)?;

        // 1. Identity
        match self.verifier.verify(&application.customer_id).await? {
            IdentityStatus::Valid => {}
            IdentityStatus::Invalid => {
                return Err(CardError::InvalidIdentity {
                    customer_id: application.customer_id,
                });
            }
        }

        // 2. Per-customer limit
        let max = self.policy.max_cards_per_customer;
        let held = self.store.count_by_customer(&application.customer_id).await?;
        tracing::debug!("Customer {} holds {} of {} cards", application.customer_id, held, max);
        if held >= max {
            return Err(CardError::LimitExceeded {
                customer_id: application.customer_id,
                max,
            });
        }

        // 3. Duplicate number, compared in canonical form. A number that does
        //    not canonicalize cannot match a stored one; step 5 reports it.
        if let Ok(canonical) = codec::normalize(&application.card_number) {
            if self.store.count_by_number(&canonical).await? > 0 {
                return Err(CardError::DuplicateCardNumber {
                    card_number: canonical,
                });
            }
        }

        // 4. Suffix
        self.policy.suffix.check(&application.card_number)?;

        // 5. Canonical form
        let canonical = codec::normalize(&application.card_number)?;

        // 6. Remaining field invariants
        application.validate()?;

        // 7. Persist; the store re-checks limit and uniqueness under its lock.
        let card = Card::from_application(application, canonical);
        self.store.save_within_limit(card, max).await
    }

    pub async fn update_limit(&self, key: CardKey, new_limit: u64) -> Result<LimitUpdate> {
        let existing = match &key {
            CardKey::Id(id) => self.store.find_by_id(*id).await?,
            CardKey::Customer(customer_id) => self.store.find_by_customer(customer_id).await?,
        };

        let Some(mut card) = existing else {
            tracing::warn!("Limit update for {} found no card", key);
            return Ok(LimitUpdate::NotFound);
        };

        let previous = card.limit;
        card.limit = new_limit;
        let updated = self.store.update(card).await?;
        tracing::info!(
            "Updated limit of card {:?} from {} to {}",
            updated.id,
            previous,
            new_limit
        );
        Ok(LimitUpdate::Updated(updated))
    }

    pub async fn query_by_customer(&self, customer_id: &str) -> Result<Option<Card>> {
        self.store.find_by_customer(customer_id).await
    }

    pub async fn card_by_id(&self, id: u64) -> Result<Card> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CardError::NotFound {
                target: format!("id {}", id),
            })
    }

    /// Looks a card up by number in any spacing.
    pub async fn card_by_number(&self, raw_number: &str) -> Result<Option<Card>> {
        let canonical = codec::normalize(raw_number)?;
        self.store.find_by_number(&canonical).await
    }
}
