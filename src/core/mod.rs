pub mod codec;
pub mod issuance;
pub mod suffix;

pub use crate::domain::model::{Card, CardApplication, CardKey, LimitUpdate};
pub use crate::domain::ports::{CardStore, IdentityStatus, IdentityVerifier};
pub use crate::utils::error::Result;
pub use issuance::{IssuancePolicy, IssuanceService};
pub use suffix::SuffixPolicy;
