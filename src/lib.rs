pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FileCardStore, HttpIdentityVerifier, InMemoryCardStore};
pub use config::AppConfig;
pub use crate::core::{
    Card, CardApplication, CardKey, CardStore, IdentityStatus, IdentityVerifier, IssuancePolicy,
    IssuanceService, LimitUpdate, SuffixPolicy,
};
pub use utils::error::{CardError, ErrorKind, Result};
