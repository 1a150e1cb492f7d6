use crate::core::codec::digits;
use crate::utils::error::{CardError, Result};

pub const DEFAULT_REQUIRED_SUFFIX: &str = "1234";

/// Card numbers must end with a fixed digit sequence taken from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixPolicy {
    suffix: String,
}

impl SuffixPolicy {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn has_required_suffix(&self, raw: &str) -> bool {
        digits(raw).ends_with(&self.suffix)
    }

    pub fn check(&self, raw: &str) -> Result<()> {
        if self.has_required_suffix(raw) {
            Ok(())
        } else {
            Err(CardError::InvalidSuffix {
                required: self.suffix.clone(),
            })
        }
    }
}

impl Default for SuffixPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_REQUIRED_SUFFIX)
    }
}
