use crate::utils::error::{CardError, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static EXPIRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("expiry pattern compiles"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CardError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(CardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Field check for application input: exactly `len` ASCII digits.
pub fn validate_digits(field_name: &str, value: &str, len: usize) -> Result<()> {
    if value.len() != len || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(CardError::Validation {
            field: field_name.to_string(),
            reason: format!("must contain exactly {} digits", len),
        });
    }
    Ok(())
}

/// `MM/YY` with a real month.
pub fn validate_expiry(field_name: &str, value: &str) -> Result<()> {
    if !EXPIRY_PATTERN.is_match(value) {
        return Err(CardError::Validation {
            field: field_name.to_string(),
            reason: "must use the MM/YY format, e.g. 12/24".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive(field_name: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(CardError::Validation {
            field: field_name.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("identity.base_url", "https://example.com").is_ok());
        assert!(validate_url("identity.base_url", "http://localhost:8083").is_ok());
        assert!(validate_url("identity.base_url", "").is_err());
        assert!(validate_url("identity.base_url", "invalid-url").is_err());
        assert!(validate_url("identity.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("identity.timeout_seconds", 5, 1, 120).is_ok());
        assert!(validate_range("identity.timeout_seconds", 0, 1, 120).is_err());
        assert!(validate_range("identity.timeout_seconds", 121, 1, 120).is_err());
    }

    #[test]
    fn test_validate_digits() {
        assert!(validate_digits("customer_id", "11111111111", 11).is_ok());
        assert!(validate_digits("customer_id", "1111111111", 11).is_err());
        assert!(validate_digits("customer_id", "1111111111a", 11).is_err());
        assert!(validate_digits("cvv", "123", 3).is_ok());
        assert!(validate_digits("cvv", "12 3", 3).is_err());
    }

    #[test]
    fn test_validate_expiry() {
        assert!(validate_expiry("expiry", "12/24").is_ok());
        assert!(validate_expiry("expiry", "01/30").is_ok());
        assert!(validate_expiry("expiry", "13/24").is_err());
        assert!(validate_expiry("expiry", "00/24").is_err());
        assert!(validate_expiry("expiry", "1224").is_err());
        assert!(validate_expiry("expiry", "12/2024").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("storage.path", "./data/cards.json").is_ok());
        assert!(validate_path("storage.path", "  ").is_err());
        assert!(validate_path("storage.path", "bad\0path").is_err());
    }
}
