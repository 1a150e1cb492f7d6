use crate::utils::error::{CardError, Result};

pub const CARD_NUMBER_DIGITS: usize = 16;
const GROUP_SIZE: usize = 4;

/// Keeps only the ASCII digits of `raw`.
pub fn digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Canonical card number: 16 digits in four space-separated groups.
///
/// Any non-digit character in `raw` is dropped first, so `"5200121114351234"`,
/// `"5200 1211 1435 1234"` and `"5200-1211-1435-1234"` all normalize to the
/// same value.
pub fn normalize(raw: &str) -> Result<String> {
    let digits = digits(raw);
    if digits.len() != CARD_NUMBER_DIGITS {
        return Err(CardError::InvalidFormat {
            digits: digits.len(),
        });
    }

    let groups: Vec<&str> = (0..CARD_NUMBER_DIGITS)
        .step_by(GROUP_SIZE)
        .map(|start| &digits[start..start + GROUP_SIZE])
        .collect();
    Ok(groups.join(" "))
}
