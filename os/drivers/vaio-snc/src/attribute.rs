//! Attribute exposition helpers.
//!
//! Every active feature publishes named values that the host turns into
//! files. Writes arrive as short decimal text.

use crate::error::ValidationError;

/// Longest accepted write, in bytes.
pub const MAX_INPUT_LEN: usize = 31;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    #[must_use]
    pub const fn readable(self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    #[must_use]
    pub const fn writable(self) -> bool {
        matches!(self, Self::WriteOnly | Self::ReadWrite)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub access: Access,
}

impl Attribute {
    #[must_use]
    pub const fn ro(name: &'static str) -> Self {
        Self {
            name,
            access: Access::ReadOnly,
        }
    }

    #[must_use]
    pub const fn rw(name: &'static str) -> Self {
        Self {
            name,
            access: Access::ReadWrite,
        }
    }

    #[must_use]
    pub const fn wo(name: &'static str) -> Self {
        Self {
            name,
            access: Access::WriteOnly,
        }
    }
}

/// Reject writes longer than [`MAX_INPUT_LEN`].
///
/// # Errors
/// [`ValidationError::TooLong`].
pub const fn check_len(input: &str) -> Result<&str, ValidationError> {
    if input.len() > MAX_INPUT_LEN {
        return Err(ValidationError::TooLong);
    }
    Ok(input)
}

/// Parse an unsigned decimal write. Surrounding whitespace is ignored.
///
/// # Errors
/// Input too long, not a number, or overflowing `u64`.
pub fn parse_decimal(input: &str) -> Result<u64, ValidationError> {
    let digits = check_len(input)?.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotANumber);
    }
    digits
        .bytes()
        .try_fold(0u64, |acc, b| {
            acc.checked_mul(10)?.checked_add(u64::from(b - b'0'))
        })
        .ok_or(ValidationError::OutOfRange(u64::MAX))
}

/// Parse a decimal write no larger than `max`.
///
/// # Errors
/// As [`parse_decimal`], plus [`ValidationError::OutOfRange`].
pub fn parse_bounded(input: &str, max: u32) -> Result<u32, ValidationError> {
    let v = parse_decimal(input)?;
    u32::try_from(v)
        .ok()
        .filter(|&v| v <= max)
        .ok_or(ValidationError::OutOfRange(v))
}

/// Parse a strict `0`/`1` write.
///
/// # Errors
/// As [`parse_bounded`].
pub fn parse_bool(input: &str) -> Result<bool, ValidationError> {
    parse_bounded(input, 1).map(|v| v == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal() {
        assert_eq!(parse_decimal("42\n"), Ok(42));
        assert_eq!(parse_decimal(" 7 "), Ok(7));
        assert_eq!(parse_decimal(""), Err(ValidationError::NotANumber));
        assert_eq!(parse_decimal("-1"), Err(ValidationError::NotANumber));
        assert_eq!(parse_decimal("0x10"), Err(ValidationError::NotANumber));
    }

    #[test]
    fn overflow_is_rejected() {
        assert_eq!(
            parse_decimal("18446744073709551616"),
            Err(ValidationError::OutOfRange(u64::MAX))
        );
        assert_eq!(parse_decimal("18446744073709551615"), Ok(u64::MAX));
    }

    #[test]
    fn length_limit() {
        let long = "1".repeat(MAX_INPUT_LEN + 1);
        assert_eq!(parse_decimal(&long), Err(ValidationError::TooLong));
        let padded = format!("{:>31}", 5);
        assert_eq!(parse_decimal(&padded), Ok(5));
    }

    #[test]
    fn bounded_and_bool() {
        assert_eq!(parse_bounded("3", 3), Ok(3));
        assert_eq!(parse_bounded("4", 3), Err(ValidationError::OutOfRange(4)));
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert_eq!(parse_bool("2"), Err(ValidationError::OutOfRange(2)));
    }
}
