//! Request orchestration for each page.
//!
//! Every workflow validates before dispatching, so a rejected input never
//! reaches the backend, and keeps its one-shot guards on the record itself.
//! Pages only mirror those guards in disabled buttons.

pub mod account;
pub mod blind;
pub mod comparison;
pub mod evaluation;
pub mod optimization;

use std::ops::RangeInclusive;

use crate::error::{ClientError, ClientResult};

pub(crate) fn require_text(field: &'static str, value: &str, message: &str) -> ClientResult<()> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(field, message));
    }
    Ok(())
}

pub(crate) fn require_range(
    field: &'static str,
    value: u8,
    range: RangeInclusive<u8>,
    message: &str,
) -> ClientResult<()> {
    if !range.contains(&value) {
        return Err(ClientError::validation(field, message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_rejects_whitespace() {
        assert!(require_text("q", "   \n", "empty").is_err());
        assert!(require_text("q", " x ", "empty").is_ok());
    }

    #[test]
    fn test_require_range_is_closed() {
        assert!(require_range("n", 2, 2..=4, "bad").is_ok());
        assert!(require_range("n", 4, 2..=4, "bad").is_ok());
        assert!(require_range("n", 1, 2..=4, "bad").is_err());
        assert!(require_range("n", 5, 2..=4, "bad").is_err());
    }
}
