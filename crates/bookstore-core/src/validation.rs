//! # Validation Module
//!
//! Parse-or-reject helpers for the owner and customer terminals.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Terminal prompt                                              │
//! │  ├── Reads a line of text                                              │
//! │  └── Re-prompts on any ValidationError                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Parses text into typed values                                     │
//! │  └── Range and format rules                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock >= 0), CHECK (status IN ...)                         │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The core operations never call these; they accept whatever the caller
//! hands them and clamp at checkout.
//!
//! ## Usage
//! ```rust
//! use bookstore_core::validation::{parse_quantity, validate_title};
//!
//! assert_eq!(parse_quantity(" 3 ").unwrap(), 3);
//! assert!(validate_title("").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ShareRate;
use crate::{MAX_BASKET_QUANTITY, MAX_TITLE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a book title.
///
/// ## Rules
/// - Must not be empty
/// - At most 30 characters (the width of the catalog's title column)
pub fn validate_title(title: &str) -> ValidationResult<String> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LEN,
        });
    }

    Ok(title.to_string())
}

/// Validates an ISBN.
///
/// ## Rules
/// - Digits, optionally separated by hyphens
/// - 9 to 13 digits once hyphens are removed
///
/// ## Example
/// ```rust
/// use bookstore_core::validation::validate_isbn;
///
/// assert_eq!(validate_isbn("978-0-13-110362-7").unwrap(), "9780131103627");
/// assert!(validate_isbn("ABC").is_err());
/// ```
pub fn validate_isbn(isbn: &str) -> ValidationResult<String> {
    let isbn = isbn.trim();

    if isbn.is_empty() {
        return Err(ValidationError::Required {
            field: "isbn".to_string(),
        });
    }

    if !isbn.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: "isbn".to_string(),
            reason: "must contain only digits and hyphens".to_string(),
        });
    }

    let digits: String = isbn.chars().filter(char::is_ascii_digit).collect();
    if !(9..=13).contains(&digits.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "isbn".to_string(),
            reason: "must have between 9 and 13 digits".to_string(),
        });
    }

    Ok(digits)
}

/// Validates a required free-text field (names, billing/shipping info).
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn parse_integer(field: &str, input: &str) -> ValidationResult<i64> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a whole number".to_string(),
        })
}

/// Parses a basket quantity.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Customer: "Add To Checkout"                                            │
/// │                                                                         │
/// │  User enters quantity: 5                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  parse_quantity("5") ← THIS FUNCTION                                   │
/// │       │                                                                 │
/// │       ├── not an integer? → re-prompt                                  │
/// │       ├── qty <= 0?       → "quantity must be positive"                │
/// │       ├── qty > 999?      → out of range                               │
/// │       │                                                                 │
/// │       └── OK → basket.add(id, 5)                                       │
/// │                                                                         │
/// │  Stock is NOT checked here; checkout clamps.                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let qty = parse_integer("quantity", input)?;

    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_BASKET_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_BASKET_QUANTITY,
        });
    }

    Ok(qty)
}

/// Parses a page count (positive).
pub fn parse_pages(input: &str) -> ValidationResult<i64> {
    let pages = parse_integer("pages", input)?;

    if pages <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "pages".to_string(),
        });
    }

    Ok(pages)
}

/// Parses a stock count (zero allowed).
pub fn parse_stock(input: &str) -> ValidationResult<i64> {
    let stock = parse_integer("stock", input)?;

    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(stock)
}

/// Parses a price such as `"20.00"` into cents (zero allowed).
///
/// ## Example
/// ```rust
/// use bookstore_core::validation::parse_price;
///
/// assert_eq!(parse_price("19.99").unwrap().cents(), 1999);
/// assert!(parse_price("-1").is_err());
/// ```
pub fn parse_price(input: &str) -> ValidationResult<Money> {
    let price = Money::parse(input)?;

    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(price)
}

/// Parses the publisher's share as a percentage `0..=100`.
///
/// Fractional percentages are accepted (`"12.5"` → 1250 bps).
pub fn parse_share_percent(input: &str) -> ValidationResult<ShareRate> {
    let out_of_range = || ValidationError::OutOfRange {
        field: "publisher percent".to_string(),
        min: 0,
        max: 100,
    };

    let percent: f64 = input
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "publisher percent".to_string(),
            reason: "must be a number between 0 and 100".to_string(),
        })?;

    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(out_of_range());
    }

    Ok(ShareRate::from_fraction(percent / 100.0))
}

/// Parses an optional inclusive range bound; blank input means "no bound".
pub fn parse_optional_bound(field: &str, input: &str) -> ValidationResult<Option<i64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_integer(field, input).map(Some)
}

/// Checks that `min <= max` when both bounds are present.
pub fn validate_range(field: &str, min: Option<i64>, max: Option<i64>) -> ValidationResult<()> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ValidationError::InvertedRange {
            field: field.to_string(),
            min,
            max,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("  Loyal Beagle ").unwrap(), "Loyal Beagle");
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"A".repeat(31)).is_err());
        assert!(validate_title(&"A".repeat(30)).is_ok());
    }

    #[test]
    fn test_validate_isbn() {
        assert_eq!(validate_isbn("071000013").unwrap(), "071000013");
        assert!(validate_isbn("").is_err());
        assert!(validate_isbn("12345").is_err());
        assert!(validate_isbn("97801311036270").is_err());
        assert!(validate_isbn("0-7100 0013").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("1").unwrap(), 1);
        assert_eq!(parse_quantity("999").unwrap(), 999);

        assert!(matches!(
            parse_quantity("0"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(parse_quantity("-1").is_err());
        assert!(parse_quantity("1000").is_err());
        assert!(matches!(
            parse_quantity("2.5"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_parse_pages_and_stock() {
        assert_eq!(parse_pages("320").unwrap(), 320);
        assert!(parse_pages("0").is_err());
        assert_eq!(parse_stock("0").unwrap(), 0);
        assert!(parse_stock("-3").is_err());
        assert!(parse_stock("many").is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("20").unwrap().cents(), 2000);
        assert_eq!(parse_price("0").unwrap().cents(), 0);
        assert!(parse_price("-0.01").is_err());
        assert!(parse_price("twenty").is_err());
    }

    #[test]
    fn test_parse_share_percent() {
        assert_eq!(parse_share_percent("30").unwrap().bps(), 3000);
        assert_eq!(parse_share_percent("12.5%").unwrap().bps(), 1250);
        assert_eq!(parse_share_percent("100").unwrap().bps(), 10_000);
        assert!(parse_share_percent("101").is_err());
        assert!(parse_share_percent("-1").is_err());
        assert!(parse_share_percent("NaN").is_err());
    }

    #[test]
    fn test_ranges() {
        assert_eq!(parse_optional_bound("pages", "").unwrap(), None);
        assert_eq!(parse_optional_bound("pages", "120").unwrap(), Some(120));
        assert!(validate_range("pages", Some(10), Some(5)).is_err());
        assert!(validate_range("pages", Some(5), None).is_ok());
        assert!(validate_range("pages", Some(5), Some(5)).is_ok());
    }

    #[test]
    fn test_validate_required() {
        assert_eq!(
            validate_required("billing info", " 12 Bank St ", 200).unwrap(),
            "12 Bank St"
        );
        assert!(validate_required("billing info", "", 200).is_err());
        assert!(validate_required("name", "abcdef", 5).is_err());
    }
}
