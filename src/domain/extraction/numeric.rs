//! Free-text price fragment parsing.

use regex::Regex;
use std::sync::LazyLock;

use crate::shared::errors::ExtractError;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("valid number pattern"));

/// Pulls the first decimal-looking substring out of an arbitrary fragment
/// ("12,99 €" parses to 12.99). A comma decimal separator is normalized to
/// a period.
///
/// The first match wins, so "1.234,56" parses to 1.234: there is no
/// thousands-separator disambiguation. Documented quirk, not a bug.
pub fn parse_decimal(fragment: &str) -> Result<f64, ExtractError> {
    let m = NUMBER_RE
        .find(fragment)
        .ok_or_else(|| ExtractError::NumberNotFound(snippet(fragment)))?;
    m.as_str()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| ExtractError::NumberNotFound(snippet(fragment)))
}

/// Keeps error messages readable when a whole element's text came through.
fn snippet(fragment: &str) -> String {
    const MAX: usize = 60;
    if fragment.chars().count() <= MAX {
        fragment.to_string()
    } else {
        fragment.chars().take(MAX).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_decimal_with_currency() {
        assert_eq!(parse_decimal("12,99 €").unwrap(), 12.99);
    }

    #[test]
    fn parses_plain_number_inside_words() {
        assert_eq!(parse_decimal("Prix conseillé 249.90 EUR").unwrap(), 249.90);
    }

    #[test]
    fn first_match_wins_on_thousands_notation() {
        // permissive by design: "1.234,56" is read as 1.234
        assert_eq!(parse_decimal("1.234,56").unwrap(), 1.234);
    }

    #[test]
    fn integer_only_fragment() {
        assert_eq!(parse_decimal("199").unwrap(), 199.0);
    }

    #[test]
    fn no_digits_is_an_error() {
        let err = parse_decimal("prix indisponible").unwrap_err();
        assert!(matches!(err, ExtractError::NumberNotFound(_)));
    }

    #[test]
    fn long_fragments_are_truncated_in_the_error() {
        let long = "x".repeat(500);
        match parse_decimal(&long).unwrap_err() {
            ExtractError::NumberNotFound(s) => assert_eq!(s.chars().count(), 60),
            other => panic!("unexpected error: {other}"),
        }
    }
}
