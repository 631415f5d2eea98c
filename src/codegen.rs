//! Short code generation and custom alias validation.

use rand::{distr::Alphanumeric, Rng};

/// Length of machine-generated codes.
pub const GENERATED_CODE_LEN: usize = 6;

/// Caller-supplied aliases may be a little longer than generated codes.
pub const CUSTOM_CODE_MIN_LEN: usize = 6;
pub const CUSTOM_CODE_MAX_LEN: usize = 8;

/// Generate a random code drawn uniformly from `[A-Za-z0-9]`.
///
/// Not cryptographically secure and not checked for uniqueness here; the
/// store's unique constraint is the final arbiter.
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(GENERATED_CODE_LEN)
        .map(char::from)
        .collect()
}

/// Whether a caller-supplied alias is acceptable: 6 to 8 ASCII letters and
/// digits, nothing else.
pub fn is_valid_custom_code(code: &str) -> bool {
    (CUSTOM_CODE_MIN_LEN..=CUSTOM_CODE_MAX_LEN).contains(&code.len())
        && code.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_match_the_grammar() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), GENERATED_CODE_LEN);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn generated_codes_vary() {
        let a = generate_code();
        let b = generate_code();
        let c = generate_code();
        // 62^6 combinations; three identical draws in a row means the RNG is broken
        assert!(!(a == b && b == c));
    }

    #[test]
    fn accepts_valid_custom_codes() {
        assert!(is_valid_custom_code("abc123"));
        assert!(is_valid_custom_code("ABCdef12"));
        assert!(is_valid_custom_code("A1b2C3d"));
        assert!(is_valid_custom_code("000000"));
    }

    #[test]
    fn rejects_bad_lengths() {
        assert!(!is_valid_custom_code(""));
        assert!(!is_valid_custom_code("abc12"));
        assert!(!is_valid_custom_code("abc123456"));
    }

    #[test]
    fn rejects_non_alphanumeric_characters() {
        assert!(!is_valid_custom_code("abc-12"));
        assert!(!is_valid_custom_code("abc 12"));
        assert!(!is_valid_custom_code("abc12!"));
        assert!(!is_valid_custom_code("abc/12"));
        assert!(!is_valid_custom_code("héllo1"));
    }
}
