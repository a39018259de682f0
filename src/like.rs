//! LIKE pattern matching.
//!
//! Templates use `%` for any run of characters and `_` for any single
//! character; `\` escapes the next pattern character.

/// Check whether `subject` matches the LIKE `pattern`
pub fn like_match(subject: &str, pattern: &str) -> bool {
    let subject: Vec<char> = subject.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    match_from(&subject, &pattern)
}

fn match_from(subject: &[char], pattern: &[char]) -> bool {
    let Some(&head) = pattern.first() else {
        return subject.is_empty();
    };

    match head {
        '%' => (0..=subject.len()).any(|skip| match_from(&subject[skip..], &pattern[1..])),
        '_' => !subject.is_empty() && match_from(&subject[1..], &pattern[1..]),
        '\\' => match pattern.get(1) {
            Some(&escaped) => {
                !subject.is_empty()
                    && subject[0] == escaped
                    && match_from(&subject[1..], &pattern[2..])
            }
            // Trailing escape matches a literal backslash
            None => subject == ['\\'],
        },
        literal => {
            !subject.is_empty()
                && subject[0] == literal
                && match_from(&subject[1..], &pattern[1..])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(like_match("abc", "abc"));
        assert!(!like_match("abc", "ab"));
        assert!(!like_match("ab", "abc"));
        assert!(like_match("", ""));
    }

    #[test]
    fn test_percent_wildcard() {
        assert!(like_match("abc", "a%c"));
        assert!(like_match("abbbc", "a%c"));
        assert!(like_match("ac", "a%c"));
        assert!(like_match("abc", "%"));
        assert!(like_match("", "%"));
        assert!(like_match("abc", "%c"));
        assert!(like_match("abc", "a%"));
        assert!(!like_match("abd", "a%c"));
    }

    #[test]
    fn test_underscore_wildcard() {
        assert!(like_match("abc", "a_c"));
        assert!(!like_match("abbc", "a_c"));
        assert!(!like_match("ac", "a_c"));
        assert!(like_match("x", "_"));
    }

    #[test]
    fn test_mixed_wildcards() {
        assert!(like_match("foobar", "f%b_r"));
        assert!(like_match("a1b2c3", "a%_3"));
        assert!(!like_match("abc", "ab"));
    }

    #[test]
    fn test_escaping() {
        assert!(like_match("50%", "50\\%"));
        assert!(!like_match("500", "50\\%"));
        assert!(like_match("a_b", "a\\_b"));
        assert!(!like_match("axb", "a\\_b"));
        assert!(like_match("a\\b", "a\\\\b"));
    }
}
