//! Small query-building helpers shared by the Diesel repositories.

/// Escape `LIKE` wildcards so `text` matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// `LIKE` pattern for values starting with `prefix`.
pub(super) fn prefix_pattern(prefix: &str) -> String {
    format!("{}%", escape_like(prefix))
}

/// `LIKE` pattern for values containing `needle`.
pub(super) fn contains_pattern(needle: &str) -> String {
    format!("%{}%", escape_like(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sa", "sa%")]
    #[case("50%", "50\\%%")]
    #[case("a_b", "a\\_b%")]
    fn prefix_pattern_escapes_wildcards(#[case] prefix: &str, #[case] expected: &str) {
        assert_eq!(prefix_pattern(prefix), expected);
    }

    #[rstest]
    fn contains_pattern_wraps_both_ends() {
        assert_eq!(contains_pattern("pie"), "%pie%");
    }
}
