//! Followed authors and the recipe previews shown alongside them.

use crate::domain::{RecipeSummary, UserProfile};

/// An author as listed on a follower's subscriptions page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionView {
    pub author: UserProfile,
    /// Newest recipes first, possibly truncated.
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes by the author, regardless of truncation.
    pub recipes_count: u64,
}

/// Parse the `recipes_limit` query value.
///
/// Values that are not non-negative integers are ignored rather than
/// rejected, leaving the preview untruncated.
///
/// # Examples
/// ```
/// use foodgram::domain::parse_recipes_limit;
///
/// assert_eq!(parse_recipes_limit(Some("3")), Some(3));
/// assert_eq!(parse_recipes_limit(Some("lots")), None);
/// assert_eq!(parse_recipes_limit(None), None);
/// ```
pub fn parse_recipes_limit(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("0"), Some(0))]
    #[case(Some(" 2 "), Some(2))]
    #[case(Some("-1"), None)]
    #[case(Some(""), None)]
    #[case(None, None)]
    fn recipes_limit_ignores_garbage(#[case] raw: Option<&str>, #[case] expected: Option<u32>) {
        assert_eq!(parse_recipes_limit(raw), expected);
    }
}
