//! # Search Criteria and Fuzzy Matching
//!
//! Everything about catalog search that does not need the database: the
//! criteria shape, LIKE pattern escaping, title edit distance, and the
//! outcome type. The staged queries live in `bookstore-db`.
//!
//! ## Search Stages
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Staged Narrowing                                │
//! │                                                                         │
//! │  Stage 1: title / isbn / pages / price  ──► ids₁                        │
//! │     │                                                                   │
//! │     ├── ids₁ empty AND title given ──► fuzzy titles ──► Suggestions     │
//! │     ├── ids₁ empty ──────────────────────────────────► NoMatches        │
//! │     ▼                                                                   │
//! │  Stage 2: author substring, among ids₁  ──► ids₂ ⊆ ids₁                 │
//! │     ▼                                                                   │
//! │  Stage 3: genre substring, among ids₂   ──► ids₃ ⊆ ids₂ ──► Matches     │
//! │                                                                         │
//! │  Ids always ascend. Any empty stage short-circuits to NoMatches.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::BookId;
use crate::validation::validate_range;
use crate::FUZZY_TITLE_MAX_DISTANCE;

// =============================================================================
// Criteria
// =============================================================================

/// Independently optional search filters. All present filters are AND-ed.
///
/// Text filters are case-insensitive substrings. Ranges are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub page_min: Option<i64>,
    pub page_max: Option<i64>,
    pub price_min_cents: Option<i64>,
    pub price_max_cents: Option<i64>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        SearchCriteria::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = non_blank(title.into());
        self
    }

    pub fn isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = non_blank(isbn.into());
        self
    }

    pub fn pages(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.page_min = min;
        self.page_max = max;
        self
    }

    pub fn price_cents(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.price_min_cents = min;
        self.price_max_cents = max;
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = non_blank(author.into());
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = non_blank(genre.into());
        self
    }

    /// Rejects ranges whose minimum exceeds the maximum.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_range("pages", self.page_min, self.page_max)?;
        validate_range("price", self.price_min_cents, self.price_max_cents)?;
        Ok(())
    }

    /// True if no filter is set (every book matches).
    pub fn is_empty(&self) -> bool {
        *self == SearchCriteria::default()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Result of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ids", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Books satisfying every filter, ascending by id.
    Matches(Vec<BookId>),
    /// Nothing matched exactly; these titles are close to the query.
    Suggestions(Vec<BookId>),
    NoMatches,
}

impl SearchOutcome {
    /// Builds `Matches`, collapsing an empty set to `NoMatches`.
    pub fn matches(mut ids: Vec<BookId>) -> Self {
        if ids.is_empty() {
            return SearchOutcome::NoMatches;
        }
        ids.sort_unstable();
        ids.dedup();
        SearchOutcome::Matches(ids)
    }

    /// Builds `Suggestions`, collapsing an empty set to `NoMatches`.
    pub fn suggestions(mut ids: Vec<BookId>) -> Self {
        if ids.is_empty() {
            return SearchOutcome::NoMatches;
        }
        ids.sort_unstable();
        ids.dedup();
        SearchOutcome::Suggestions(ids)
    }

    /// The ids carried by the outcome (empty for `NoMatches`).
    pub fn ids(&self) -> &[BookId] {
        match self {
            SearchOutcome::Matches(ids) | SearchOutcome::Suggestions(ids) => ids,
            SearchOutcome::NoMatches => &[],
        }
    }

    pub fn is_suggestion(&self) -> bool {
        matches!(self, SearchOutcome::Suggestions(_))
    }
}

// =============================================================================
// LIKE Patterns
// =============================================================================

/// Escape character used in every `LIKE ... ESCAPE` clause.
pub const LIKE_ESCAPE: char = '\\';

/// Wraps user text as a `%substring%` LIKE pattern, escaping `%`, `_` and
/// the escape character itself.
///
/// ## Example
/// ```rust
/// use bookstore_core::search::like_pattern;
///
/// assert_eq!(like_pattern("dog"), "%dog%");
/// assert_eq!(like_pattern("100%"), "%100\\%%");
/// ```
pub fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// Fuzzy Title Matching
// =============================================================================

/// Levenshtein distance between two strings, counted in chars.
///
/// ## Example
/// ```rust
/// use bookstore_core::search::edit_distance;
///
/// assert_eq!(edit_distance("kitten", "sitting"), 3);
/// assert_eq!(edit_distance("", "dog"), 3);
/// ```
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows of the DP table.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Case-insensitive distance between a query and a title.
pub fn title_distance(query: &str, title: &str) -> usize {
    edit_distance(&query.to_lowercase(), &title.to_lowercase())
}

/// Ids of the titles within [`FUZZY_TITLE_MAX_DISTANCE`] of the query,
/// ascending.
pub fn fuzzy_title_matches<'a, I>(query: &str, titles: I) -> Vec<BookId>
where
    I: IntoIterator<Item = (BookId, &'a str)>,
{
    let query = query.to_lowercase();
    let mut ids: Vec<BookId> = titles
        .into_iter()
        .filter(|(_, title)| {
            edit_distance(&query, &title.to_lowercase()) <= FUZZY_TITLE_MAX_DISTANCE
        })
        .map(|(id, _)| id)
        .collect();
    ids.sort_unstable();
    ids
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance_basics() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("dog", "dog"), 0);
        assert_eq!(edit_distance("dog", "dig"), 1);
        assert_eq!(edit_distance("dog", "dogs"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
    }

    #[test]
    fn test_edit_distance_is_symmetric() {
        let pairs = [("dog", "Brave Hunt"), ("saturday", "sunday"), ("", "abc")];
        for (a, b) in pairs {
            assert_eq!(edit_distance(a, b), edit_distance(b, a));
        }
    }

    #[test]
    fn test_title_distance_ignores_case() {
        assert_eq!(title_distance("DOG", "dog"), 0);
        assert_eq!(title_distance("dog", "Brave Hunt"), 10);
    }

    #[test]
    fn test_fuzzy_title_matches_threshold() {
        let titles = vec![
            (4, "Brave Hunt"),
            (2, "An Extraordinarily Long Title About Nothing"),
            (9, "Doge"),
        ];
        let ids = fuzzy_title_matches("dog", titles.iter().map(|(id, t)| (*id, *t)));
        assert_eq!(ids, vec![4, 9]);
    }

    #[test]
    fn test_fuzzy_threshold_is_inclusive() {
        let exactly = "a".repeat(FUZZY_TITLE_MAX_DISTANCE);
        let beyond = "a".repeat(FUZZY_TITLE_MAX_DISTANCE + 1);
        let ids = fuzzy_title_matches("", [(1, exactly.as_str()), (2, beyond.as_str())]);
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("dog"), "%dog%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    }

    #[test]
    fn test_criteria_builder_drops_blank_text() {
        let criteria = SearchCriteria::new().title("  ").author(" Le Guin ");
        assert_eq!(criteria.title, None);
        assert_eq!(criteria.author.as_deref(), Some("Le Guin"));
        assert!(SearchCriteria::new().is_empty());
        assert!(!criteria.is_empty());
    }

    #[test]
    fn test_criteria_rejects_inverted_range() {
        let criteria = SearchCriteria::new().pages(Some(500), Some(100));
        assert!(matches!(
            criteria.validate(),
            Err(ValidationError::InvertedRange { .. })
        ));

        let criteria = SearchCriteria::new().price_cents(Some(1000), None);
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_outcome_constructors_sort_and_collapse() {
        assert_eq!(SearchOutcome::matches(vec![]), SearchOutcome::NoMatches);
        assert_eq!(
            SearchOutcome::matches(vec![9, 3, 3, 1]),
            SearchOutcome::Matches(vec![1, 3, 9])
        );
        let fuzzy = SearchOutcome::suggestions(vec![5]);
        assert!(fuzzy.is_suggestion());
        assert_eq!(fuzzy.ids(), &[5]);
        assert!(SearchOutcome::NoMatches.ids().is_empty());
    }
}
