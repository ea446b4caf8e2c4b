//! Per-column filter matching.

use std::fmt;
use std::sync::Arc;

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use super::FilterValue;
use crate::model::Value;

type CustomMatchFn = Arc<dyn Fn(&Value, &FilterValue) -> bool + Send + Sync>;

/// How a column decides whether a cell passes its filter.
///
/// `Auto` picks the test from the filter value: text is a case-insensitive
/// substring test, an exact value is equality, a set is membership and a
/// range is inclusive containment.
#[derive(Clone, Default)]
pub enum FilterMatcher {
    /// Choose by filter value.
    #[default]
    Auto,
    /// Exact equality. Text filters compare against the display value.
    Equals,
    /// Case-insensitive substring on the display value.
    Contains,
    /// Inclusive range containment.
    Range,
    /// Fuzzy match on the display value.
    Fuzzy,
    /// Caller-supplied comparison.
    Custom(CustomMatchFn),
}

impl FilterMatcher {
    /// Creates a custom matcher.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Value, &FilterValue) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Test a single cell against a filter value.
    pub fn matches(&self, value: &Value, display: &str, filter: &FilterValue) -> bool {
        self.matches_with(value, display, filter, &mut FuzzyScorer::new())
    }

    pub(crate) fn matches_with(
        &self,
        value: &Value,
        display: &str,
        filter: &FilterValue,
        fuzzy: &mut FuzzyScorer,
    ) -> bool {
        match (self, filter) {
            (Self::Custom(f), _) => f(value, filter),
            (Self::Equals, FilterValue::Text(text)) => display == text,
            (Self::Contains, FilterValue::Exact(expected)) => {
                contains_ignore_case(display, &expected.to_string())
            }
            (Self::Fuzzy, FilterValue::Text(query)) => fuzzy.matches(query, display),
            (_, FilterValue::Text(text)) => contains_ignore_case(display, text),
            (_, FilterValue::Exact(expected)) => value.loose_eq(expected),
            (_, FilterValue::OneOf(options)) => options.iter().any(|o| value.loose_eq(o)),
            (_, FilterValue::Range { min, max }) => in_range(value, min.as_ref(), max.as_ref()),
        }
    }
}

impl fmt::Debug for FilterMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("Auto"),
            Self::Equals => f.write_str("Equals"),
            Self::Contains => f.write_str("Contains"),
            Self::Range => f.write_str("Range"),
            Self::Fuzzy => f.write_str("Fuzzy"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn in_range(value: &Value, min: Option<&Value>, max: Option<&Value>) -> bool {
    if value.is_null() {
        return false;
    }
    let above = min.is_none_or(|m| value.same_kind(m) && value.compare(m).is_ge());
    let below = max.is_none_or(|m| value.same_kind(m) && value.compare(m).is_le());
    above && below
}

/// Reusable nucleo matcher for fuzzy column filters.
pub(crate) struct FuzzyScorer {
    matcher: Matcher,
    buf: Vec<char>,
}

impl FuzzyScorer {
    pub(crate) fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::new(),
        }
    }

    fn matches(&mut self, query: &str, haystack: &str) -> bool {
        let pattern = Pattern::new(
            query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );
        let haystack = Utf32Str::new(haystack, &mut self.buf);
        pattern.score(haystack, &mut self.matcher).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_text_is_case_insensitive_substring() {
        let m = FilterMatcher::Auto;
        let v = Value::from("Administrator");
        assert!(m.matches(&v, "Administrator", &FilterValue::text("admin")));
        assert!(!m.matches(&v, "Administrator", &FilterValue::text("user")));
    }

    #[test]
    fn test_equals_is_exact() {
        let m = FilterMatcher::Equals;
        let v = Value::from("active");
        assert!(m.matches(&v, "active", &FilterValue::text("active")));
        assert!(!m.matches(&v, "active", &FilterValue::text("act")));
        assert!(m.matches(&Value::Int(3), "3", &FilterValue::exact(3.0)));
    }

    #[test]
    fn test_one_of() {
        let m = FilterMatcher::Auto;
        let filter = FilterValue::one_of(["open", "pending"]);
        assert!(m.matches(&Value::from("open"), "open", &filter));
        assert!(!m.matches(&Value::from("closed"), "closed", &filter));
    }

    #[test]
    fn test_range_is_inclusive_and_typed() {
        let m = FilterMatcher::Range;
        let filter = FilterValue::range(Some(10), Some(20));
        assert!(m.matches(&Value::Int(10), "10", &filter));
        assert!(m.matches(&Value::Float(19.5), "19.5", &filter));
        assert!(!m.matches(&Value::Int(21), "21", &filter));
        assert!(!m.matches(&Value::from("15"), "15", &filter));
        assert!(!m.matches(&Value::Null, "", &filter));

        let open_ended = FilterValue::range(Some(10), None::<i64>);
        assert!(m.matches(&Value::Int(1_000), "1000", &open_ended));
    }

    #[test]
    fn test_date_range() {
        let filter = FilterValue::range(
            Some(Value::parse_text("2024-01-01")),
            Some(Value::parse_text("2024-01-31")),
        );
        let inside = Value::parse_text("2024-01-15T12:00:00Z");
        let outside = Value::parse_text("2024-02-01");
        assert!(FilterMatcher::Auto.matches(&inside, "", &filter));
        assert!(!FilterMatcher::Auto.matches(&outside, "", &filter));
    }

    #[test]
    fn test_fuzzy() {
        let m = FilterMatcher::Fuzzy;
        let v = Value::from("Grace Hopper");
        assert!(m.matches(&v, "Grace Hopper", &FilterValue::text("grhop")));
        assert!(!m.matches(&v, "Grace Hopper", &FilterValue::text("xyz")));
    }

    #[test]
    fn test_custom() {
        let m = FilterMatcher::custom(|value, filter| match (value, filter) {
            (Value::Int(v), FilterValue::Exact(Value::Int(step))) => v % step == 0,
            _ => false,
        });
        assert!(m.matches(&Value::Int(9), "9", &FilterValue::exact(3)));
        assert!(!m.matches(&Value::Int(10), "10", &FilterValue::exact(3)));
    }
}
