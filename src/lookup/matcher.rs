//! First-match keyword routing for free-text queries.

use crate::config::render;

/// Keywords that select one response.
#[derive(Debug, Clone)]
pub struct KeywordGroup {
    keywords: Vec<String>,
    response: String,
}

impl KeywordGroup {
    pub fn new(keywords: &[&str], response: impl Into<String>) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            response: response.into(),
        }
    }

    /// Whether any keyword occurs in the already lower-cased query.
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    pub fn response(&self) -> &str {
        &self.response
    }
}

/// Ordered keyword groups with a fallback menu.
///
/// Groups are tested in declaration order and the first group with any
/// keyword contained in the lower-cased query wins. There is no scoring.
/// The fallback is a template; `{{query}}` expands to the query as given.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    groups: Vec<KeywordGroup>,
    fallback: String,
}

impl KeywordMatcher {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            groups: Vec::new(),
            fallback: fallback.into(),
        }
    }

    /// Append a group after the existing ones.
    pub fn group(mut self, keywords: &[&str], response: impl Into<String>) -> Self {
        self.groups.push(KeywordGroup::new(keywords, response));
        self
    }

    /// The first matching group's response, if any.
    pub fn find(&self, query: &str) -> Option<&str> {
        let lowered = query.to_lowercase();
        self.groups
            .iter()
            .find(|g| g.matches(&lowered))
            .map(KeywordGroup::response)
    }

    /// The fallback rendered for `query`.
    pub fn fallback(&self, query: &str) -> String {
        render(&self.fallback, [("query", query)])
    }

    /// The matching response, or the fallback.
    pub fn respond(&self, query: &str) -> String {
        match self.find(query) {
            Some(response) => response.to_string(),
            None => self.fallback(query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> KeywordMatcher {
        KeywordMatcher::new("Nothing for \"{{query}}\". Try: streaming, labels.")
            .group(&["streaming", "spotify", "revenue"], "STREAMING")
            .group(&["record label", "distribution"], "LABELS")
            .group(&["Touring"], "TOURING")
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(matcher().respond("How big is SPOTIFY now?"), "STREAMING");
        assert_eq!(matcher().respond("touring margins"), "TOURING");
    }

    #[test]
    fn test_earliest_group_wins() {
        // Mentions both a label keyword and a streaming keyword.
        assert_eq!(
            matcher().respond("record label revenue from streaming"),
            "STREAMING"
        );
        assert_eq!(matcher().respond("distribution then touring"), "LABELS");
    }

    #[test]
    fn test_substring_matching() {
        // "revenues" contains "revenue".
        assert_eq!(matcher().find("quarterly revenues"), Some("STREAMING"));
    }

    #[test]
    fn test_fallback_renders_query() {
        assert_eq!(
            matcher().respond("xyz123 Unrelated"),
            "Nothing for \"xyz123 Unrelated\". Try: streaming, labels."
        );
        assert!(matcher().find("xyz123").is_none());
    }

    #[test]
    fn test_empty_matcher_always_falls_back() {
        let m = KeywordMatcher::new("menu");
        assert_eq!(m.respond("anything"), "menu");
    }
}
