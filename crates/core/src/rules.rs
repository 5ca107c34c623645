//! Keyword-rule tables.
//!
//! A rule fires when any of its trigger keywords occurs *anywhere* in the
//! text, case-insensitively. This is plain substring containment: "heart"
//! fires inside "heartburn", "ache" inside "headache". Every firing rule is
//! reported, in declaration order, with no scoring.

/// A (trigger keywords → outcome) association.
#[derive(Debug, Clone)]
pub struct Rule<T> {
    keywords: Vec<String>,
    outcome: T,
}

impl<T> Rule<T> {
    pub fn new(keywords: &[&str], outcome: T) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            outcome,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn outcome(&self) -> &T {
        &self.outcome
    }

    /// Keywords of this rule contained in `lowered`, in declaration order.
    fn matched_in(&self, lowered: &str) -> Vec<&str> {
        self.keywords
            .iter()
            .filter(|k| lowered.contains(k.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// A rule that fired, with the keywords that made it fire.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch<'a, T> {
    pub outcome: &'a T,
    pub matched_keywords: Vec<&'a str>,
}

/// An immutable, ordered table of rules.
#[derive(Debug, Clone)]
pub struct RuleTable<T> {
    rules: Vec<Rule<T>>,
}

impl<T> RuleTable<T> {
    pub fn new(rules: Vec<Rule<T>>) -> Self {
        Self { rules }
    }

    /// Every rule with at least one keyword contained in `text`.
    pub fn matches(&self, text: &str) -> Vec<RuleMatch<'_, T>> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .filter_map(|rule| {
                let matched_keywords = rule.matched_in(&lowered);
                (!matched_keywords.is_empty()).then_some(RuleMatch {
                    outcome: &rule.outcome,
                    matched_keywords,
                })
            })
            .collect()
    }

    /// The first rule (in declaration order) that fires on `text`.
    pub fn first_match(&self, text: &str) -> Option<RuleMatch<'_, T>> {
        let lowered = text.to_lowercase();
        self.rules.iter().find_map(|rule| {
            let matched_keywords = rule.matched_in(&lowered);
            (!matched_keywords.is_empty()).then_some(RuleMatch {
                outcome: &rule.outcome,
                matched_keywords,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RuleTable<&'static str> {
        RuleTable::new(vec![
            Rule::new(&["headache", "nausea"], "migraine"),
            Rule::new(&["heart"], "cardiac"),
            Rule::new(&["nausea", "vomiting"], "gastro"),
        ])
    }

    #[test]
    fn matching_is_case_insensitive_and_unanchored() {
        let t = table();
        let upper = t.matches("HEADACHE present");
        let lower = t.matches("headache");
        assert_eq!(upper.len(), 1);
        assert_eq!(lower.len(), 1);
        assert_eq!(*upper[0].outcome, "migraine");
        assert_eq!(upper[0].matched_keywords, vec!["headache"]);
    }

    #[test]
    fn keyword_matches_inside_longer_word() {
        let t = table();
        let matches = t.matches("occasional heartburn");
        assert_eq!(matches.len(), 1);
        assert_eq!(*matches[0].outcome, "cardiac");
    }

    #[test]
    fn all_matches_returned_in_declaration_order() {
        let t = table();
        let matches = t.matches("vomiting and nausea, heart racing");
        let outcomes: Vec<&str> = matches.iter().map(|m| *m.outcome).collect();
        assert_eq!(outcomes, vec!["migraine", "cardiac", "gastro"]);
        assert_eq!(matches[2].matched_keywords, vec!["nausea", "vomiting"]);
    }

    #[test]
    fn no_match_yields_empty() {
        assert!(table().matches("sprained ankle").is_empty());
        assert!(table().first_match("sprained ankle").is_none());
    }

    #[test]
    fn first_match_respects_order() {
        let t = table();
        let first = t.first_match("nausea").unwrap();
        assert_eq!(*first.outcome, "migraine");
    }

    #[test]
    fn keywords_lowercased_at_construction() {
        let rule = Rule::new(&["Chest Pain"], ());
        assert_eq!(rule.keywords(), &["chest pain".to_string()]);
    }
}
