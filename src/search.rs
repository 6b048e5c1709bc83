//! Fuzzy matching for the searchable tables.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Case-insensitive fuzzy matcher.
///
/// Pattern characters must appear in order but not necessarily next to
/// each other, so `"msj"` finds `"Masaje Relajante"`.
pub struct Matcher {
    inner: SkimMatcherV2,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            inner: SkimMatcherV2::default().ignore_case(),
        }
    }

    pub fn matches(&self, text: &str, pattern: &str) -> bool {
        self.score(text, pattern).is_some()
    }

    /// Higher is better; `None` when the pattern does not match.
    pub fn score(&self, text: &str, pattern: &str) -> Option<i64> {
        self.inner.fuzzy_match(text, pattern.trim())
    }

    pub fn matches_any<'a>(&self, texts: impl IntoIterator<Item = &'a str>, pattern: &str) -> bool {
        texts.into_iter().any(|text| self.matches(text, pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_match() {
        let matcher = Matcher::new();

        assert!(matcher.matches("Masaje Relajante 60min", "msj"));
        assert!(matcher.matches("Clínica Dental Sonrisa", "dental"));
        assert!(matcher.matches("Cena Degustación", "CENA"));
        assert!(matcher.matches("Barbería Premium", "barbería"));
        assert!(!matcher.matches("Consulta Dental", "spa"));
    }

    #[test]
    fn test_matches_any() {
        let matcher = Matcher::new();
        let fields = ["Entrenamiento Personal", "FitLife Gym", "Plaza Mayor 789, Madrid"];

        assert!(matcher.matches_any(fields, "gym"));
        assert!(matcher.matches_any(fields, "madrid"));
        assert!(!matcher.matches_any(fields, "barcelona"));
    }

    #[test]
    fn test_score_prefers_tighter_matches() {
        let matcher = Matcher::new();

        let tight = matcher.score("Spa Wellness Center", "spa").unwrap();
        let loose = matcher.score("Salón de Peluquería Alta", "spa").unwrap();
        assert!(tight > loose);
        assert!(matcher.score("Spa", "xyz").is_none());
    }
}
