//! Moderation policy shared by every layer that accepts a confession.
//!
//! The HTTP route and the resolver both call into this crate, so the word
//! list and the normalization rules live in exactly one place. Bump
//! [`POLICY_VERSION`] whenever either changes.

pub mod normalize;
pub mod validate;
pub mod wordlist;

use tracing::debug;

pub use normalize::{NormalizedText, normalize, squeeze};
pub use validate::{MAX_MESSAGE_CHARS, ValidationError, validate_message};

/// Version of the word list plus matching rules.
pub const POLICY_VERSION: &str = "1.0.0";

struct Term {
    canonical: String,
    needle: String,
    /// Only set for terms without doubled letters; squeezing a term like
    /// "ass" would otherwise turn it into "as".
    squeezed: Option<String>,
}

/// Static list-based profanity filter.
pub struct WordFilter {
    terms: Vec<Term>,
}

impl WordFilter {
    /// Filter over the canonical list in [`wordlist`].
    pub fn standard() -> Self {
        Self::new(wordlist::standard_terms())
    }

    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .filter_map(|t| {
                let canonical = t.as_ref().trim().to_string();
                if canonical.is_empty() {
                    return None;
                }
                // Same pipeline as the message side, so "xxx" is looked for as "xx"
                let needle = normalize(&canonical).with_spaces;
                let squeezed = (squeeze(&needle) == needle).then(|| needle.clone());
                Some(Term {
                    canonical,
                    needle,
                    squeezed,
                })
            })
            .collect();

        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the listed term found in `text`, if any.
    pub fn check(&self, text: &str) -> Option<&str> {
        let normalized = normalize(text);

        let hit = self.terms.iter().find(|term| {
            normalized.with_spaces.contains(&term.needle)
                || normalized.no_spaces.contains(&term.needle)
                || term
                    .squeezed
                    .as_deref()
                    .is_some_and(|s| normalized.squeezed.contains(s))
        })?;

        debug!("Word filter matched '{}'", hit.canonical);
        Some(hit.canonical.as_str())
    }
}

impl Default for WordFilter {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> WordFilter {
        WordFilter::standard()
    }

    #[test]
    fn clean_messages_pass() {
        let f = filter();
        for msg in [
            "I still sing in the car when nobody is around",
            "Secretly I love pineapple on pizza",
            "मुझे बारिश बहुत पसंद है",
            "I ate the last cookie and blamed my brother",
        ] {
            assert_eq!(f.check(msg), None, "should pass: {}", msg);
        }
    }

    #[test]
    fn listed_terms_rejected_in_any_case() {
        let f = filter();
        assert_eq!(f.check("what the FUCK"), Some("fuck"));
        assert_eq!(f.check("Shit happens"), Some("shit"));
        assert!(f.check("BhEnChOd").is_some());
    }

    #[test]
    fn leetspeak_is_normalized() {
        let f = filter();
        assert!(f.check("sh1t").is_some());
        assert!(f.check("5h!7").is_some());
        assert!(f.check("b!7ch").is_some());
        assert!(f.check("@$$hole").is_some());
    }

    #[test]
    fn repeated_characters_are_collapsed() {
        let f = filter();
        assert_eq!(f.check("fuuuuuuck"), Some("fuck"));
        assert_eq!(f.check("fuuck"), Some("fuck"));
        assert!(f.check("shiiiiiit").is_some());
        assert!(f.check("gaaaaand").is_some());
    }

    #[test]
    fn terms_with_long_runs_still_match() {
        let f = filter();
        assert_eq!(f.check("xxx"), Some("xxx"));
        assert_eq!(f.check("watching XXX videos"), Some("xxx"));
        assert_eq!(f.check("xxxxxxx"), Some("xxx"));
    }

    #[test]
    fn every_listed_term_is_caught() {
        let f = filter();
        for term in wordlist::standard_terms() {
            assert!(f.check(term).is_some(), "listed term passed: {}", term);
            assert!(f.check(&term.to_uppercase()).is_some(), "uppercase term passed: {}", term);
            assert!(
                f.check(&format!("well {} then", term)).is_some(),
                "embedded term passed: {}",
                term
            );
        }
    }

    #[test]
    fn spaced_letters_are_joined() {
        let f = filter();
        assert_eq!(f.check("f u c k"), Some("fuck"));
        assert!(f.check("s\th\ti\tt").is_some());
    }

    #[test]
    fn devanagari_terms_rejected() {
        let f = filter();
        assert!(f.check("तू चूतिया है").is_some());
    }

    #[test]
    fn doubled_letter_terms_are_not_squeezed() {
        let f = WordFilter::new(["ass"]);
        assert_eq!(f.check("it was fine"), None);
        assert!(f.check("asssss").is_some());
    }

    #[test]
    fn custom_list_ignores_blank_entries() {
        let f = WordFilter::new(["", "  ", "Bad"]);
        assert_eq!(f.len(), 1);
        assert_eq!(f.check("so bad"), Some("Bad"));
    }
}
