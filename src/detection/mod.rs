//! Tiered keyword classifier for inbound text messages.
//!
//! Matching is a plain case-insensitive pattern search over the whole body.
//! No tokenization, stemming or language detection takes place.

mod rules;

use crate::domain::{ScamCategory, Verdict};

use rules::RULES;

/// Classifies `text`, returning the most severe matching category.
pub fn classify(text: &str) -> Verdict {
    let category = RULES
        .iter()
        .find(|rule| rule.pattern.is_match(text))
        .map(|rule| rule.category)
        .unwrap_or(ScamCategory::Safe);
    Verdict::from(category)
}
