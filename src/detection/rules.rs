use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::ScamCategory;

pub struct Rule {
    pub category: ScamCategory,
    pub pattern: Regex,
}

impl Rule {
    fn new(category: ScamCategory, pattern: &str) -> Self {
        Self {
            category,
            pattern: Regex::new(&format!("(?i){pattern}")).expect("valid scam rule regex"),
        }
    }
}

/// Rules in descending severity; the first match wins.
pub static RULES: Lazy<[Rule; 3]> = Lazy::new(|| {
    [
        // Asking for a PIN to *receive* money, or to approve a collect request.
        Rule::new(
            ScamCategory::UpiPinScam,
            r"enter.*upi pin.*receive money|approve.*request.*receive|payment request.*approve|requested money from you|claim.*cashback.*pin",
        ),
        Rule::new(
            ScamCategory::OtpScam,
            r"share.*otp|share.*one time password|enter.*otp.*authorize|forward this code",
        ),
        Rule::new(
            ScamCategory::GenericScam,
            r"congratulations|you have won|lottery|prize|urgent|act now|account blocked|verify your pin|kyc|bit\.ly",
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_are_ordered_by_tier() {
        let tiers: Vec<_> = RULES.iter().map(|rule| rule.category.tier()).collect();
        assert_eq!(tiers, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn wildcards_do_not_cross_lines() {
        let upi = &RULES[0].pattern;
        assert!(upi.is_match("enter your upi pin to receive money"));
        assert!(!upi.is_match("enter your upi pin\nto receive money"));
    }
}
