use super::domain::Review;

pub const REVIEW_MESSAGE_PREFIX: &str = "Your application has been placed in review";

const DEFAULT_REVIEW_SUFFIX: &str =
    " because of suspicious account behaviour. Please contact support ASAP.";

/// A single keyword rule matched against the review reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewRule {
    pub keyword: &'static str,
    pub suffix: &'static str,
}

impl ReviewRule {
    fn matches(&self, reason: &str) -> bool {
        reason.contains(self.keyword)
    }
}

/// Evaluated top-down; the first matching rule wins.
pub const REVIEW_RULES: &[ReviewRule] = &[
    ReviewRule {
        keyword: "address",
        suffix: " pending outstanding address verification for FICA purposes.",
    },
    ReviewRule {
        keyword: "bank",
        suffix: " pending outstanding bank account verification.",
    },
];

pub fn review_message_suffix(reason: Option<&str>) -> &'static str {
    reason
        .and_then(|reason| REVIEW_RULES.iter().find(|rule| rule.matches(reason)))
        .map(|rule| rule.suffix)
        .unwrap_or(DEFAULT_REVIEW_SUFFIX)
}

/// Advisory text shown to applicants whose application is held in review.
pub fn review_message(review: Option<&Review>) -> String {
    let reason = review.and_then(|review| review.reason.as_deref());
    format!("{REVIEW_MESSAGE_PREFIX}{}", review_message_suffix(reason))
}
