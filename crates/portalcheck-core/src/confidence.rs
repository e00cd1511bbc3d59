//! Extraction-quality tiers attached to snapshots, matches, and verdicts.

use serde::{Deserialize, Serialize};

/// Ordered confidence tier: `Low < Med < High`.
///
/// A derived value (match result, verdict) never reports higher confidence
/// than the least confident input that fed it, so the natural combinator is
/// [`Ord::min`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Low,
    Med,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "LOW"),
            Confidence::Med => write!(f, "MED"),
            Confidence::High => write!(f, "HIGH"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_totally_ordered() {
        assert!(Confidence::Low < Confidence::Med);
        assert!(Confidence::Med < Confidence::High);
    }

    #[test]
    fn min_picks_the_weaker_tier() {
        assert_eq!(Confidence::High.min(Confidence::Low), Confidence::Low);
        assert_eq!(Confidence::Med.min(Confidence::High), Confidence::Med);
    }

    #[test]
    fn wire_format_is_uppercase() {
        let json = serde_json::to_string(&Confidence::Med).unwrap();
        assert_eq!(json, "\"MED\"");
        let back: Confidence = serde_json::from_str("\"HIGH\"").unwrap();
        assert_eq!(back, Confidence::High);
    }
}
