//! Fingerprint matcher: scores how likely two captures describe the same
//! bookable item.
//!
//! Pure and total — malformed or missing identity fields can only lower the
//! score, never raise an error. The result is advisory: a weak match caps
//! the verdict's reported confidence but does not block computing one.
//!
//! # Weights
//!
//! | Component | Points | Award rule |
//! |-----------|--------|------------|
//! | Name      | 40     | scaled by token-overlap similarity (0–100) |
//! | Dates     | 30     | all-or-nothing on exact equality of both dates |
//! | Occupancy | 15     | all-or-nothing on (guests, rooms) |
//! | Location  | 15     | scaled by containment / token overlap |
//!
//! A missing input contributes zero (never a penalty) and appends a
//! specific warning, so noisy extraction is not punished twice.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;

const NAME_WEIGHT: f64 = 40.0;
const DATES_WEIGHT: f64 = 30.0;
const OCCUPANCY_WEIGHT: f64 = 15.0;
const LOCATION_WEIGHT: f64 = 15.0;

/// Flat identity fields the matcher compares, projected from an
/// [`crate::ItineraryFingerprint`] on each side. Every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureIdentity {
    pub name: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub guests: Option<u32>,
    pub rooms: Option<u32>,
}

/// Per-component breakdown of a match score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDetails {
    /// Name similarity 0–100 (before weighting). Zero when unverifiable.
    pub name_score: f64,
    /// True only when both date pairs were present and exactly equal.
    pub dates_match: bool,
    /// True only when occupancy was present on both sides and equal.
    pub occupancy_match: bool,
    /// Location similarity 0–100 (before weighting). Zero when unverifiable.
    pub location_score: f64,
}

/// Outcome of comparing two capture identities. Derived on demand, never
/// persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub is_match: bool,
    pub confidence: Confidence,
    /// Overall weighted score in 0–100.
    pub score: f64,
    pub details: MatchDetails,
    pub warnings: Vec<String>,
}

/// Scores how likely `portal` and `direct` describe the same purchase.
#[must_use]
pub fn score_match(portal: &CaptureIdentity, direct: &CaptureIdentity) -> MatchResult {
    let mut warnings = Vec::new();

    // Name: scaled award.
    let name_score = match (&portal.name, &direct.name) {
        (Some(a), Some(b)) => token_similarity(a, b),
        _ => {
            warnings.push("Could not verify name match".to_string());
            0.0
        }
    };

    // Dates: all-or-nothing; both pairs must be present and exactly equal.
    let dates_present = portal.start_date.is_some()
        && portal.end_date.is_some()
        && direct.start_date.is_some()
        && direct.end_date.is_some();
    let dates_match = dates_present
        && portal.start_date == direct.start_date
        && portal.end_date == direct.end_date;
    if !dates_present {
        warnings.push("Could not verify date match".to_string());
    }

    // Occupancy: all-or-nothing on (guests, rooms). Guests anchor the
    // check; a room count missing on both sides counts as agreement.
    let occupancy_present = portal.guests.is_some() && direct.guests.is_some();
    let occupancy_match =
        occupancy_present && portal.guests == direct.guests && portal.rooms == direct.rooms;
    if !occupancy_present {
        warnings.push("Could not verify occupancy match".to_string());
    }

    // Location: scaled award, containment counts as a full hit.
    let location_score = match (&portal.location, &direct.location) {
        (Some(a), Some(b)) => location_similarity(a, b),
        _ => {
            warnings.push("Could not verify location match".to_string());
            0.0
        }
    };

    let score = (NAME_WEIGHT * name_score / 100.0
        + if dates_match { DATES_WEIGHT } else { 0.0 }
        + if occupancy_match { OCCUPANCY_WEIGHT } else { 0.0 }
        + LOCATION_WEIGHT * location_score / 100.0)
        .clamp(0.0, 100.0);

    let (is_match, confidence) = if score >= 80.0 {
        (true, Confidence::High)
    } else if score >= 50.0 {
        (true, Confidence::Med)
    } else if score >= 30.0 {
        warnings.push("Low-scoring match - verify the two bookings manually".to_string());
        (true, Confidence::Low)
    } else {
        warnings.push("Could not confidently match the two bookings".to_string());
        (false, Confidence::Low)
    };

    MatchResult {
        is_match,
        confidence,
        score,
        details: MatchDetails {
            name_score,
            dates_match,
            occupancy_match,
            location_score,
        },
        warnings,
    }
}

// ---------------------------------------------------------------------------
// String similarity helpers
// ---------------------------------------------------------------------------

/// Lowercases and splits on non-alphanumeric boundaries, dropping empties.
fn tokens(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Dice coefficient over token multisets, scaled to 0–100.
///
/// Identical strings score 100; disjoint token sets score 0. Token order
/// does not matter ("Commonwealth Hotel" == "Hotel Commonwealth").
fn token_similarity(a: &str, b: &str) -> f64 {
    let ta = tokens(a);
    let mut tb = tokens(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let total = ta.len() + tb.len();
    let mut common = 0usize;
    for t in &ta {
        if let Some(pos) = tb.iter().position(|u| u == t) {
            tb.swap_remove(pos);
            common += 1;
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let score = 200.0 * common as f64 / total as f64;
    score.clamp(0.0, 100.0)
}

/// Location similarity: full credit when one normalized string contains the
/// other ("Boston" vs "Boston, MA"), token overlap otherwise.
fn location_similarity(a: &str, b: &str) -> f64 {
    let na = tokens(a).join(" ");
    let nb = tokens(b).join(" ");
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    if na.contains(&nb) || nb.contains(&na) {
        return 100.0;
    }
    token_similarity(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel_identity() -> CaptureIdentity {
        CaptureIdentity {
            name: Some("Hotel Commonwealth".to_string()),
            location: Some("Boston, MA".to_string()),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 4),
            guests: Some(2),
            rooms: Some(1),
        }
    }

    #[test]
    fn identical_identities_are_a_high_confidence_match() {
        let result = score_match(&hotel_identity(), &hotel_identity());
        assert!(
            result.score >= 80.0,
            "expected score >= 80, got {}",
            result.score
        );
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.is_match);
        assert!(result.details.dates_match);
        assert!(result.details.occupancy_match);
    }

    #[test]
    fn missing_dates_drops_exactly_the_date_weight() {
        let full = score_match(&hotel_identity(), &hotel_identity());

        let mut direct = hotel_identity();
        direct.start_date = None;
        direct.end_date = None;
        let partial = score_match(&hotel_identity(), &direct);

        assert!(!partial.details.dates_match);
        assert!(
            partial
                .warnings
                .iter()
                .any(|w| w.contains("date")),
            "expected a date-verification warning, got {:?}",
            partial.warnings
        );
        let diff = full.score - partial.score;
        assert!(
            (diff - 30.0).abs() < f64::EPSILON,
            "expected exactly 30 points lower, got diff {diff}"
        );
    }

    #[test]
    fn unequal_dates_lose_the_award_without_a_warning() {
        let mut direct = hotel_identity();
        direct.end_date = NaiveDate::from_ymd_opt(2025, 3, 5);
        let result = score_match(&hotel_identity(), &direct);
        assert!(!result.details.dates_match);
        // Dates were present, just different: a real mismatch, not noise.
        assert!(!result.warnings.iter().any(|w| w.contains("date")));
    }

    #[test]
    fn token_order_does_not_matter_for_names() {
        let mut direct = hotel_identity();
        direct.name = Some("Commonwealth Hotel".to_string());
        let result = score_match(&hotel_identity(), &direct);
        assert!(
            (result.details.name_score - 100.0).abs() < f64::EPSILON,
            "reordered tokens should still score 100, got {}",
            result.details.name_score
        );
    }

    #[test]
    fn location_containment_scores_full_credit() {
        let mut direct = hotel_identity();
        direct.location = Some("Boston".to_string());
        let result = score_match(&hotel_identity(), &direct);
        assert!((result.details.location_score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_identities_never_panic_and_do_not_match() {
        let result = score_match(&CaptureIdentity::default(), &CaptureIdentity::default());
        assert!(!result.is_match);
        assert_eq!(result.confidence, Confidence::Low);
        assert!(result.score < 30.0);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("confidently match")));
        // One warning per unverifiable component, plus the no-match notice.
        assert_eq!(result.warnings.len(), 5);
    }

    #[test]
    fn mid_band_scores_are_a_medium_confidence_match() {
        // Dates + occupancy + location agree (60 pts), names disjoint.
        let mut direct = hotel_identity();
        direct.name = Some("Harborside Inn".to_string());
        let result = score_match(&hotel_identity(), &direct);
        assert!(result.score >= 50.0 && result.score < 80.0);
        assert_eq!(result.confidence, Confidence::Med);
        assert!(result.is_match);
    }

    #[test]
    fn score_is_monotonic_in_name_similarity() {
        // Same identity except the name drifts further from the portal's.
        let names = [
            "Hotel Commonwealth",          // identical
            "Hotel Commonwealth Boston",   // one extra token
            "Commonwealth Suites Boston",  // one shared token of three
            "Harborside Inn",              // disjoint
        ];
        let mut last = f64::INFINITY;
        for name in names {
            let mut direct = hotel_identity();
            direct.name = Some(name.to_string());
            let result = score_match(&hotel_identity(), &direct);
            assert!(
                result.score <= last,
                "score must not increase as name similarity drops: {name} scored {} after {last}",
                result.score
            );
            last = result.score;
        }
    }

    #[test]
    fn partial_name_overlap_scales_the_award() {
        let sim = token_similarity("Hotel Commonwealth", "Commonwealth Suites Boston");
        // One shared token out of 2 + 3 tokens: 200 * 1 / 5 = 40.
        assert!((sim - 40.0).abs() < f64::EPSILON, "got {sim}");
    }
}
