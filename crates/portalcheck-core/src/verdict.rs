//! Verdict calculator: break-even analysis between the portal price and the
//! direct price under a points-valuation model.
//!
//! The portal may charge more and still win, because portal bookings earn
//! miles at a higher rate. The break-even premium is the extra dollars the
//! portal can cost while the differential miles, valued in currency, make
//! up the gap. The notes and assumptions on the result are a deliverable:
//! this is financial advice, and the user must be able to audit which
//! multiplier and valuation produced the recommendation.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;
use crate::fingerprint::BookingType;
use crate::matcher::MatchResult;
use crate::rewards::RewardsConfig;
use crate::snapshot::{DirectSnapshot, PortalSnapshot, PriceLabel};
use thiserror::Error;

/// Which channel the engine recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Portal,
    Direct,
    Tie,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Portal => write!(f, "portal"),
            Winner::Direct => write!(f, "direct"),
            Winner::Tie => write!(f, "tie"),
        }
    }
}

/// The financial recommendation. Computed exactly once per session, cached
/// in the flow context until reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub portal_price: Decimal,
    pub direct_price: Decimal,
    pub currency: String,
    /// `portal_price - direct_price`; positive when the portal costs more.
    pub delta: Decimal,
    /// Delta as a percentage of the direct price, 2 decimal places.
    pub delta_percent: Decimal,
    /// Extra dollars the portal may cost while remaining equal value.
    pub break_even_premium: Decimal,
    pub portal_points_earned: i64,
    pub direct_points_earned: i64,
    pub portal_points_value: Decimal,
    pub direct_points_value: Decimal,
    pub winner: Winner,
    /// `|delta - break_even_premium|`: how decisively the winner wins.
    pub net_difference: Decimal,
    pub confidence: Confidence,
    /// Human-readable explanation of the recommendation.
    pub notes: Vec<String>,
    /// Every default or unverified input that fed the numbers.
    pub assumptions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum VerdictError {
    #[error("currency mismatch: portal is {portal}, direct is {direct}")]
    CurrencyMismatch { portal: String, direct: String },

    #[error("{side} price must be positive, got {amount}")]
    NonPositivePrice { side: &'static str, amount: Decimal },
}

/// Computes the recommendation from two confirmed snapshots.
///
/// `match_result` is advisory: when present, its confidence caps the
/// verdict's; when absent, an assumption is recorded instead. Missing
/// optional fields (no itinerary, odd price labels) fall back to defaults
/// with an assumption note rather than failing.
///
/// # Errors
///
/// Returns [`VerdictError::CurrencyMismatch`] when the snapshots are in
/// different currencies, and [`VerdictError::NonPositivePrice`] when either
/// price is not positive. No other failure modes exist.
pub fn compute_verdict(
    portal: &PortalSnapshot,
    direct: &DirectSnapshot,
    match_result: Option<&MatchResult>,
    rewards: &RewardsConfig,
) -> Result<Verdict, VerdictError> {
    let portal_price = portal.total_price.amount;
    let direct_price = direct.total_price.amount;

    if portal_price <= Decimal::ZERO {
        return Err(VerdictError::NonPositivePrice {
            side: "portal",
            amount: portal_price,
        });
    }
    if direct_price <= Decimal::ZERO {
        return Err(VerdictError::NonPositivePrice {
            side: "direct",
            amount: direct_price,
        });
    }
    if portal.total_price.currency != direct.total_price.currency {
        return Err(VerdictError::CurrencyMismatch {
            portal: portal.total_price.currency.clone(),
            direct: direct.total_price.currency.clone(),
        });
    }
    let currency = portal.total_price.currency.clone();

    let mut notes = Vec::new();
    let mut assumptions = Vec::new();

    let booking_type = match &portal.itinerary {
        Some(fp) => fp.booking_type(),
        None => {
            assumptions
                .push("no itinerary was extracted; using the base earn multiplier".to_string());
            BookingType::Other
        }
    };
    let portal_multiplier = rewards.portal_multiplier(booking_type);

    note_price_label(&mut assumptions, "portal", portal.total_price.label);
    note_price_label(&mut assumptions, "direct", direct.total_price.label);

    let delta = portal_price - direct_price;
    let delta_percent = (delta / direct_price * Decimal::ONE_HUNDRED).round_dp(2);

    // Points are whole miles: earn is floored, never rounded up.
    let portal_points = floor_points(portal_price * portal_multiplier);
    let direct_points = floor_points(direct_price * rewards.direct_multiplier);

    let portal_points_value = Decimal::from(portal_points) * rewards.miles_valuation;
    let direct_points_value = Decimal::from(direct_points) * rewards.miles_valuation;
    let break_even_premium = Decimal::from(portal_points - direct_points) * rewards.miles_valuation;

    let epsilon = rewards.tie_epsilon;
    let winner = if (delta - break_even_premium).abs() <= epsilon {
        Winner::Tie
    } else if delta <= break_even_premium + epsilon {
        Winner::Portal
    } else {
        Winner::Direct
    };
    let net_difference = (delta - break_even_premium).abs();

    let mut confidence = portal
        .total_price
        .confidence
        .min(direct.total_price.confidence);
    match match_result {
        Some(m) => {
            confidence = confidence.min(m.confidence);
            // Match warnings are part of the audit trail.
            assumptions.extend(m.warnings.iter().cloned());
        }
        None => {
            assumptions.push(
                "itinerary match was not verified; assuming both captures describe the same booking"
                    .to_string(),
            );
        }
    }

    notes.push(format!(
        "portal earns {portal_multiplier}x miles on {booking_type} bookings; \
         direct spend earns {}x",
        rewards.direct_multiplier
    ));
    notes.push(format!(
        "miles valued at {} {currency} each",
        rewards.miles_valuation
    ));
    match winner {
        Winner::Portal => notes.push(format!(
            "portal costs {delta} {currency} more but the extra miles are worth \
             {break_even_premium} {currency}; portal wins by {net_difference} {currency}"
        )),
        Winner::Direct => notes.push(format!(
            "portal premium of {delta} {currency} exceeds the {break_even_premium} {currency} \
             break-even; direct wins by {net_difference} {currency}"
        )),
        Winner::Tie => notes.push(format!(
            "difference is within the {epsilon} {currency} tie band; either channel is fine"
        )),
    }

    Ok(Verdict {
        portal_price,
        direct_price,
        currency,
        delta,
        delta_percent,
        break_even_premium,
        portal_points_earned: portal_points,
        direct_points_earned: direct_points,
        portal_points_value,
        direct_points_value,
        winner,
        net_difference,
        confidence,
        notes,
        assumptions,
        created_at: Utc::now(),
    })
}

/// Floors a miles balance to a whole number.
///
/// Prices are boundary-validated below 1e9 and multipliers are small, so
/// the product always fits an i64; the fallback is unreachable in practice.
fn floor_points(amount: Decimal) -> i64 {
    amount.floor().to_i64().unwrap_or(i64::MAX)
}

fn note_price_label(assumptions: &mut Vec<String>, side: &str, label: PriceLabel) {
    match label {
        PriceLabel::Total => {}
        PriceLabel::PerNight => assumptions.push(format!(
            "{side} price was labeled per-night, not a stay total"
        )),
        PriceLabel::BaseFare => assumptions.push(format!(
            "{side} price was labeled base fare and may exclude taxes and fees"
        )),
        PriceLabel::Unknown => assumptions.push(format!(
            "{side} price label could not be determined; treating it as a total"
        )),
    }
}
