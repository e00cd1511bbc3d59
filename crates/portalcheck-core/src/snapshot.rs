//! Captured price snapshots and the page/site metadata around them.
//!
//! ## Shape notes
//!
//! Snapshots are produced by best-effort extraction in the browser layer, so
//! every identity field downstream of the price is optional and nothing here
//! is allowed to panic on absence. The price itself is the one hard
//! requirement: a snapshot with a non-positive amount or an unknown currency
//! code is rejected at the engine boundary and never stored.
//!
//! Snapshots are immutable once constructed. A later capture of the same
//! side supersedes the earlier one wholesale; fields are never patched in
//! place.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;
use crate::error::SnapshotError;
use crate::fingerprint::ItineraryFingerprint;

/// Amounts above this are assumed to be extraction garbage (e.g. a phone
/// number scraped as a price) and rejected at the boundary.
const MAX_PLAUSIBLE_AMOUNT: i64 = 1_000_000_000;

/// How the price landed in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    /// Scraped automatically from the page.
    Auto,
    /// Entered or corrected by the user.
    Manual,
}

/// What the extracted number claims to represent.
///
/// Only `Total` is trusted as-is by the verdict calculator; anything else
/// gets an assumption note so the user can audit the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceLabel {
    Total,
    PerNight,
    BaseFare,
    Unknown,
}

/// An immutable, timestamped price capture from one booking channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    /// Extracted price. Must be positive.
    pub amount: Decimal,
    /// ISO 4217 currency code, e.g. `"USD"`.
    pub currency: String,
    /// Extraction quality for this price.
    pub confidence: Confidence,
    /// What the number claims to be.
    pub label: PriceLabel,
    /// When the extraction ran.
    pub extracted_at: DateTime<Utc>,
    /// Automatic scrape or manual entry.
    pub source: PriceSource,
}

impl PriceSnapshot {
    /// Checks the boundary invariants: positive, plausible amount and a
    /// known currency code.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] describing the first violated invariant.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.amount <= Decimal::ZERO {
            return Err(SnapshotError::NonPositiveAmount(self.amount));
        }
        if self.amount > Decimal::from(MAX_PLAUSIBLE_AMOUNT) {
            return Err(SnapshotError::ImplausibleAmount(self.amount));
        }
        if !is_valid_currency(&self.currency) {
            return Err(SnapshotError::UnknownCurrency(self.currency.clone()));
        }
        Ok(())
    }
}

/// Where a snapshot was captured, kept for audit notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub host: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub page_title: Option<String>,
}

/// A capture from the loyalty-card travel portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalSnapshot {
    pub total_price: PriceSnapshot,
    #[serde(default)]
    pub itinerary: Option<ItineraryFingerprint>,
    pub site: SiteMetadata,
    pub captured_at: DateTime<Utc>,
}

impl PortalSnapshot {
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the total price fails boundary checks.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        self.total_price.validate()
    }
}

/// A capture from a direct-booking site for the same trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectSnapshot {
    pub total_price: PriceSnapshot,
    #[serde(default)]
    pub itinerary: Option<ItineraryFingerprint>,
    pub site: SiteMetadata,
    pub captured_at: DateTime<Utc>,
}

impl DirectSnapshot {
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the total price fails boundary checks.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        self.total_price.validate()
    }
}

/// What kind of page the browser layer says the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    /// A portal checkout/review page, eligible for portal capture.
    PortalReview,
    /// A direct-booking site, eligible for direct capture.
    DirectSite,
    /// Anything else.
    Other,
}

/// Page signal carried by `PAGE_CONTEXT_UPDATED` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    pub kind: PageKind,
    pub url: String,
    pub host: String,
}

/// Circulating ISO 4217 codes we accept from extraction.
///
/// Deliberately a closed table: for financial advice, rejecting an
/// unfamiliar code beats comparing prices in a currency we cannot vouch
/// for.
const CURRENCIES: &[&str] = &[
    "AED", "AUD", "BRL", "CAD", "CHF", "CLP", "CNY", "COP", "CZK", "DKK", "EUR", "GBP", "HKD",
    "HUF", "IDR", "ILS", "INR", "ISK", "JPY", "KRW", "MAD", "MXN", "MYR", "NOK", "NZD", "PEN",
    "PHP", "PLN", "RON", "SAR", "SEK", "SGD", "THB", "TRY", "TWD", "USD", "VND", "ZAR",
];

/// Returns `true` if `code` is a known ISO 4217 currency code.
#[must_use]
pub fn is_valid_currency(code: &str) -> bool {
    CURRENCIES.contains(&code)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn price(amount: &str, currency: &str) -> PriceSnapshot {
        PriceSnapshot {
            amount: amount.parse().unwrap(),
            currency: currency.to_string(),
            confidence: Confidence::High,
            label: PriceLabel::Total,
            extracted_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            source: PriceSource::Auto,
        }
    }

    #[test]
    fn valid_snapshot_passes() {
        assert!(price("499.99", "USD").validate().is_ok());
    }

    #[test]
    fn zero_amount_is_rejected() {
        let err = price("0", "USD").validate().unwrap_err();
        assert!(matches!(err, SnapshotError::NonPositiveAmount(_)));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = price("-12.50", "USD").validate().unwrap_err();
        assert!(matches!(err, SnapshotError::NonPositiveAmount(_)));
    }

    #[test]
    fn absurd_amount_is_rejected() {
        let err = price("99999999999", "USD").validate().unwrap_err();
        assert!(matches!(err, SnapshotError::ImplausibleAmount(_)));
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let err = price("100", "XXX").validate().unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownCurrency(ref c) if c == "XXX"));
    }

    #[test]
    fn lowercase_currency_is_rejected() {
        // Extraction must normalize case before handing us a snapshot.
        let err = price("100", "usd").validate().unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownCurrency(_)));
    }

    #[test]
    fn price_snapshot_round_trips_through_json() {
        let snap = price("123.45", "EUR");
        let json = serde_json::to_string(&snap).unwrap();
        let back: PriceSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.amount, snap.amount);
        assert_eq!(back.currency, "EUR");
        assert_eq!(back.confidence, Confidence::High);
    }
}
