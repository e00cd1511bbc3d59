//! Structured itinerary fingerprints used to test whether two captures
//! describe the same bookable item.
//!
//! Every identity field is optional: the extraction layer fills in what it
//! can read off the page, and the matcher treats absence as "unverifiable",
//! never as a failure.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::matcher::CaptureIdentity;

/// Booking category, derived from the fingerprint variant.
///
/// Drives the portal earn multiplier in the verdict calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Flight,
    Hotel,
    Rental,
    Other,
}

impl std::fmt::Display for BookingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingType::Flight => write!(f, "flight"),
            BookingType::Hotel => write!(f, "hotel"),
            BookingType::Rental => write!(f, "rental"),
            BookingType::Other => write!(f, "other"),
        }
    }
}

/// Best-effort structured itinerary attached to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItineraryFingerprint {
    Flight {
        #[serde(default)]
        carrier: Option<String>,
        #[serde(default)]
        origin: Option<String>,
        #[serde(default)]
        destination: Option<String>,
        #[serde(default)]
        depart_date: Option<NaiveDate>,
        #[serde(default)]
        return_date: Option<NaiveDate>,
        #[serde(default)]
        passengers: Option<u32>,
    },
    Hotel {
        #[serde(default)]
        property_name: Option<String>,
        #[serde(default)]
        location: Option<String>,
        #[serde(default)]
        check_in: Option<NaiveDate>,
        #[serde(default)]
        check_out: Option<NaiveDate>,
        #[serde(default)]
        guests: Option<u32>,
        #[serde(default)]
        rooms: Option<u32>,
    },
    Rental {
        #[serde(default)]
        company: Option<String>,
        #[serde(default)]
        pickup_location: Option<String>,
        #[serde(default)]
        pickup_date: Option<NaiveDate>,
        #[serde(default)]
        dropoff_date: Option<NaiveDate>,
    },
}

impl ItineraryFingerprint {
    #[must_use]
    pub fn booking_type(&self) -> BookingType {
        match self {
            ItineraryFingerprint::Flight { .. } => BookingType::Flight,
            ItineraryFingerprint::Hotel { .. } => BookingType::Hotel,
            ItineraryFingerprint::Rental { .. } => BookingType::Rental,
        }
    }

    /// Projects the variant-specific fields onto the flat identity the
    /// matcher scores against.
    ///
    /// Flights use the carrier as the "name" and the destination as the
    /// "location"; rentals use the company and pickup location.
    #[must_use]
    pub fn identity(&self) -> CaptureIdentity {
        match self {
            ItineraryFingerprint::Flight {
                carrier,
                destination,
                depart_date,
                return_date,
                passengers,
                ..
            } => CaptureIdentity {
                name: carrier.clone(),
                location: destination.clone(),
                start_date: *depart_date,
                end_date: *return_date,
                guests: *passengers,
                rooms: None,
            },
            ItineraryFingerprint::Hotel {
                property_name,
                location,
                check_in,
                check_out,
                guests,
                rooms,
            } => CaptureIdentity {
                name: property_name.clone(),
                location: location.clone(),
                start_date: *check_in,
                end_date: *check_out,
                guests: *guests,
                rooms: *rooms,
            },
            ItineraryFingerprint::Rental {
                company,
                pickup_location,
                pickup_date,
                dropoff_date,
            } => CaptureIdentity {
                name: company.clone(),
                location: pickup_location.clone(),
                start_date: *pickup_date,
                end_date: *dropoff_date,
                guests: None,
                rooms: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotel_identity_maps_all_fields() {
        let fp = ItineraryFingerprint::Hotel {
            property_name: Some("Hotel Commonwealth".to_string()),
            location: Some("Boston, MA".to_string()),
            check_in: NaiveDate::from_ymd_opt(2025, 3, 1),
            check_out: NaiveDate::from_ymd_opt(2025, 3, 4),
            guests: Some(2),
            rooms: Some(1),
        };
        assert_eq!(fp.booking_type(), BookingType::Hotel);
        let id = fp.identity();
        assert_eq!(id.name.as_deref(), Some("Hotel Commonwealth"));
        assert_eq!(id.guests, Some(2));
        assert_eq!(id.rooms, Some(1));
    }

    #[test]
    fn flight_identity_uses_carrier_and_destination() {
        let fp = ItineraryFingerprint::Flight {
            carrier: Some("United".to_string()),
            origin: Some("BOS".to_string()),
            destination: Some("SFO".to_string()),
            depart_date: NaiveDate::from_ymd_opt(2025, 6, 10),
            return_date: None,
            passengers: Some(1),
        };
        assert_eq!(fp.booking_type(), BookingType::Flight);
        let id = fp.identity();
        assert_eq!(id.name.as_deref(), Some("United"));
        assert_eq!(id.location.as_deref(), Some("SFO"));
        assert_eq!(id.end_date, None);
    }

    #[test]
    fn sparse_fingerprint_deserializes_with_defaults() {
        // Extraction often yields only the tag and one or two fields.
        let fp: ItineraryFingerprint =
            serde_json::from_str(r#"{"type":"rental","company":"Hertz"}"#).unwrap();
        assert_eq!(fp.booking_type(), BookingType::Rental);
        let id = fp.identity();
        assert_eq!(id.name.as_deref(), Some("Hertz"));
        assert!(id.start_date.is_none());
    }
}
