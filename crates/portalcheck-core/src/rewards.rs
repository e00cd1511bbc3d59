//! Points-valuation configuration for the verdict calculator.
//!
//! The earn multipliers and the miles valuation are configuration, not
//! contract: card products change their rates, and users disagree about
//! what a mile is worth. Defaults carry the documented card rates; a YAML
//! file can override any of them.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fingerprint::BookingType;

/// Earn rates and valuation knobs used to turn points into dollars.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardsConfig {
    /// Portal earn multiplier on flight bookings.
    pub flight_multiplier: Decimal,
    /// Portal earn multiplier on hotel bookings.
    pub hotel_multiplier: Decimal,
    /// Portal earn multiplier on rental-car bookings.
    pub rental_multiplier: Decimal,
    /// Portal earn multiplier when the booking type is unknown.
    pub base_multiplier: Decimal,
    /// Earn multiplier for spend outside the portal (the card's everyday
    /// rate, applied to the direct booking).
    pub direct_multiplier: Decimal,
    /// Dollar value assigned to one mile (e.g. `0.017` = 1.7 cents).
    pub miles_valuation: Decimal,
    /// Absolute dollar band within which the two channels are called a tie.
    pub tie_epsilon: Decimal,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            flight_multiplier: Decimal::from(5),
            hotel_multiplier: Decimal::from(10),
            rental_multiplier: Decimal::from(10),
            base_multiplier: Decimal::from(2),
            direct_multiplier: Decimal::from(2),
            // 1.7 cents per mile.
            miles_valuation: Decimal::new(17, 3),
            tie_epsilon: Decimal::ONE,
        }
    }
}

impl RewardsConfig {
    /// Portal earn multiplier for the given booking type.
    #[must_use]
    pub fn portal_multiplier(&self, booking_type: BookingType) -> Decimal {
        match booking_type {
            BookingType::Flight => self.flight_multiplier,
            BookingType::Hotel => self.hotel_multiplier,
            BookingType::Rental => self.rental_multiplier,
            BookingType::Other => self.base_multiplier,
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any multiplier or the valuation
    /// is non-positive, or the tie epsilon is negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let multipliers = [
            ("flight_multiplier", self.flight_multiplier),
            ("hotel_multiplier", self.hotel_multiplier),
            ("rental_multiplier", self.rental_multiplier),
            ("base_multiplier", self.base_multiplier),
            ("direct_multiplier", self.direct_multiplier),
        ];
        for (field, value) in multipliers {
            if value <= Decimal::ZERO {
                return Err(ConfigError::Validation(format!(
                    "{field} must be positive, got {value}"
                )));
            }
        }
        if self.miles_valuation <= Decimal::ZERO {
            return Err(ConfigError::Validation(format!(
                "miles_valuation must be positive, got {}",
                self.miles_valuation
            )));
        }
        if self.tie_epsilon < Decimal::ZERO {
            return Err(ConfigError::Validation(format!(
                "tie_epsilon must not be negative, got {}",
                self.tie_epsilon
            )));
        }
        Ok(())
    }
}

/// Load and validate a rewards configuration from a YAML file.
///
/// Omitted fields fall back to the defaults, so a file overriding only
/// `miles_valuation` is valid.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_rewards(path: &Path) -> Result<RewardsConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RewardsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let config: RewardsConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_documented_rates() {
        let cfg = RewardsConfig::default();
        assert_eq!(cfg.portal_multiplier(BookingType::Flight), Decimal::from(5));
        assert_eq!(cfg.portal_multiplier(BookingType::Hotel), Decimal::from(10));
        assert_eq!(
            cfg.portal_multiplier(BookingType::Rental),
            Decimal::from(10)
        );
        assert_eq!(cfg.portal_multiplier(BookingType::Other), Decimal::from(2));
        assert_eq!(cfg.miles_valuation, Decimal::new(17, 3));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let cfg: RewardsConfig = serde_yaml::from_str("miles_valuation: \"0.012\"\n").unwrap();
        assert_eq!(cfg.miles_valuation, Decimal::new(12, 3));
        assert_eq!(cfg.flight_multiplier, Decimal::from(5));
    }

    #[test]
    fn zero_multiplier_fails_validation() {
        let cfg = RewardsConfig {
            hotel_multiplier: Decimal::ZERO,
            ..RewardsConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("hotel_multiplier")));
    }

    #[test]
    fn negative_epsilon_fails_validation() {
        let cfg = RewardsConfig {
            tie_epsilon: Decimal::from(-1),
            ..RewardsConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = load_rewards(Path::new("/nonexistent/rewards.yaml")).unwrap_err();
        assert!(
            matches!(err, ConfigError::RewardsFileIo { ref path, .. } if path.contains("nonexistent"))
        );
    }
}
