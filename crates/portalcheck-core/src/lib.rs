pub mod app_config;
pub mod config;
pub mod confidence;
pub mod error;
pub mod fingerprint;
pub mod matcher;
pub mod rewards;
pub mod snapshot;
pub mod verdict;

pub use app_config::{AppConfig, Environment};
pub use confidence::Confidence;
pub use error::{ConfigError, SnapshotError};
pub use fingerprint::{BookingType, ItineraryFingerprint};
pub use matcher::{score_match, CaptureIdentity, MatchDetails, MatchResult};
pub use rewards::{load_rewards, RewardsConfig};
pub use snapshot::{
    DirectSnapshot, PageContext, PageKind, PortalSnapshot, PriceLabel, PriceSnapshot, PriceSource,
    SiteMetadata,
};
pub use verdict::{compute_verdict, Verdict, VerdictError, Winner};
