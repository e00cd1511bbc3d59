//! One-shot comparison of two snapshot files, bypassing the session flow.

use std::path::Path;

use anyhow::Context as _;
use serde::Serialize;

use portalcheck_core::{
    compute_verdict, score_match, CaptureIdentity, DirectSnapshot, MatchResult, PortalSnapshot,
    RewardsConfig, Verdict,
};

#[derive(Debug, Serialize)]
struct Report<'a> {
    #[serde(rename = "match")]
    match_result: &'a MatchResult,
    verdict: &'a Verdict,
}

pub(crate) fn run(portal: &Path, direct: &Path, rewards: &RewardsConfig) -> anyhow::Result<()> {
    let portal: PortalSnapshot = read_snapshot(portal)?;
    let direct: DirectSnapshot = read_snapshot(direct)?;
    portal.validate().context("portal snapshot")?;
    direct.validate().context("direct snapshot")?;

    let portal_identity = identity_of(portal.itinerary.as_ref());
    let direct_identity = identity_of(direct.itinerary.as_ref());
    let match_result = score_match(&portal_identity, &direct_identity);

    let verdict = compute_verdict(&portal, &direct, Some(&match_result), rewards)?;

    let report = Report {
        match_result: &match_result,
        verdict: &verdict,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_snapshot<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid snapshot {}", path.display()))
}

fn identity_of(itinerary: Option<&portalcheck_core::ItineraryFingerprint>) -> CaptureIdentity {
    itinerary.map_or_else(CaptureIdentity::default, |fp| fp.identity())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use portalcheck_core::{
        Confidence, PriceLabel, PriceSnapshot, PriceSource, RewardsConfig, SiteMetadata,
    };

    use super::*;

    fn snapshot_pair() -> (PortalSnapshot, DirectSnapshot) {
        let price = |amount: &str| PriceSnapshot {
            amount: amount.parse().unwrap(),
            currency: "USD".to_string(),
            confidence: Confidence::High,
            label: PriceLabel::Total,
            extracted_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            source: PriceSource::Auto,
        };
        let site = |host: &str| SiteMetadata {
            host: host.to_string(),
            url: None,
            page_title: None,
        };
        (
            PortalSnapshot {
                total_price: price("500"),
                itinerary: None,
                site: site("travel.portal.example"),
                captured_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            },
            DirectSnapshot {
                total_price: price("480"),
                itinerary: None,
                site: site("airline.example"),
                captured_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 5, 0).unwrap(),
            },
        )
    }

    #[test]
    fn report_serializes_match_under_its_wire_name() {
        let (portal, direct) = snapshot_pair();
        let match_result = score_match(&CaptureIdentity::default(), &CaptureIdentity::default());
        let verdict =
            compute_verdict(&portal, &direct, Some(&match_result), &RewardsConfig::default())
                .unwrap();
        let report = Report {
            match_result: &match_result,
            verdict: &verdict,
        };

        let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&report).unwrap())
            .unwrap();
        assert!(json.get("match").is_some());
        assert!(json.get("verdict").is_some());
    }
}
