use serde::{Deserialize, Serialize};

use portalcheck_core::{DirectSnapshot, PageContext, PortalSnapshot, Verdict};

/// The engine's inbound message taxonomy, discriminated by `type` on the
/// wire.
///
/// Capture payloads are validated at the service boundary before any of
/// these reach the transition function; the pure layer trusts its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowEvent {
    /// The browser layer recognized what page the user is on.
    PageContextUpdated { page: PageContext },
    /// A portal-side snapshot was extracted.
    PortalCaptureReceived { capture: PortalSnapshot },
    /// The user confirmed the portal capture is correct.
    PortalConfirmed,
    /// A direct-side snapshot was extracted.
    DirectCaptureReceived { capture: DirectSnapshot },
    /// The user confirmed the direct capture is correct.
    DirectConfirmed,
    /// Discard the portal capture and wait for a fresh one.
    RecapturePortal,
    /// Discard the direct capture and wait for a fresh one.
    RecaptureDirect,
    /// Internal: the calculator produced a verdict.
    VerdictComputed { verdict: Verdict },
    /// Abandon the session and return to the initial context.
    ResetFlow,
    /// Something failed; `recoverable` errors self-clear on the next valid
    /// page-context signal.
    ErrorOccurred { message: String, recoverable: bool },
}

impl FlowEvent {
    /// The wire discriminant, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FlowEvent::PageContextUpdated { .. } => "PAGE_CONTEXT_UPDATED",
            FlowEvent::PortalCaptureReceived { .. } => "PORTAL_CAPTURE_RECEIVED",
            FlowEvent::PortalConfirmed => "PORTAL_CONFIRMED",
            FlowEvent::DirectCaptureReceived { .. } => "DIRECT_CAPTURE_RECEIVED",
            FlowEvent::DirectConfirmed => "DIRECT_CONFIRMED",
            FlowEvent::RecapturePortal => "RECAPTURE_PORTAL",
            FlowEvent::RecaptureDirect => "RECAPTURE_DIRECT",
            FlowEvent::VerdictComputed { .. } => "VERDICT_COMPUTED",
            FlowEvent::ResetFlow => "RESET_FLOW",
            FlowEvent::ErrorOccurred { .. } => "ERROR_OCCURRED",
        }
    }
}
