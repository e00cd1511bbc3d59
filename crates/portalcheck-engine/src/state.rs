use serde::{Deserialize, Serialize};

/// The flow's explicit state graph.
///
/// `VerdictReady` and `Error` are both re-enterable: `RESET_FLOW` and the
/// recapture events route back into the capture states, so there is no
/// formal terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowState {
    Idle,
    WaitingForPortalReview,
    PortalCaptured,
    WaitingForDirectCapture,
    DirectCaptured,
    ComputingVerdict,
    VerdictReady,
    Error,
}

impl FlowState {
    /// Every state, for exhaustive property tests.
    pub const ALL: [FlowState; 8] = [
        FlowState::Idle,
        FlowState::WaitingForPortalReview,
        FlowState::PortalCaptured,
        FlowState::WaitingForDirectCapture,
        FlowState::DirectCaptured,
        FlowState::ComputingVerdict,
        FlowState::VerdictReady,
        FlowState::Error,
    ];
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlowState::Idle => "IDLE",
            FlowState::WaitingForPortalReview => "WAITING_FOR_PORTAL_REVIEW",
            FlowState::PortalCaptured => "PORTAL_CAPTURED",
            FlowState::WaitingForDirectCapture => "WAITING_FOR_DIRECT_CAPTURE",
            FlowState::DirectCaptured => "DIRECT_CAPTURED",
            FlowState::ComputingVerdict => "COMPUTING_VERDICT",
            FlowState::VerdictReady => "VERDICT_READY",
            FlowState::Error => "ERROR",
        };
        write!(f, "{name}")
    }
}
