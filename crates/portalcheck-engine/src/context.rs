use serde::{Deserialize, Serialize};
use uuid::Uuid;

use portalcheck_core::{DirectSnapshot, PageContext, PortalSnapshot, Verdict};

use crate::state::FlowState;

/// A user-visible failure parked in the `ERROR` state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowError {
    pub message: String,
    /// Recoverable errors self-clear on the next valid page-context
    /// signal; non-recoverable ones require an explicit reset.
    pub recoverable: bool,
}

/// The aggregate root: everything the flow knows about the session.
///
/// Exactly one context is active per engine instance. It is created at
/// `IDLE`, mutated only through [`crate::transition`], and discarded on
/// `RESET_FLOW` or TTL expiry.
///
/// Invariants maintained by the transition function:
/// - `verdict` is `Some` if and only if `state == VerdictReady`.
/// - `portal_confirmed` implies `portal_capture.is_some()` (same for the
///   direct side).
/// - `last_updated` never decreases (stamped by the service).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowContext {
    pub state: FlowState,
    #[serde(default)]
    pub page_context: Option<PageContext>,
    #[serde(default)]
    pub portal_capture: Option<PortalSnapshot>,
    pub portal_confirmed: bool,
    #[serde(default)]
    pub direct_capture: Option<DirectSnapshot>,
    pub direct_confirmed: bool,
    #[serde(default)]
    pub verdict: Option<Verdict>,
    #[serde(default)]
    pub error: Option<FlowError>,
    #[serde(default)]
    pub session_id: Option<Uuid>,
    /// Epoch milliseconds of the last applied event; drives the restore
    /// TTL.
    pub last_updated: i64,
}

impl FlowContext {
    /// The initial `IDLE` context. `session_id` is unset here; the service
    /// assigns one when it adopts the context (the pure layer never
    /// generates IDs).
    #[must_use]
    pub fn initial() -> Self {
        Self {
            state: FlowState::Idle,
            page_context: None,
            portal_capture: None,
            portal_confirmed: false,
            direct_capture: None,
            direct_confirmed: false,
            verdict: None,
            error: None,
            session_id: None,
            last_updated: 0,
        }
    }

    /// UI progress projection onto steps 1–3.
    ///
    /// Defined for every reachable combination, `ERROR` included: the step
    /// shown is the one the user was working on when things went wrong.
    #[must_use]
    pub fn active_step(&self) -> u8 {
        match self.state {
            FlowState::Idle | FlowState::WaitingForPortalReview | FlowState::PortalCaptured => 1,
            FlowState::WaitingForDirectCapture | FlowState::DirectCaptured => 2,
            FlowState::ComputingVerdict | FlowState::VerdictReady => 3,
            FlowState::Error => {
                if !self.portal_confirmed {
                    1
                } else if !self.direct_confirmed {
                    2
                } else {
                    3
                }
            }
        }
    }
}

impl Default for FlowContext {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_context_is_idle_with_nothing_set() {
        let ctx = FlowContext::initial();
        assert_eq!(ctx.state, FlowState::Idle);
        assert!(ctx.portal_capture.is_none());
        assert!(!ctx.portal_confirmed);
        assert!(ctx.verdict.is_none());
        assert!(ctx.error.is_none());
        assert!(ctx.session_id.is_none());
    }

    #[test]
    fn active_step_covers_every_state_and_flag_combination() {
        for state in FlowState::ALL {
            for portal_confirmed in [false, true] {
                for direct_confirmed in [false, true] {
                    let ctx = FlowContext {
                        state,
                        portal_confirmed,
                        direct_confirmed,
                        ..FlowContext::initial()
                    };
                    let step = ctx.active_step();
                    assert!(
                        (1..=3).contains(&step),
                        "step {step} out of range for {state} ({portal_confirmed}, {direct_confirmed})"
                    );
                }
            }
        }
    }

    #[test]
    fn error_step_reflects_progress() {
        let mut ctx = FlowContext {
            state: FlowState::Error,
            ..FlowContext::initial()
        };
        assert_eq!(ctx.active_step(), 1);
        ctx.portal_confirmed = true;
        assert_eq!(ctx.active_step(), 2);
        ctx.direct_confirmed = true;
        assert_eq!(ctx.active_step(), 3);
    }

    #[test]
    fn context_round_trips_through_json() {
        let ctx = FlowContext {
            session_id: Some(Uuid::new_v4()),
            last_updated: 1_756_000_000_000,
            ..FlowContext::initial()
        };
        let json = serde_json::to_string(&ctx).unwrap();
        let back: FlowContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back.state, ctx.state);
        assert_eq!(back.session_id, ctx.session_id);
        assert_eq!(back.last_updated, ctx.last_updated);
    }
}
