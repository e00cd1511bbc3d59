//! The pure transition function over the flow's state graph.
//!
//! `transition` is **total**: any `(state, event)` pair without a defined
//! cell returns the context unchanged. The surrounding service can therefore
//! feed every inbound event through the same pipeline without guarding
//! against "invalid state" — an unhandled event is a no-op, not an error.
//!
//! Nothing in here touches the clock, generates IDs, or performs I/O; the
//! service stamps `last_updated` and assigns session IDs after the fact.

use portalcheck_core::PageKind;

use crate::context::{FlowContext, FlowError};
use crate::event::FlowEvent;
use crate::state::FlowState;

/// Applies `event` to `ctx`, returning the next context.
///
/// Defined cells follow the flow's transition table; the default arm clones
/// the context untouched. `RESET_FLOW` and `ERROR_OCCURRED` are universal
/// (defined from every state).
#[must_use]
pub fn transition(ctx: &FlowContext, event: &FlowEvent) -> FlowContext {
    use FlowEvent as E;
    use FlowState as S;

    // Universal cells.
    match event {
        E::ResetFlow => return FlowContext::initial(),
        E::ErrorOccurred {
            message,
            recoverable,
        } => {
            let mut next = ctx.clone();
            next.state = S::Error;
            next.error = Some(FlowError {
                message: message.clone(),
                recoverable: *recoverable,
            });
            // A verdict may only exist in VERDICT_READY.
            next.verdict = None;
            return next;
        }
        _ => {}
    }

    match (ctx.state, event) {
        // A portal review page kicks the session off (or refreshes the
        // stored page while we are still waiting for a capture).
        (S::Idle | S::WaitingForPortalReview, E::PageContextUpdated { page })
            if page.kind == PageKind::PortalReview =>
        {
            let mut next = ctx.clone();
            next.state = S::WaitingForPortalReview;
            next.page_context = Some(page.clone());
            next
        }

        // A recoverable error self-clears on the next valid page signal.
        (S::Error, E::PageContextUpdated { page })
            if ctx.error.as_ref().is_some_and(|e| e.recoverable) =>
        {
            let mut next = ctx.clone();
            next.state = S::Idle;
            next.error = None;
            next.page_context = Some(page.clone());
            next
        }

        // Portal capture; a later capture supersedes an unconfirmed one.
        (
            S::WaitingForPortalReview | S::PortalCaptured,
            E::PortalCaptureReceived { capture },
        ) => {
            let mut next = ctx.clone();
            next.state = S::PortalCaptured;
            next.portal_capture = Some(capture.clone());
            next.portal_confirmed = false;
            next
        }

        (S::PortalCaptured, E::PortalConfirmed) => {
            let mut next = ctx.clone();
            next.state = S::WaitingForDirectCapture;
            next.portal_confirmed = true;
            next
        }

        // Discard the portal side from anywhere it exists.
        (
            S::PortalCaptured
            | S::WaitingForDirectCapture
            | S::DirectCaptured
            | S::VerdictReady,
            E::RecapturePortal,
        ) => {
            let mut next = ctx.clone();
            next.state = S::WaitingForPortalReview;
            next.portal_capture = None;
            next.portal_confirmed = false;
            next.verdict = None;
            next
        }

        // Direct capture; same supersede rule as the portal side.
        (
            S::WaitingForDirectCapture | S::DirectCaptured,
            E::DirectCaptureReceived { capture },
        ) => {
            let mut next = ctx.clone();
            next.state = S::DirectCaptured;
            next.direct_capture = Some(capture.clone());
            next.direct_confirmed = false;
            next
        }

        (S::DirectCaptured, E::DirectConfirmed) => {
            let mut next = ctx.clone();
            next.state = S::ComputingVerdict;
            next.direct_confirmed = true;
            next
        }

        (S::DirectCaptured | S::VerdictReady, E::RecaptureDirect) => {
            let mut next = ctx.clone();
            next.state = S::WaitingForDirectCapture;
            next.direct_capture = None;
            next.direct_confirmed = false;
            next.verdict = None;
            next
        }

        (S::ComputingVerdict, E::VerdictComputed { verdict }) => {
            let mut next = ctx.clone();
            next.state = S::VerdictReady;
            next.verdict = Some(verdict.clone());
            next
        }

        // Everything else: explicit no-op.
        _ => ctx.clone(),
    }
}
