//! The stateful wrapper around the pure transition function.
//!
//! `FlowService` owns the single active [`FlowContext`] and funnels every
//! inbound event through one serialized pipeline: validate the payload,
//! apply the pure transition, stamp `last_updated`, await a durable write,
//! then notify subscribers. Events can arrive from any number of tasks;
//! the mutex around the context is what enforces arrival-order application.
//!
//! Persistence failures are logged and swallowed — a broken disk must
//! never prevent in-memory progress or notification.

use chrono::Utc;
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

use portalcheck_core::{compute_verdict, score_match, CaptureIdentity, RewardsConfig};
use portalcheck_store::SessionStore;

use crate::bus::ContextBus;
use crate::context::FlowContext;
use crate::error::EngineError;
use crate::event::FlowEvent;
use crate::state::FlowState;
use crate::transition::transition;

/// Fixed key of the single persisted session record.
pub const SESSION_KEY: &str = "portalcheck.session";

pub struct FlowService<S> {
    store: S,
    bus: ContextBus,
    rewards: RewardsConfig,
    session_ttl_ms: i64,
    ctx: Mutex<FlowContext>,
}

impl<S: SessionStore> FlowService<S> {
    /// A fresh service at `IDLE` with a new session ID.
    ///
    /// Call [`FlowService::restore`] afterwards to adopt a persisted
    /// session from a previous run.
    pub fn new(store: S, bus: ContextBus, rewards: RewardsConfig, session_ttl_ms: i64) -> Self {
        let mut ctx = FlowContext::initial();
        ctx.session_id = Some(Uuid::new_v4());
        ctx.last_updated = Utc::now().timestamp_millis();
        Self {
            store,
            bus,
            rewards,
            session_ttl_ms,
            ctx: Mutex::new(ctx),
        }
    }

    /// Adopt the persisted session if one exists and is younger than the
    /// TTL; otherwise keep the fresh context. Stale or unreadable records
    /// are discarded. Returns the context in effect afterwards.
    pub async fn restore(&self) -> FlowContext {
        let mut guard = self.ctx.lock().await;
        match self.store.get(SESSION_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<FlowContext>(&raw) {
                Ok(saved) => {
                    let age_ms = Utc::now().timestamp_millis() - saved.last_updated;
                    if age_ms < self.session_ttl_ms {
                        tracing::info!(state = %saved.state, age_ms, "restored persisted session");
                        *guard = saved;
                    } else {
                        tracing::info!(age_ms, "persisted session expired, starting fresh");
                        let _ = self.store.remove(SESSION_KEY).await;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "corrupt session record, starting fresh");
                    let _ = self.store.remove(SESSION_KEY).await;
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "session store unreadable, starting fresh");
            }
        }
        guard.clone()
    }

    /// Apply one inbound event and return the resulting context.
    ///
    /// When the transition lands in `COMPUTING_VERDICT`, the matcher and
    /// the verdict calculator run before this returns, so the caller sees
    /// `VERDICT_READY` (or `ERROR`) directly.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if a capture payload fails the
    /// boundary checks; the event is dropped before reaching the flow.
    pub async fn send(&self, event: FlowEvent) -> Result<FlowContext, EngineError> {
        validate_capture(&event)?;

        let mut guard = self.ctx.lock().await;
        let mut next = self.apply_and_commit(&guard, &event).await;
        *guard = next.clone();

        while next.state == FlowState::ComputingVerdict {
            let follow = self.verdict_event(&next);
            next = self.apply_and_commit(&next, &follow).await;
            *guard = next.clone();
        }

        Ok(next)
    }

    /// Abandon the session and return to the initial context.
    pub async fn reset(&self) {
        // RESET_FLOW carries no payload, so validation cannot reject it.
        let _ = self.send(FlowEvent::ResetFlow).await;
    }

    /// Subscribe to context updates. Dropping the receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FlowContext> {
        self.bus.subscribe()
    }

    pub async fn context(&self) -> FlowContext {
        self.ctx.lock().await.clone()
    }

    pub async fn state(&self) -> FlowState {
        self.ctx.lock().await.state
    }

    pub async fn active_step(&self) -> u8 {
        self.ctx.lock().await.active_step()
    }

    /// Pure transition plus the service-side effects: monotonic timestamp,
    /// session ID assignment, durable write, subscriber notification.
    async fn apply_and_commit(&self, prev: &FlowContext, event: &FlowEvent) -> FlowContext {
        let mut next = transition(prev, event);
        next.last_updated = prev.last_updated.max(Utc::now().timestamp_millis());
        if next.session_id.is_none() {
            next.session_id = Some(Uuid::new_v4());
        }

        tracing::debug!(event = event.kind(), from = %prev.state, to = %next.state, "applied flow event");

        match serde_json::to_string(&next) {
            Ok(raw) => {
                if let Err(e) = self.store.set(SESSION_KEY, &raw).await {
                    tracing::warn!(error = %e, "failed to persist session, continuing in memory");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize session, continuing in memory");
            }
        }

        self.bus.publish(next.clone());
        next
    }

    /// Run the matcher and the calculator against the confirmed captures,
    /// producing the follow-up event for `COMPUTING_VERDICT`.
    fn verdict_event(&self, ctx: &FlowContext) -> FlowEvent {
        let (Some(portal), Some(direct)) = (&ctx.portal_capture, &ctx.direct_capture) else {
            // Unreachable through the transition table, but the pipeline
            // must not panic if a future table edit breaks that.
            return FlowEvent::ErrorOccurred {
                message: "cannot compute a verdict without both captures".to_string(),
                recoverable: true,
            };
        };

        let portal_identity = portal
            .itinerary
            .as_ref()
            .map_or_else(CaptureIdentity::default, |fp| fp.identity());
        let direct_identity = direct
            .itinerary
            .as_ref()
            .map_or_else(CaptureIdentity::default, |fp| fp.identity());
        let match_result = score_match(&portal_identity, &direct_identity);
        tracing::info!(
            score = match_result.score,
            confidence = %match_result.confidence,
            is_match = match_result.is_match,
            "fingerprint match scored"
        );

        match compute_verdict(portal, direct, Some(&match_result), &self.rewards) {
            Ok(verdict) => FlowEvent::VerdictComputed { verdict },
            Err(e) => FlowEvent::ErrorOccurred {
                message: e.to_string(),
                recoverable: true,
            },
        }
    }
}

fn validate_capture(event: &FlowEvent) -> Result<(), EngineError> {
    match event {
        FlowEvent::PortalCaptureReceived { capture } => capture.validate()?,
        FlowEvent::DirectCaptureReceived { capture } => capture.validate()?,
        _ => {}
    }
    Ok(())
}
