use thiserror::Error;

use portalcheck_core::SnapshotError;

/// Failures surfaced to callers of the engine API.
///
/// Deliberately narrow: the transition function never fails, persistence
/// failures are logged and swallowed, and calculator failures are routed
/// into the `ERROR` state rather than returned. What remains is boundary
/// rejection of malformed capture payloads.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("rejected capture payload: {0}")]
    Validation(#[from] SnapshotError),
}
