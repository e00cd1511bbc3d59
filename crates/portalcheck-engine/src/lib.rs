//! The capture-compare-decide engine.
//!
//! Two independently captured snapshots — one from the loyalty portal, one
//! from a direct-booking site — flow through an explicit state machine.
//! Once both sides are user-confirmed, the engine scores how likely they
//! describe the same booking (advisory), runs the break-even calculator,
//! and parks the verdict in a terminal-but-reenterable `VERDICT_READY`
//! state for subscribers to render.
//!
//! The transition function in [`transition`] is pure and total; all
//! side effects (persistence, notification, verdict orchestration) live in
//! [`service::FlowService`], which serializes events through one mutex.

pub mod bus;
pub mod context;
pub mod error;
pub mod event;
pub mod service;
pub mod state;
pub mod transition;

pub use bus::ContextBus;
pub use context::{FlowContext, FlowError};
pub use error::EngineError;
pub use event::FlowEvent;
pub use service::FlowService;
pub use state::FlowState;
pub use transition::transition;
