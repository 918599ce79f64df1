//! Outbound application events.
//!
//! The [`GateService`](super::service::GateService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — today they go to the serial log.

use crate::app::ports::SendOutcome;
use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// The gate transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A state report was handed to the link, with its fate.
    Reported { state: StateId, outcome: SendOutcome },
}
