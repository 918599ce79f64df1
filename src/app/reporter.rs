//! Change-driven state reporting.
//!
//! The reporter watches the gate state each tick and hands a JSON frame to
//! the sink only when the state differs from the last one reported. The
//! reported marker is updated immediately after invoking the sink,
//! regardless of whether the frame made it out — best-effort delivery,
//! never a duplicate. Retrying and reconnecting are the link layer's
//! problem, not this one's.
//!
//! The marker starts absent, so the first steady state observed after
//! boot (CLOSED, unless something is already standing in front of the
//! sensor) is announced exactly once.

use serde::Serialize;

use crate::app::ports::{ReportSink, SendOutcome};
use crate::fsm::StateId;

/// Outbound wire frame: `{"type": "gate_state", "gate": "OPEN"|"CLOSED"}`.
#[derive(Debug, Serialize)]
pub struct GateStateMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    gate: &'static str,
}

impl GateStateMessage {
    pub fn new(state: StateId) -> Self {
        Self {
            kind: "gate_state",
            gate: state.as_wire_str(),
        }
    }
}

pub struct StateReporter {
    /// Last state handed to the sink; `None` until the first report.
    reported: Option<StateId>,
}

impl StateReporter {
    pub fn new() -> Self {
        Self { reported: None }
    }

    /// Compare `state` against the last reported value and emit a frame on
    /// change. Returns `None` when nothing needed reporting.
    pub fn on_tick(
        &mut self,
        state: StateId,
        sink: &mut impl ReportSink,
    ) -> Option<SendOutcome> {
        if self.reported == Some(state) {
            return None;
        }

        let outcome = match serde_json::to_string(&GateStateMessage::new(state)) {
            Ok(frame) => sink.send_report(&frame),
            Err(_) => SendOutcome::Failed,
        };

        self.reported = Some(state);
        Some(outcome)
    }

    /// Last state handed to the sink.
    pub fn reported(&self) -> Option<StateId> {
        self.reported
    }
}

impl Default for StateReporter {
    fn default() -> Self {
        Self::new()
    }
}
