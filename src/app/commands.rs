//! Inbound commands to the application service.
//!
//! The observer protocol anticipates remote OPEN/CLOSE commands as JSON
//! frames (`{"type": "command", "action": "OPEN"}`). The parser and the
//! service handler are implemented, but the receive path is deliberately
//! not wired into the link — the current deployment is report-only, and a
//! command is applied only when it would actually change state.

use serde::Deserialize;

use crate::fsm::StateId;

/// Commands that external peers can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCommand {
    Open,
    Close,
}

impl GateCommand {
    /// The gate state this command requests.
    pub fn target_state(self) -> StateId {
        match self {
            Self::Open => StateId::Open,
            Self::Close => StateId::Closed,
        }
    }

    /// Parse an inbound text frame. Returns `None` for anything that is
    /// not a well-formed command — unknown types and malformed JSON are
    /// ignored, not errors, since the wire is shared with other traffic.
    pub fn parse_frame(frame: &str) -> Option<Self> {
        let parsed: CommandFrame = serde_json::from_str(frame).ok()?;
        if parsed.kind.as_str() != "command" {
            return None;
        }
        match parsed.action.as_str() {
            "OPEN" => Some(Self::Open),
            "CLOSE" => Some(Self::Close),
            _ => None,
        }
    }
}

// Fixed-capacity strings: oversized fields fail deserialization, which
// lands in the same ignore path as any other malformed frame.
#[derive(Deserialize)]
struct CommandFrame {
    #[serde(rename = "type")]
    kind: heapless::String<16>,
    action: heapless::String<8>,
}
