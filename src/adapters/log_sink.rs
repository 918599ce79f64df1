//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, SendOutcome};

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::Reported { state, outcome } => match outcome {
                SendOutcome::Sent => {
                    info!("REPORT | {:?} sent", state);
                }
                SendOutcome::Dropped => {
                    warn!("REPORT | {:?} dropped (link down)", state);
                }
                SendOutcome::Failed => {
                    warn!("REPORT | {:?} failed (session torn down)", state);
                }
            },
        }
    }
}
