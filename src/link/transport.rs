//! Transport abstraction — a single outbound text-frame session.
//!
//! Concrete implementations:
//! - ESP-IDF WebSocket client (wss to the observer) on target
//! - `NullTransport` for the report-free build and as a safe default
//! - scripted mocks in the test suites
//!
//! The ConnectionManager is generic over `Transport`, so swapping the
//! session type requires zero changes to the reconnect logic. A transport
//! represents *one* session: `connect` after a failure must build a fresh
//! session, never reuse the dead one.

use crate::error::LinkError;

/// One outbound text-frame session.
pub trait Transport {
    /// Begin establishing a session. May complete asynchronously —
    /// [`Transport::is_open`] reports when the session is actually up.
    /// Implementations must bound any internal blocking.
    fn connect(&mut self) -> Result<(), LinkError>;

    /// Send one text frame on an open session.
    fn send_text(&mut self, frame: &str) -> Result<(), LinkError>;

    /// Tear the session down. Idempotent.
    fn close(&mut self);

    /// Whether the session is currently usable.
    fn is_open(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Null transport
// ───────────────────────────────────────────────────────────────

/// A transport that is always "up" and discards every frame.
///
/// This is the standalone (non-networked) variant of the firmware: the
/// control loop and reporter run identically, reports just go nowhere.
pub struct NullTransport;

impl Transport for NullTransport {
    fn connect(&mut self) -> Result<(), LinkError> {
        Ok(())
    }

    fn send_text(&mut self, _frame: &str) -> Result<(), LinkError> {
        Ok(())
    }

    fn close(&mut self) {}

    fn is_open(&self) -> bool {
        true
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF WebSocket transport
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp_ws::EspWsTransport;

#[cfg(target_os = "espidf")]
mod esp_ws {
    use core::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use esp_idf_svc::ws::client::{
        EspWebSocketClient, EspWebSocketClientConfig, WebSocketEvent, WebSocketEventType,
    };
    use esp_idf_svc::ws::FrameType;
    use log::{info, warn};

    use super::Transport;
    use crate::error::LinkError;

    /// Bound on the underlying connect/handshake, so a stalled network
    /// cannot freeze sensor polling indefinitely.
    const NETWORK_TIMEOUT: Duration = Duration::from_secs(10);

    /// WebSocket session to the observer endpoint. The session handle is
    /// replaced wholesale on every reconnect.
    pub struct EspWsTransport {
        url: &'static str,
        session: Option<EspWebSocketClient<'static>>,
        /// Written by the client's event callback, read from the control
        /// loop — the single shared flag between the two.
        connected: Arc<AtomicBool>,
    }

    impl EspWsTransport {
        pub fn new(url: &'static str) -> Self {
            Self {
                url,
                session: None,
                connected: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    impl Transport for EspWsTransport {
        fn connect(&mut self) -> Result<(), LinkError> {
            // Drop any previous session before building a new one.
            self.close();

            let connected = Arc::new(AtomicBool::new(false));
            let flag = connected.clone();

            let config = EspWebSocketClientConfig {
                ..Default::default()
            };

            let client = EspWebSocketClient::new(self.url, &config, NETWORK_TIMEOUT, move |event| {
                handle_event(&flag, event);
            })
            .map_err(|e| {
                warn!("ws: client create failed: {}", e);
                LinkError::ConnectFailed
            })?;

            info!("ws: connecting to {}", self.url);
            self.session = Some(client);
            self.connected = connected;
            Ok(())
        }

        fn send_text(&mut self, frame: &str) -> Result<(), LinkError> {
            let Some(session) = self.session.as_mut() else {
                return Err(LinkError::SendFailed);
            };
            session
                .send(FrameType::Text(false), frame.as_bytes())
                .map_err(|e| {
                    warn!("ws: send failed: {}", e);
                    LinkError::SendFailed
                })
        }

        fn close(&mut self) {
            if self.session.take().is_some() {
                info!("ws: session closed");
            }
            self.connected.store(false, Ordering::SeqCst);
        }

        fn is_open(&self) -> bool {
            self.session.is_some() && self.connected.load(Ordering::SeqCst)
        }
    }

    fn handle_event(
        flag: &AtomicBool,
        event: &core::result::Result<WebSocketEvent<'_>, esp_idf_svc::io::EspIOError>,
    ) {
        let Ok(event) = event else {
            flag.store(false, Ordering::SeqCst);
            return;
        };
        match event.event_type {
            WebSocketEventType::Connected => {
                info!("ws: connected");
                flag.store(true, Ordering::SeqCst);
            }
            WebSocketEventType::Disconnected
            | WebSocketEventType::Close(_)
            | WebSocketEventType::Closed => {
                warn!("ws: session lost");
                flag.store(false, Ordering::SeqCst);
            }
            _ => {}
        }
    }
}
