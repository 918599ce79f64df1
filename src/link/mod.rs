//! Reporting link — the ConnectionManager.
//!
//! Maintains at most one session to the remote observer and absorbs every
//! network fault so the control loop never sees one:
//!
//! ```text
//!  DISCONNECTED ──connect ok──▶ CONNECTING ──session up──▶ CONNECTED
//!       ▲   ▲                       │                          │
//!       │   └──────timeout──────────┘                          │
//!       └──────────────send failure / session lost─────────────┘
//!
//!  (every edge back to DISCONNECTED arms the fixed backoff)
//! ```
//!
//! The backoff is constant (not exponential) and counted in control
//! ticks, so polling the manager from the 20 Hz loop costs nothing and
//! never sleeps. While the link is anything but CONNECTED, `send` drops
//! the frame silently — there is no queue or backlog. A state change
//! whose report falls entirely inside a disconnected window is lost; the
//! reporter's change-driven semantics re-announce only on the next
//! change.

pub mod transport;

use log::{info, warn};

use crate::app::ports::{ReportSink, SendOutcome};
use transport::Transport;

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Bound on how long a connect attempt may sit in CONNECTING before the
/// session is torn down and the backoff re-armed, in control ticks.
/// At 50 ms per tick this is ~10 s, matching the transport's own bound.
const CONNECT_TIMEOUT_TICKS: u32 = 200;

/// Owns the one-and-only session to the observer.
pub struct ConnectionManager<T: Transport> {
    transport: T,
    state: LinkState,
    /// Ticks left before the next connect attempt is allowed.
    backoff_remaining: u32,
    /// Ticks spent in CONNECTING so far.
    connecting_ticks: u32,
    /// Fixed backoff armed after any failure, in ticks.
    backoff_ticks: u32,
}

impl<T: Transport> ConnectionManager<T> {
    /// The first connect attempt fires on the first `poll` — the backoff
    /// applies only after a failure.
    pub fn new(transport: T, backoff_ticks: u32) -> Self {
        Self {
            transport,
            state: LinkState::Disconnected,
            backoff_remaining: 0,
            connecting_ticks: 0,
            backoff_ticks,
        }
    }

    /// Advance the link state machine by one control tick. Bounded work
    /// only — never sleeps, never blocks beyond the transport's own
    /// internal bounds.
    pub fn poll(&mut self) {
        match self.state {
            LinkState::Disconnected => {
                if self.backoff_remaining > 0 {
                    self.backoff_remaining -= 1;
                    return;
                }
                match self.transport.connect() {
                    Ok(()) => {
                        self.state = LinkState::Connecting;
                        self.connecting_ticks = 0;
                    }
                    Err(e) => {
                        warn!("link: connect failed ({e}), backing off");
                        self.arm_backoff();
                    }
                }
            }

            LinkState::Connecting => {
                if self.transport.is_open() {
                    info!("link: connected");
                    self.state = LinkState::Connected;
                } else {
                    self.connecting_ticks += 1;
                    if self.connecting_ticks > CONNECT_TIMEOUT_TICKS {
                        warn!("link: connect timed out, backing off");
                        self.transport.close();
                        self.arm_backoff();
                    }
                }
            }

            LinkState::Connected => {
                if !self.transport.is_open() {
                    warn!("link: session lost, backing off");
                    self.transport.close();
                    self.arm_backoff();
                }
            }
        }
    }

    /// Hand a frame to the session. Never blocks the caller on recovery:
    /// a failure tears the session down and arms the backoff, and the
    /// outcome says what happened.
    pub fn send(&mut self, frame: &str) -> SendOutcome {
        if self.state != LinkState::Connected {
            return SendOutcome::Dropped;
        }

        match self.transport.send_text(frame) {
            Ok(()) => SendOutcome::Sent,
            Err(e) => {
                warn!("link: send failed ({e}), backing off");
                self.transport.close();
                self.arm_backoff();
                SendOutcome::Failed
            }
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    fn arm_backoff(&mut self) {
        self.state = LinkState::Disconnected;
        self.backoff_remaining = self.backoff_ticks;
    }
}

impl<T: Transport> ReportSink for ConnectionManager<T> {
    fn send_report(&mut self, frame: &str) -> SendOutcome {
        self.send(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::transport::{NullTransport, Transport};
    use super::*;
    use crate::error::LinkError;

    /// Scripted transport: a queue of connect results plus switchable
    /// send behavior, recording every frame that got through.
    struct Scripted {
        connect_results: Vec<Result<(), LinkError>>,
        open: bool,
        fail_sends: bool,
        sent: Vec<String>,
        connect_calls: u32,
    }

    impl Scripted {
        fn new() -> Self {
            Self {
                connect_results: Vec::new(),
                open: false,
                fail_sends: false,
                sent: Vec::new(),
                connect_calls: 0,
            }
        }
    }

    impl Transport for Scripted {
        fn connect(&mut self) -> Result<(), LinkError> {
            self.connect_calls += 1;
            let result = if self.connect_results.is_empty() {
                Ok(())
            } else {
                self.connect_results.remove(0)
            };
            if result.is_ok() {
                self.open = true;
            }
            result
        }

        fn send_text(&mut self, frame: &str) -> Result<(), LinkError> {
            if self.fail_sends {
                return Err(LinkError::SendFailed);
            }
            self.sent.push(frame.to_string());
            Ok(())
        }

        fn close(&mut self) {
            self.open = false;
        }

        fn is_open(&self) -> bool {
            self.open
        }
    }

    const BACKOFF: u32 = 100; // 5 s at 50 ms ticks

    fn connected_manager() -> ConnectionManager<Scripted> {
        let mut mgr = ConnectionManager::new(Scripted::new(), BACKOFF);
        mgr.poll(); // Disconnected -> Connecting
        mgr.poll(); // Connecting -> Connected
        assert_eq!(mgr.state(), LinkState::Connected);
        mgr
    }

    #[test]
    fn first_attempt_has_no_backoff() {
        let mut mgr = ConnectionManager::new(Scripted::new(), BACKOFF);
        assert_eq!(mgr.state(), LinkState::Disconnected);
        mgr.poll();
        assert_eq!(mgr.state(), LinkState::Connecting);
        mgr.poll();
        assert_eq!(mgr.state(), LinkState::Connected);
    }

    #[test]
    fn send_while_connected_passes_frame_through() {
        let mut mgr = connected_manager();
        assert_eq!(mgr.send("hello"), SendOutcome::Sent);
        assert_eq!(mgr.transport.sent, vec!["hello".to_string()]);
    }

    #[test]
    fn send_while_down_drops_silently() {
        let mut mgr = ConnectionManager::new(Scripted::new(), BACKOFF);
        assert_eq!(mgr.send("lost"), SendOutcome::Dropped);

        mgr.poll(); // now Connecting
        assert_eq!(mgr.send("also lost"), SendOutcome::Dropped);
        assert!(mgr.transport.sent.is_empty());
    }

    #[test]
    fn send_failure_tears_down_and_arms_backoff() {
        let mut mgr = connected_manager();
        mgr.transport.fail_sends = true;

        assert_eq!(mgr.send("x"), SendOutcome::Failed);
        assert_eq!(mgr.state(), LinkState::Disconnected);

        // No reconnect attempt until the full backoff has elapsed.
        let calls_before = mgr.transport.connect_calls;
        for _ in 0..BACKOFF {
            mgr.poll();
        }
        assert_eq!(mgr.transport.connect_calls, calls_before);

        mgr.poll();
        assert_eq!(mgr.transport.connect_calls, calls_before + 1);
    }

    #[test]
    fn backoff_is_constant_across_consecutive_failures() {
        let mut mgr = ConnectionManager::new(Scripted::new(), BACKOFF);
        mgr.transport.connect_results =
            vec![Err(LinkError::ConnectFailed); 5];

        let mut gaps = Vec::new();
        let mut since_last_attempt = 0u32;
        let mut last_calls = 0;

        for _ in 0..5 * (BACKOFF + 1) + 1 {
            mgr.poll();
            since_last_attempt += 1;
            if mgr.transport.connect_calls != last_calls {
                last_calls = mgr.transport.connect_calls;
                gaps.push(since_last_attempt);
                since_last_attempt = 0;
            }
        }

        // First attempt immediate, then a constant gap — never growing.
        assert_eq!(gaps[0], 1);
        for gap in &gaps[1..] {
            assert_eq!(*gap, BACKOFF + 1);
        }
        assert!(gaps.len() >= 4);
    }

    #[test]
    fn session_loss_detected_on_poll() {
        let mut mgr = connected_manager();
        mgr.transport.open = false;

        mgr.poll();
        assert_eq!(mgr.state(), LinkState::Disconnected);
        assert_eq!(mgr.send("x"), SendOutcome::Dropped);
    }

    #[test]
    fn connect_timeout_rearms_backoff() {
        let mut mgr = ConnectionManager::new(Scripted::new(), BACKOFF);
        mgr.poll();
        assert_eq!(mgr.state(), LinkState::Connecting);
        // Session never comes up.
        mgr.transport.open = false;

        for _ in 0..=CONNECT_TIMEOUT_TICKS {
            mgr.poll();
        }
        assert_eq!(mgr.state(), LinkState::Disconnected);
    }

    #[test]
    fn null_transport_always_accepts() {
        let mut mgr = ConnectionManager::new(NullTransport, BACKOFF);
        mgr.poll();
        mgr.poll();
        assert_eq!(mgr.state(), LinkState::Connected);
        assert_eq!(mgr.send("report"), SendOutcome::Sent);
    }
}
