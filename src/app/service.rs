//! Application service — the hexagonal core.
//!
//! [`GateService`] owns the FSM, the shared context, and the state
//! reporter. It exposes a clean, hardware-agnostic API; all I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ ReportSink
//!                 │      GateService       │ ──▶ EventSink
//! ActuatorPort ◀──│   FSM · Reporter       │
//!                 └────────────────────────┘
//! ```
//!
//! One tick runs strictly ordered — measure, decide, actuate, report —
//! and the reporting step can never skip or reorder the control steps:
//! link trouble surfaces as a send outcome, not an error.

use log::debug;

use crate::app::commands::GateCommand;
use crate::app::events::AppEvent;
use crate::app::ports::{ActuatorPort, EventSink, ReportSink, SensorPort};
use crate::app::reporter::StateReporter;
use crate::config::GateConfig;
use crate::error::Result;
use crate::fsm::context::{GateContext, GatePosition};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

// ───────────────────────────────────────────────────────────────
// GateService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct GateService {
    fsm: Fsm,
    ctx: GateContext,
    reporter: StateReporter,
    /// Position last successfully written to the servo. The servo is
    /// commanded on change, not every tick, so a hardware fault is caught
    /// at the moment of the transition that needed it.
    applied: Option<GatePosition>,
    tick_count: u64,
}

impl GateService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`GateService::start`] next.
    pub fn new(config: GateConfig) -> Self {
        let ctx = GateContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Closed);

        Self {
            fsm,
            ctx,
            reporter: StateReporter::new(),
            applied: None,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in CLOSED and drive the servo there — the gate
    /// always boots shut.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) -> Result<()> {
        self.fsm.start(&mut self.ctx);
        self.apply_position(hw)?;
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: measure → decide → actuate → report.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    ///
    /// Returns `Err` only for an actuator fault, which the caller must
    /// treat as fatal.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        link: &mut impl ReportSink,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.tick_count += 1;
        let prev_state = self.fsm.current_state();

        // 1. Measure via SensorPort
        let reading = hw.measure_distance();
        debug!("distance: {:.1} cm", reading.cm);
        self.ctx.distance_cm = reading.cm;

        // 2. FSM decision (pure state logic)
        self.fsm.tick(&mut self.ctx);

        // 3. Apply the commanded position via ActuatorPort
        self.apply_position(hw)?;

        // 4. Emit state change if the FSM moved
        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }

        // 5. Report on change — last, and never able to disturb 1–3
        if let Some(outcome) = self.reporter.on_tick(new_state, link) {
            sink.emit(&AppEvent::Reported {
                state: new_state,
                outcome,
            });
        }

        Ok(())
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an inbound OPEN/CLOSE command. Applied only when it would
    /// change state; a redundant command is a no-op.
    ///
    /// The receive path is not currently wired to the link — this exists
    /// for the anticipated remote-command protocol and for tests.
    pub fn handle_command(
        &mut self,
        cmd: GateCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let target = cmd.target_state();
        let prev = self.fsm.current_state();
        if target == prev {
            return Ok(());
        }

        self.fsm.force_transition(target, &mut self.ctx);
        self.apply_position(hw)?;
        sink.emit(&AppEvent::StateChanged {
            from: prev,
            to: target,
        });
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Last state handed to the reporting sink.
    pub fn reported_state(&self) -> Option<StateId> {
        self.reporter.reported()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Clone of the live configuration.
    pub fn current_config(&self) -> GateConfig {
        self.ctx.config.clone()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate the FSM's commanded position into a servo call, once per
    /// change. An actuator error propagates — the servo state no longer
    /// matches what the FSM believes, and continuing would hide that.
    fn apply_position(&mut self, hw: &mut impl ActuatorPort) -> Result<()> {
        let target = self.ctx.commands.position;
        if self.applied == Some(target) {
            return Ok(());
        }

        match target {
            GatePosition::Open => hw.open_gate()?,
            GatePosition::Closed => hw.close_gate()?,
        }
        self.applied = Some(target);
        Ok(())
    }
}
