//! Shared mutable context threaded through every FSM handler.
//!
//! `GateContext` is the single struct that state handlers read from and
//! write to. It contains the latest distance reading, the commanded gate
//! position, timing information, and configuration. Think of it as the
//! "blackboard" in a blackboard architecture.

use crate::config::GateConfig;

// ---------------------------------------------------------------------------
// Commanded position (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// The logical position the gate should be driven to. The hardware adapter
/// maps this to the configured servo angle — the FSM never sees degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatePosition {
    Open,
    /// Safe default; the gate starts closed at boot.
    #[default]
    Closed,
}

/// Commands that state handlers write to request actuator actions.
/// The service applies these to the servo after each FSM tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateCommands {
    /// Desired gate position.
    pub position: GatePosition,
}

// ---------------------------------------------------------------------------
// GateContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct GateContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,
    /// Duration of one tick in seconds (inverse of control loop frequency).
    pub tick_period_secs: f32,

    // -- Sensor data --
    /// Latest distance reading (cm). Updated before each FSM tick.
    /// An echo timeout arrives here as the sentinel far distance, so the
    /// handlers never need to treat it specially.
    pub distance_cm: f32,

    /// Consecutive ticks the reading has been at or beyond the threshold
    /// while the gate is OPEN. Any near reading resets it — this is what
    /// makes a retrigger restart the hold-open window.
    pub far_ticks: u64,

    // -- Actuator output --
    /// Commanded position, applied by the service after the FSM tick.
    pub commands: GateCommands,

    // -- Configuration --
    /// System configuration (static, set before boot).
    pub config: GateConfig,
}

impl GateContext {
    /// Create a new context with the given configuration.
    pub fn new(config: GateConfig) -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            tick_period_secs: config.tick_secs(),
            distance_cm: crate::sensors::ultrasonic::FAR_DISTANCE_CM,
            far_ticks: 0,
            commands: GateCommands::default(),
            config,
        }
    }

    /// Whether the latest reading is within the proximity threshold.
    pub fn object_near(&self) -> bool {
        self.distance_cm < self.config.threshold_cm
    }

    /// Seconds elapsed since the current state was entered.
    pub fn secs_in_state(&self) -> f32 {
        self.ticks_in_state as f32 * self.tick_period_secs
    }
}
