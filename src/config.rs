//! System configuration parameters
//!
//! All tunable parameters for the SmartGate controller. The surface is
//! static — values are fixed before boot and never reconfigured at runtime.

use serde::{Deserialize, Serialize};

/// Wi-Fi credentials, set at build time. The association layer treats an
/// empty SSID as "not provisioned" and fails the boot precondition.
pub const WIFI_SSID: &str = "";
pub const WIFI_PASSWORD: &str = "";

/// Remote observer endpoint. The room identifier and `role=device` marker
/// address this device's reports within the observer's session.
pub const REPORT_URL: &str = "wss://digitwins.onrender.com/ws?roomId=arnold-853&role=device";

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    // --- Gate logic ---
    /// Open the gate when an object is closer than this (cm)
    pub threshold_cm: f32,
    /// Keep the gate open this long after the last near reading (seconds)
    pub hold_open_secs: f32,

    // --- Servo geometry ---
    /// Servo angle for the OPEN position (degrees).
    /// Reversed relative to intuition: 0 = OPEN, per physical mounting.
    pub open_angle_deg: u8,
    /// Servo angle for the CLOSED position (degrees)
    pub closed_angle_deg: u8,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub loop_interval_ms: u32,
    /// Fixed delay before a reporting-link reconnect attempt (seconds)
    pub reconnect_backoff_secs: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            // Gate logic
            threshold_cm: 15.0,
            hold_open_secs: 4.0,

            // Servo geometry (reversed: 0 = open, 90 = closed)
            open_angle_deg: 0,
            closed_angle_deg: 90,

            // Timing
            loop_interval_ms: 50, // 20 Hz
            reconnect_backoff_secs: 5,
        }
    }
}

impl GateConfig {
    /// Duration of one control tick in seconds.
    pub fn tick_secs(&self) -> f32 {
        self.loop_interval_ms as f32 / 1000.0
    }

    /// The hold-open window expressed in control ticks.
    pub fn hold_open_ticks(&self) -> u64 {
        ((self.hold_open_secs * 1000.0) as u64).div_ceil(self.loop_interval_ms as u64)
    }

    /// The reconnect backoff expressed in control ticks.
    pub fn backoff_ticks(&self) -> u32 {
        (self.reconnect_backoff_secs * 1000).div_ceil(self.loop_interval_ms)
    }
}
