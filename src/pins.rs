//! GPIO / peripheral pin assignments for the SmartGate main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Ultrasonic ranger (HC-SR04)
// ---------------------------------------------------------------------------

/// Digital output: 10 µs trigger pulse starts a ranging cycle.
pub const ULTRASONIC_TRIG_GPIO: i32 = 21;
/// Digital input: echo line goes HIGH for the round-trip duration.
pub const ULTRASONIC_ECHO_GPIO: i32 = 20;

// ---------------------------------------------------------------------------
// Gate servo (standard 50 Hz hobby servo)
// ---------------------------------------------------------------------------

/// LEDC PWM output for the servo signal line.
pub const SERVO_PWM_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// Servo frame rate. Standard hobby-servo signal: one pulse per 20 ms.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC timer resolution (bits). 16-bit keeps the 500–2500 µs pulse band
/// at sub-microsecond granularity within the 20 ms frame.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 16;
