//! Sensor subsystem.
//!
//! The gate has exactly one sensor — the ultrasonic ranger — so there is
//! no aggregating hub; the hardware adapter reads it directly each tick.

pub mod ultrasonic;
