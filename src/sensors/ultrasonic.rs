//! HC-SR04 ultrasonic ranger.
//!
//! One ranging cycle: hold the trigger line low for ≥5 µs to settle it,
//! pulse it high for 10 µs, then time the echo line's high pulse. The echo
//! duration is the round trip of a 40 kHz burst, so
//! `distance_cm = 340 m/s * echo_us / 20000` (halved for the round trip).
//!
//! A missing echo within the 30 ms ceiling is a normal outcome — debris,
//! an out-of-range target, sensor noise — and maps to the sentinel
//! [`FAR_DISTANCE_CM`], never an error or a panic.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the trigger GPIO and busy-waits the echo pulse via
//! hw_init helpers against the monotonic µs timer.
//! On host/test: reads an injected echo duration from a static atomic
//! (negative = timeout).

use core::sync::atomic::AtomicI64;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Speed of sound used for the conversion (m/s).
const SOUND_SPEED_M_S: f32 = 340.0;
/// Trigger pulse width.
const TRIG_PULSE_US: u32 = 10;
/// Settle time with the trigger held low before the pulse.
const TRIG_SETTLE_US: u32 = 5;
/// Hard ceiling on the echo pulse — bounds worst-case tick latency.
pub const MAX_ECHO_US: u32 = 30_000;
/// Sentinel distance substituted for a timed-out ranging cycle.
pub const FAR_DISTANCE_CM: f32 = 9999.0;

// Sim default is a timeout: "no obstacle" is the safe boot assumption.
static SIM_ECHO_US: AtomicI64 = AtomicI64::new(-1);

/// Inject the next echo duration for host-side tests.
/// Negative values simulate a timeout.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_echo_us(us: i64) {
    SIM_ECHO_US.store(us, Ordering::Relaxed);
}

/// One distance measurement.
#[derive(Debug, Clone, Copy)]
pub struct DistanceReading {
    /// Raw echo pulse width; `None` when the echo timed out.
    pub echo_us: Option<u32>,
    /// Distance in centimeters; [`FAR_DISTANCE_CM`] on timeout.
    pub cm: f32,
}

impl DistanceReading {
    pub fn timed_out(&self) -> bool {
        self.echo_us.is_none()
    }
}

pub struct UltrasonicSensor {
    _trig_gpio: i32,
    _echo_gpio: i32,
}

impl UltrasonicSensor {
    pub fn new(trig_gpio: i32, echo_gpio: i32) -> Self {
        Self {
            _trig_gpio: trig_gpio,
            _echo_gpio: echo_gpio,
        }
    }

    /// Run one ranging cycle. Never fails; a timeout yields the sentinel.
    pub fn measure(&mut self) -> DistanceReading {
        match self.ping() {
            Some(echo_us) => DistanceReading {
                echo_us: Some(echo_us),
                cm: echo_us_to_cm(echo_us),
            },
            None => DistanceReading {
                echo_us: None,
                cm: FAR_DISTANCE_CM,
            },
        }
    }

    #[cfg(target_os = "espidf")]
    fn ping(&self) -> Option<u32> {
        hw_init::gpio_write(pins::ULTRASONIC_TRIG_GPIO, false);
        hw_init::delay_us(TRIG_SETTLE_US);
        hw_init::gpio_write(pins::ULTRASONIC_TRIG_GPIO, true);
        hw_init::delay_us(TRIG_PULSE_US);
        hw_init::gpio_write(pins::ULTRASONIC_TRIG_GPIO, false);

        hw_init::pulse_in_us(pins::ULTRASONIC_ECHO_GPIO, true, MAX_ECHO_US)
    }

    #[cfg(not(target_os = "espidf"))]
    fn ping(&self) -> Option<u32> {
        let us = SIM_ECHO_US.load(Ordering::Relaxed);
        if us < 0 || us > i64::from(MAX_ECHO_US) {
            None
        } else {
            Some(us as u32)
        }
    }
}

/// Echo round-trip duration → one-way distance in centimeters.
fn echo_us_to_cm(echo_us: u32) -> f32 {
    (SOUND_SPEED_M_S * echo_us as f32) / 20000.0
}
