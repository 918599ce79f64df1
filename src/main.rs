//! SmartGate Firmware — Main Entry Point
//!
//! Hexagonal architecture around a fixed-cadence cooperative loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  HardwareAdapter      LogEventSink      WifiAdapter      │
//! │  (Sensor+Actuator)    (EventSink)       (boot precond.)  │
//! │  ConnectionManager<EspWsTransport>                       │
//! │  (ReportSink)                                            │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ─────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │             GateService (pure logic)               │  │
//! │  │  FSM · StateReporter                               │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Boot order: logger → peripherals → watchdog → WiFi (fatal on timeout)
//! → adapters → service start (gate closes) → control loop. Each loop
//! iteration: sleep one period, tick the service (measure → decide →
//! actuate → report), poll the reporting link, feed the watchdog.
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod pins;

pub mod app;
mod adapters;
mod drivers;
pub mod fsm;
pub mod link;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{error, info};

use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use adapters::wifi::WifiAdapter;
use app::service::GateService;
use config::{GateConfig, REPORT_URL, WIFI_PASSWORD, WIFI_SSID};
use drivers::servo::ServoDriver;
use drivers::watchdog::Watchdog;
use link::transport::EspWsTransport;
use link::ConnectionManager;
use sensors::ultrasonic::UltrasonicSensor;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SmartGate v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new();

    let config = GateConfig::default();

    // ── 3. WiFi association (boot precondition, bounded) ──────
    let mut wifi = WifiAdapter::new();
    wifi.set_credentials(WIFI_SSID, WIFI_PASSWORD)
        .map_err(|e| anyhow::anyhow!("WiFi credentials: {e}"))?;
    wifi.connect()
        .map_err(|e| anyhow::anyhow!("WiFi association: {e}"))?;

    // ── 4. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(
        UltrasonicSensor::new(pins::ULTRASONIC_TRIG_GPIO, pins::ULTRASONIC_ECHO_GPIO),
        ServoDriver::new(),
        config.open_angle_deg,
        config.closed_angle_deg,
    );
    let mut log_sink = LogEventSink::new();
    let mut reporting = ConnectionManager::new(
        EspWsTransport::new(REPORT_URL),
        config.backoff_ticks(),
    );

    // ── 5. Construct and start the service ────────────────────
    // The gate always boots shut; start() drives the servo there.
    let mut gate = GateService::new(config.clone());
    gate.start(&mut hw, &mut log_sink)?;

    info!("System ready. Entering control loop.");

    // ── 6. Control loop (~20 Hz) ──────────────────────────────
    loop {
        #[cfg(target_os = "espidf")]
        esp_idf_hal::delay::FreeRtos::delay_ms(config.loop_interval_ms);
        #[cfg(not(target_os = "espidf"))]
        std::thread::sleep(std::time::Duration::from_millis(u64::from(
            config.loop_interval_ms,
        )));

        // measure → decide → actuate → report. The only error that can
        // come back is an actuator fault, and that one is not retried.
        if let Err(e) = gate.tick(&mut hw, &mut reporting, &mut log_sink) {
            error!("actuator fault: {} — halting control", e);
            return Err(e.into());
        }

        // Drive the reporting link's reconnect machinery. Bounded work;
        // a dead network costs the loop nothing.
        reporting.poll();

        watchdog.feed();
    }
}
