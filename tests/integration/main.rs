//! Host-side integration test harness.
//!
//! Everything here runs on x86_64 against the simulation halves of the
//! cfg-gated drivers — no hardware, no network.

mod gate_service_tests;
mod mock_hw;
