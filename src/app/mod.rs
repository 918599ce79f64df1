//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the SmartGate controller:
//! FSM orchestration, change-driven state reporting, and the inbound
//! command path. All interaction with hardware and the network happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod reporter;
pub mod service;
