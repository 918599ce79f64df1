//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap. This is the classic embedded C FSM pattern expressed
//! in safe Rust.
//!
//! ```text
//!  CLOSED ──[reading < threshold]──▶ OPEN
//!     ▲                               │
//!     │        [reading ≥ threshold for a full hold window]
//!     └───────────────────────────────┘
//! ```
//!
//! While OPEN, every near reading resets the hold window; the gate closes
//! only after `hold_open_secs` of uninterrupted far readings. An echo
//! timeout reaches the handlers as the sentinel far distance, so it counts
//! toward the window like any other far reading.

use super::context::{GateContext, GatePosition};
use super::{StateDescriptor, StateId};
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Closed
        StateDescriptor {
            id: StateId::Closed,
            name: "Closed",
            on_enter: Some(closed_enter),
            on_exit: None,
            on_update: closed_update,
        },
        // Index 1 — Open
        StateDescriptor {
            id: StateId::Open,
            name: "Open",
            on_enter: Some(open_enter),
            on_exit: None,
            on_update: open_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  CLOSED state
// ═══════════════════════════════════════════════════════════════════════════

fn closed_enter(ctx: &mut GateContext) {
    ctx.commands.position = GatePosition::Closed;
    info!("CLOSED: gate shut, watching for approach");
}

fn closed_update(ctx: &mut GateContext) -> Option<StateId> {
    if ctx.object_near() {
        return Some(StateId::Open);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  OPEN state — holding for the object, then a full quiet window
// ═══════════════════════════════════════════════════════════════════════════

fn open_enter(ctx: &mut GateContext) {
    ctx.commands.position = GatePosition::Open;
    ctx.far_ticks = 0;
    info!(
        "OPEN: object at {:.1} cm, holding for {:.1}s after it leaves",
        ctx.distance_cm, ctx.config.hold_open_secs
    );
}

fn open_update(ctx: &mut GateContext) -> Option<StateId> {
    if ctx.object_near() {
        // Retrigger: the hold window restarts from this reading.
        ctx.far_ticks = 0;
        return None;
    }

    ctx.far_ticks = ctx.far_ticks.saturating_add(1);
    if ctx.far_ticks >= ctx.config.hold_open_ticks() {
        info!(
            "OPEN: clear for {:.1}s, closing",
            ctx.far_ticks as f32 * ctx.tick_period_secs
        );
        return Some(StateId::Closed);
    }

    None
}
