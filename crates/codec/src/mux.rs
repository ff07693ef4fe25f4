//! Master-clock mux routing table.
//!
//! Each macro's register domain is clocked by one of at most two upstream
//! macros. Route 0 (primary) is always defined; route 1 (secondary) rides on
//! top of the primary provider being powered — enabling a secondary route
//! first enables the primary provider, and a secondary route that is active
//! keeps the primary provider powered underneath it.
//!
//! The base table is immutable. If the hub macro ([`MacroId::HUB`]) never
//! probes, `Speaker` and `Voice` have no upstream clock and fall back to
//! self-clocking; [`effective_routes`] computes that rewrite as a pure
//! function, applied exactly once when aggregation completes.

use crate::macro_id::{by_id_mut, MacroId, MACRO_COUNT};

/// Which of a macro's candidate clock routes a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RouteSel {
    /// Route 0 — always defined once configured.
    Primary,
    /// Route 1 — only defined where the table lists a second candidate;
    /// depends on the primary provider being powered.
    Secondary,
}

/// The 1–2 candidate upstream clock providers for one macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MuxRoutes {
    /// Route 0 provider.
    pub primary: MacroId,
    /// Route 1 provider, where the silicon wires one.
    pub secondary: Option<MacroId>,
}

/// Base clock-mux table, indexed by macro slot. Fixed by silicon.
pub(crate) const BASE_MUX: [MuxRoutes; MACRO_COUNT] = [
    // Tx
    MuxRoutes {
        primary: MacroId::Tx,
        secondary: Some(MacroId::Voice),
    },
    // Rx
    MuxRoutes {
        primary: MacroId::Tx,
        secondary: Some(MacroId::Rx),
    },
    // Speaker
    MuxRoutes {
        primary: MacroId::Tx,
        secondary: Some(MacroId::Speaker),
    },
    // Voice
    MuxRoutes {
        primary: MacroId::Tx,
        secondary: Some(MacroId::Voice),
    },
];

/// Compute the routing table in effect for a given hub population.
///
/// With the hub present this is the base table. Without it, `Speaker` and
/// `Voice` are rebound to clock themselves; `Rx` keeps its hub route (a
/// hub-less configuration that still expects `Rx` is not a supported
/// board layout, and the guarded-access path reports the dead route).
pub(crate) fn effective_routes(hub_present: bool) -> [MuxRoutes; MACRO_COUNT] {
    let mut table = BASE_MUX;
    if !hub_present {
        by_id_mut(&mut table, MacroId::Speaker).primary = MacroId::Speaker;
        by_id_mut(&mut table, MacroId::Voice).primary = MacroId::Voice;
    }
    table
}
