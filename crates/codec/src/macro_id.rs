//! Macro identities for the Quartet codec.
//!
//! The codec is assembled from four independently-probed hardware macros
//! sharing one register space and a small set of clock sources. Identities
//! are fixed by silicon; the enum is closed and never grows at runtime.

/// Number of macro slots in the codec. Fixed by silicon.
pub const MACRO_COUNT: usize = 4;

/// Identity of one codec macro.
///
/// Discriminants are the slot indices used throughout the register and
/// clock-mux tables. `Tx` is the hub macro: it conventionally supplies the
/// master clock to the other macros (see [`crate::mux`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroId {
    /// Transmit (playback) path macro; hub clock supplier.
    Tx = 0,
    /// Receive (capture) path macro.
    Rx = 1,
    /// Speaker amplifier macro.
    Speaker = 2,
    /// Voice / always-on microphone macro.
    Voice = 3,
}

impl MacroId {
    /// All identities in ascending slot order. Aggregation and teardown
    /// iterate in exactly this order; the order is an external contract
    /// (the platform consumes the aggregate DAI list positionally).
    pub const ALL: [MacroId; MACRO_COUNT] = [
        MacroId::Tx,
        MacroId::Rx,
        MacroId::Speaker,
        MacroId::Voice,
    ];

    /// The hub macro that feeds most other macros' primary clock route.
    pub const HUB: MacroId = MacroId::Tx;

    /// Slot index of this identity. Always `< MACRO_COUNT`.
    #[inline]
    #[must_use]
    pub const fn idx(self) -> usize {
        self as usize
    }

    /// Identity for a raw slot index, or `None` when out of range.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(MacroId::Tx),
            1 => Some(MacroId::Rx),
            2 => Some(MacroId::Speaker),
            3 => Some(MacroId::Voice),
            _ => None,
        }
    }
}

/// Index a per-macro table by identity.
// MacroId::idx() is a closed-enum discriminant, always < MACRO_COUNT.
#[allow(clippy::indexing_slicing)]
#[inline]
pub(crate) fn by_id<T>(table: &[T; MACRO_COUNT], id: MacroId) -> &T {
    &table[id.idx()]
}

/// Mutably index a per-macro table by identity.
// MacroId::idx() is a closed-enum discriminant, always < MACRO_COUNT.
#[allow(clippy::indexing_slicing)]
#[inline]
pub(crate) fn by_id_mut<T>(table: &mut [T; MACRO_COUNT], id: MacroId) -> &mut T {
    &mut table[id.idx()]
}
