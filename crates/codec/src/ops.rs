//! The macro-driver interface: callbacks and the attach-time bundle.
//!
//! Each macro is an independently-probed driver. It plugs into the codec by
//! attaching a [`MacroOps`] bundle; the [`CodecMacro`] trait object inside
//! the bundle carries the callbacks the core invokes and doubles as the
//! opaque owner handle returned by device lookup.

use crate::dai::DaiDescriptor;
use crate::error::MacroFault;

/// Opaque handle to one macro's register window.
///
/// The core never dereferences it; it is passed through to the register
/// transport together with a register offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterWindow(usize);

impl RegisterWindow {
    /// Wrap a window base. The meaning of the value is a contract between
    /// the attaching macro and the register transport in use.
    #[must_use]
    pub const fn new(base: usize) -> Self {
        Self(base)
    }

    /// The raw window base.
    #[must_use]
    pub const fn base(self) -> usize {
        self.0
    }
}

/// Callbacks a macro driver exposes to the codec core.
///
/// `set_clock` is mandatory: it is the only legal way to power the macro's
/// clock domain, and the core relies on it being present for every attached
/// macro. The lifecycle callbacks default to no-ops for macros that need no
/// work at composite assembly or teardown.
///
/// Implementations must be `Sync`: callbacks are invoked under the core's
/// locks from whichever thread performed the triggering operation.
pub trait CodecMacro: Sync {
    /// Enable or disable this macro's clock output.
    ///
    /// Bounded-latency, synchronous. A failed enable must leave the clock
    /// off; a failed disable leaves it in an unspecified state that the
    /// macro driver is responsible for recovering.
    fn set_clock(&self, enable: bool) -> Result<(), MacroFault>;

    /// Invoked once when the composite device assembles.
    fn on_assemble(&self) -> Result<(), MacroFault> {
        Ok(())
    }

    /// Invoked once when the composite device disassembles. Failures are
    /// collected by the core, never propagated — teardown always completes.
    fn on_disassemble(&self) -> Result<(), MacroFault> {
        Ok(())
    }
}

/// Everything a macro supplies when it attaches.
#[derive(Clone, Copy)]
pub struct MacroOps {
    /// The macro driver; also the opaque handle returned by device lookup.
    pub handler: &'static dyn CodecMacro,
    /// This macro's register window.
    pub window: RegisterWindow,
    /// Externally-owned stream descriptors, copied into the aggregate
    /// table at assembly time.
    pub dais: &'static [DaiDescriptor],
    /// Compatible string of the device the macro believes is its parent.
    /// Attach rejects the bundle unless it names this codec.
    pub parent: &'static str,
}
