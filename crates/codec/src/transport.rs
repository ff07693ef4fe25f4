//! Register transport: the mechanism that performs the actual bus access.
//!
//! The codec core gates every access behind the clock arbiter but does not
//! know how a register is physically reached. The transport is infallible by
//! contract — on this hardware a bus access to a *clocked* domain cannot
//! fail, and an unclocked access hangs silently, which is exactly what the
//! clock gating exists to prevent.

use crate::ops::RegisterWindow;

/// Performs raw register accesses against a macro's register window.
///
/// `reg` is a 16-bit byte offset into the window; values are single bytes.
pub trait RegisterTransport {
    /// Read one register.
    fn read(&self, window: RegisterWindow, reg: u16) -> u8;

    /// Write one register.
    fn write(&self, window: RegisterWindow, reg: u16, value: u8);
}

/// AHB register transport: each 8-bit codec register occupies the low byte
/// of a 32-bit bus word at `window + reg`.
#[cfg(feature = "mmio")]
pub struct AhbTransport(());

#[cfg(feature = "mmio")]
impl AhbTransport {
    /// Create the AHB transport.
    ///
    /// # Safety
    /// Every [`RegisterWindow`] later passed to this transport must be the
    /// virtual base of a mapped codec register block, valid for volatile
    /// 32-bit reads and writes at all offsets the macros address.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self(())
    }
}

#[cfg(feature = "mmio")]
impl RegisterTransport for AhbTransport {
    #[allow(clippy::arithmetic_side_effects)] // window base + 16-bit offset cannot overflow usize
    fn read(&self, window: RegisterWindow, reg: u16) -> u8 {
        let addr = window.base() + usize::from(reg);
        // SAFETY: `window` maps a live codec register block (constructor
        // contract) and `reg` stays within it, so `addr` is a valid MMIO
        // word address.
        let word = unsafe { core::ptr::read_volatile(addr as *const u32) };
        (word & 0xFF) as u8
    }

    #[allow(clippy::arithmetic_side_effects)] // window base + 16-bit offset cannot overflow usize
    fn write(&self, window: RegisterWindow, reg: u16, value: u8) {
        let addr = window.base() + usize::from(reg);
        // SAFETY: as in `read` — the constructor contract guarantees the
        // address is a valid MMIO word address.
        unsafe { core::ptr::write_volatile(addr as *mut u32, u32::from(value)) };
    }
}
