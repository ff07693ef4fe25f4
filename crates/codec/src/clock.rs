//! Clock arbiter and guarded register access.
//!
//! Every clock transition and every register access runs end-to-end under
//! one clock-state lock: resolve route, enable, operate or disable, update
//! route state. The two-hop secondary-route sequence is therefore atomic
//! with respect to any other clock request or register access on any macro
//! — the routes share physical clock providers across macros.
//!
//! A register read on an unclocked domain hangs the bus silently, and a
//! partial enable that is never unwound leaves a clock stuck on. Both
//! failure shapes are handled here and nowhere else.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::card::QuartetCodec;
use crate::error::CodecError;
use crate::macro_id::{by_id, by_id_mut, MacroId, MACRO_COUNT};
use crate::mux::{self, MuxRoutes, RouteSel};
use crate::ops::{CodecMacro, RegisterWindow};
use crate::transport::RegisterTransport;

/// Per-macro clock routing state. Guarded by the clock lock.
pub(crate) struct ClockDomain {
    /// Effective mux table: the base table, rewritten once at assembly if
    /// the hub never probed.
    routes: [MuxRoutes; MACRO_COUNT],
    /// Which macro currently supplies each macro's register-domain clock.
    current: [MacroId; MACRO_COUNT],
    /// Live clock callbacks; populated while the macro is attached.
    clocks: [Option<&'static dyn CodecMacro>; MACRO_COUNT],
    /// Register windows; populated while the macro is attached.
    windows: [Option<RegisterWindow>; MACRO_COUNT],
}

impl ClockDomain {
    pub(crate) fn new() -> Self {
        let routes = mux::BASE_MUX;
        let mut current = [MacroId::HUB; MACRO_COUNT];
        for id in MacroId::ALL {
            *by_id_mut(&mut current, id) = by_id(&routes, id).primary;
        }
        Self {
            routes,
            current,
            clocks: [None; MACRO_COUNT],
            windows: [None; MACRO_COUNT],
        }
    }

    /// Publish an attaching macro's clock callback and register window and
    /// point its route at the primary provider.
    pub(crate) fn publish(
        &mut self,
        id: MacroId,
        handler: &'static dyn CodecMacro,
        window: RegisterWindow,
    ) {
        *by_id_mut(&mut self.clocks, id) = Some(handler);
        *by_id_mut(&mut self.windows, id) = Some(window);
        *by_id_mut(&mut self.current, id) = by_id(&self.routes, id).primary;
    }

    /// Withdraw a detaching macro's callback and window.
    pub(crate) fn withdraw(&mut self, id: MacroId) {
        *by_id_mut(&mut self.clocks, id) = None;
        *by_id_mut(&mut self.windows, id) = None;
        *by_id_mut(&mut self.current, id) = by_id(&self.routes, id).primary;
    }

    /// Install the routing table in effect for the assembled population.
    /// Without the hub, Speaker and Voice become self-clocked and their
    /// current routes move with the rewrite.
    pub(crate) fn rebind_for_population(&mut self, hub_present: bool) {
        self.routes = mux::effective_routes(hub_present);
        if !hub_present {
            *by_id_mut(&mut self.current, MacroId::Speaker) = MacroId::Speaker;
            *by_id_mut(&mut self.current, MacroId::Voice) = MacroId::Voice;
        }
    }
}

/// Drive one provider's clock callback, mapping its fault to the
/// direction-appropriate error.
fn drive_provider(clk: &ClockDomain, provider: MacroId, enable: bool) -> Result<(), CodecError> {
    let Some(handler) = *by_id(&clk.clocks, provider) else {
        return Err(CodecError::ClockProviderUnavailable);
    };
    handler.set_clock(enable).map_err(|_fault| {
        if enable {
            CodecError::ClockEnableFailed
        } else {
            CodecError::ClockDisableFailed
        }
    })
}

impl<M: RawMutex, T: RegisterTransport> QuartetCodec<M, T> {
    /// Enable or disable one macro's clock over the selected route.
    ///
    /// Primary route: a single call to the primary provider; its failure is
    /// returned with no state to unwind.
    ///
    /// Secondary route: the primary provider is powered first (the
    /// secondary path rides on it), then the secondary provider is driven.
    /// If the secondary call fails the primary enable is unwound
    /// best-effort and the secondary's error is returned. On success with
    /// `enable == false` the temporary primary enable is dropped; with
    /// `enable == true` the primary stays powered underneath the active
    /// secondary route.
    ///
    /// On success the macro's current route records the selected provider
    /// when enabling, and falls back to the primary provider when
    /// disabling.
    ///
    /// # Errors
    /// - `NotAttached` when the macro has no populated slot.
    /// - `InvalidIdentity` when the mux table defines no secondary route.
    /// - `ClockProviderUnavailable` when a resolved provider has no live
    ///   clock callback.
    /// - `ClockEnableFailed` / `ClockDisableFailed` when a provider's
    ///   callback reports failure for the corresponding direction.
    pub fn request_clock(
        &self,
        id: MacroId,
        route: RouteSel,
        enable: bool,
    ) -> Result<(), CodecError> {
        self.clock.lock(|cell| {
            let mut clk = cell.borrow_mut();
            if by_id(&clk.clocks, id).is_none() {
                return Err(CodecError::NotAttached);
            }
            let routes = *by_id(&clk.routes, id);
            let selected = match route {
                RouteSel::Primary => {
                    drive_provider(&clk, routes.primary, enable)?;
                    routes.primary
                }
                RouteSel::Secondary => {
                    let secondary = routes.secondary.ok_or(CodecError::InvalidIdentity)?;
                    drive_provider(&clk, routes.primary, true)?;
                    if let Err(err) = drive_provider(&clk, secondary, enable) {
                        // Leaving the primary powered after a failed
                        // secondary transition would leak an enable; unwind
                        // it and surface the secondary's error.
                        if drive_provider(&clk, routes.primary, false).is_err() {
                            #[cfg(feature = "defmt")]
                            defmt::warn!("primary unwind failed for {}", id);
                        }
                        return Err(err);
                    }
                    if !enable {
                        // The secondary is now off; drop the temporary
                        // primary dependency.
                        if drive_provider(&clk, routes.primary, false).is_err() {
                            #[cfg(feature = "defmt")]
                            defmt::warn!("temporary primary disable failed for {}", id);
                        }
                    }
                    secondary
                }
            };
            *by_id_mut(&mut clk.current, id) = if enable { selected } else { routes.primary };
            Ok(())
        })
    }

    /// Read one register of `id`, clock-gated.
    ///
    /// The provider on the macro's current route is enabled for the
    /// duration of the access and released afterwards. A failed release
    /// after a completed access is logged and suppressed.
    ///
    /// # Errors
    /// - `NotAttached` when the macro has no register window.
    /// - `ClockProviderUnavailable` when the current route's provider has
    ///   no live clock callback; no bus access is made.
    /// - `ClockEnableFailed` when the provider refuses to power up; no bus
    ///   access is made.
    pub fn read(&self, id: MacroId, reg: u16) -> Result<u8, CodecError> {
        self.clock.lock(|cell| {
            let clk = cell.borrow();
            let window = (*by_id(&clk.windows, id)).ok_or(CodecError::NotAttached)?;
            let provider = *by_id(&clk.current, id);
            let Some(handler) = *by_id(&clk.clocks, provider) else {
                #[cfg(feature = "defmt")]
                defmt::debug!("read {}: no live clock on route provider {}", id, provider);
                return Err(CodecError::ClockProviderUnavailable);
            };
            if handler.set_clock(true).is_err() {
                #[cfg(feature = "defmt")]
                defmt::debug!("read {}: clock enable failed on {}", id, provider);
                return Err(CodecError::ClockEnableFailed);
            }
            let value = self.transport.read(window, reg);
            if handler.set_clock(false).is_err() {
                // The access already completed; record and move on.
                #[cfg(feature = "defmt")]
                defmt::debug!("read {}: clock release failed on {}", id, provider);
            }
            Ok(value)
        })
    }

    /// Write one register of `id`, clock-gated. Same gating and release
    /// semantics as [`read`](Self::read).
    ///
    /// # Errors
    /// As for [`read`](Self::read).
    pub fn write(&self, id: MacroId, reg: u16, value: u8) -> Result<(), CodecError> {
        self.clock.lock(|cell| {
            let clk = cell.borrow();
            let window = (*by_id(&clk.windows, id)).ok_or(CodecError::NotAttached)?;
            let provider = *by_id(&clk.current, id);
            let Some(handler) = *by_id(&clk.clocks, provider) else {
                #[cfg(feature = "defmt")]
                defmt::debug!("write {}: no live clock on route provider {}", id, provider);
                return Err(CodecError::ClockProviderUnavailable);
            };
            if handler.set_clock(true).is_err() {
                #[cfg(feature = "defmt")]
                defmt::debug!("write {}: clock enable failed on {}", id, provider);
                return Err(CodecError::ClockEnableFailed);
            }
            self.transport.write(window, reg, value);
            if handler.set_clock(false).is_err() {
                #[cfg(feature = "defmt")]
                defmt::debug!("write {}: clock release failed on {}", id, provider);
            }
            Ok(())
        })
    }

    /// Which macro currently supplies `id`'s register-domain clock.
    ///
    /// Always defined; routes fall back to the primary provider whenever a
    /// clock is explicitly disabled.
    pub fn clock_provider(&self, id: MacroId) -> MacroId {
        self.clock.lock(|cell| *by_id(&cell.borrow().current, id))
    }
}
