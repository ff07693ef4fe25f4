//! The codec card: macro registry and aggregation controller.
//!
//! Macros attach and detach dynamically as their drivers probe. The card
//! tracks population and flips the composite device between not-ready and
//! ready exactly when the attached count crosses the configured target.
//! All population changes and any assembly/teardown they trigger run under
//! one registry lock, so no caller ever observes a torn state (count bumped
//! but init callbacks not yet run).
//!
//! Lock order where both domains are touched: registry, then clock.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use crate::clock::ClockDomain;
use crate::config::CodecConfig;
use crate::dai::{DaiDescriptor, MAX_AGGREGATE_DAIS};
use crate::error::{CodecError, MacroFault};
use crate::macro_id::{by_id, by_id_mut, MacroId, MACRO_COUNT};
use crate::ops::{CodecMacro, MacroOps};
use crate::transport::RegisterTransport;
use crate::version::Version;

/// Non-fatal faults collected while tearing the composite device down.
///
/// Teardown always completes; callers inspect these if they care why an
/// exit callback complained.
pub type TeardownFaults = Vec<(MacroId, MacroFault), MACRO_COUNT>;

/// One registry slot.
struct MacroSlot {
    /// Present iff the macro is attached. Doubles as the opaque owner
    /// handle returned by [`QuartetCodec::macro_device`].
    handler: Option<&'static dyn CodecMacro>,
    /// The macro's stream descriptors; empty while detached.
    dais: &'static [DaiDescriptor],
}

impl MacroSlot {
    const EMPTY: Self = Self {
        handler: None,
        dais: &[],
    };
}

/// Registry and aggregation state. Guarded by the registry lock.
struct Registry {
    slots: [MacroSlot; MACRO_COUNT],
    attached: usize,
    /// Whether each slot was ever populated; drives the one-time clock-mux
    /// rebinding when the hub macro never probes.
    ever_attached: [bool; MACRO_COUNT],
    assembled: bool,
    aggregate: Vec<DaiDescriptor, MAX_AGGREGATE_DAIS>,
    version: Version,
}

impl Registry {
    const fn new() -> Self {
        Self {
            slots: [MacroSlot::EMPTY; MACRO_COUNT],
            attached: 0,
            ever_attached: [false; MACRO_COUNT],
            assembled: false,
            aggregate: Vec::new(),
            version: Version::Undefined,
        }
    }
}

/// The Quartet codec card.
///
/// Generic over the raw mutex (firmware uses `CriticalSectionRawMutex`,
/// host tests use `NoopRawMutex`) and the register transport.
pub struct QuartetCodec<M: RawMutex, T: RegisterTransport> {
    config: CodecConfig,
    pub(crate) transport: T,
    registry: Mutex<M, RefCell<Registry>>,
    pub(crate) clock: Mutex<M, RefCell<ClockDomain>>,
}

impl<M: RawMutex, T: RegisterTransport> QuartetCodec<M, T> {
    /// Create a card for the given board configuration.
    ///
    /// # Errors
    /// `InvalidIdentity` when `expected_macros` is zero or exceeds
    /// [`MACRO_COUNT`].
    pub fn new(config: CodecConfig, transport: T) -> Result<Self, CodecError> {
        if !config.is_valid() {
            return Err(CodecError::InvalidIdentity);
        }
        Ok(Self {
            config,
            transport,
            registry: Mutex::new(RefCell::new(Registry::new())),
            clock: Mutex::new(RefCell::new(ClockDomain::new())),
        })
    }

    /// Attach a macro to its slot.
    ///
    /// Publishes the macro's clock callback and register window, then — if
    /// this attach completes the expected population — assembles the
    /// composite device before returning.
    ///
    /// # Errors
    /// - `InvalidOwner` when the bundle names a different parent device or
    ///   the slot is already claimed.
    /// - Any [`assemble`](#method-assemble) failure, reported to this
    ///   (final) attacher; population state is kept.
    pub fn attach(&self, id: MacroId, ops: MacroOps) -> Result<(), CodecError> {
        if ops.parent != self.config.compatible {
            #[cfg(feature = "defmt")]
            defmt::warn!("attach {}: bundle names foreign parent, rejecting", id);
            return Err(CodecError::InvalidOwner);
        }
        self.registry.lock(|cell| {
            let mut reg = cell.borrow_mut();
            if by_id(&reg.slots, id).handler.is_some() {
                return Err(CodecError::InvalidOwner);
            }
            let slot = by_id_mut(&mut reg.slots, id);
            slot.handler = Some(ops.handler);
            slot.dais = ops.dais;
            *by_id_mut(&mut reg.ever_attached, id) = true;
            reg.attached = reg.attached.saturating_add(1);

            self.clock.lock(|clk| {
                clk.borrow_mut().publish(id, ops.handler, ops.window);
            });
            #[cfg(feature = "defmt")]
            defmt::debug!("attached {} ({}/{})", id, reg.attached, self.config.expected_macros);

            if reg.attached == self.config.expected_macros {
                self.assemble(&mut reg)
            } else {
                Ok(())
            }
        })
    }

    /// Detach a macro from its slot.
    ///
    /// If the composite device was assembled and this detach drops the
    /// population below target, it is disassembled first — the departing
    /// macro's exit callback still runs. Safe to call for a slot that was
    /// never populated (no-op).
    ///
    /// Returns the non-fatal faults collected during teardown; empty when
    /// no teardown ran or every exit callback succeeded.
    pub fn detach(&self, id: MacroId) -> TeardownFaults {
        self.registry.lock(|cell| {
            let mut reg = cell.borrow_mut();
            if by_id(&reg.slots, id).handler.is_none() {
                return TeardownFaults::new();
            }
            let mut faults = TeardownFaults::new();
            // Tear down only when this detach drops the population below
            // target; a surplus macro leaving an over-populated board does
            // not disturb the composite device.
            if reg.assembled && reg.attached == self.config.expected_macros {
                faults = Self::disassemble(&mut reg);
            }
            let slot = by_id_mut(&mut reg.slots, id);
            slot.handler = None;
            slot.dais = &[];
            reg.attached = reg.attached.saturating_sub(1);

            self.clock.lock(|clk| clk.borrow_mut().withdraw(id));
            #[cfg(feature = "defmt")]
            defmt::debug!("detached {} ({}/{})", id, reg.attached, self.config.expected_macros);
            faults
        })
    }

    /// Assemble the composite device. Called with the registry lock held,
    /// only when the population target has just been met.
    fn assemble(&self, reg: &mut Registry) -> Result<(), CodecError> {
        // 1. Concatenate every attached macro's DAI descriptors, ascending
        //    identity order. The order is an external contract.
        reg.aggregate.clear();
        for id in MacroId::ALL {
            let slot = by_id(&reg.slots, id);
            if slot.handler.is_none() {
                continue;
            }
            for dai in slot.dais {
                if reg.aggregate.push(*dai).is_err() {
                    reg.aggregate.clear();
                    return Err(CodecError::AllocationFailed);
                }
            }
        }

        // 2. One-time mux rewrite: a board that never populated the hub
        //    leaves Speaker/Voice with no upstream clock.
        let hub_present = *by_id(&reg.ever_attached, MacroId::HUB);
        self.clock
            .lock(|clk| clk.borrow_mut().rebind_for_population(hub_present));

        // 3. Init callbacks, ascending identity order. A failure aborts
        //    assembly; macros already initialised are left that way — the
        //    recovery policy (fresh attach cycle) belongs to the platform.
        for id in MacroId::ALL {
            if let Some(handler) = by_id(&reg.slots, id).handler {
                if handler.on_assemble().is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("assembly aborted: init failed for {}", id);
                    return Err(CodecError::AssemblyFailed(id));
                }
            }
        }

        // 4. Expose the composite device.
        reg.assembled = true;
        reg.version = Version::V1;
        #[cfg(feature = "defmt")]
        defmt::info!("composite codec assembled, {} DAIs", reg.aggregate.len());
        Ok(())
    }

    /// Disassemble the composite device. Exit callbacks run best-effort in
    /// ascending identity order; faults are collected, never propagated.
    fn disassemble(reg: &mut Registry) -> TeardownFaults {
        let mut faults = TeardownFaults::new();
        for id in MacroId::ALL {
            if let Some(handler) = by_id(&reg.slots, id).handler {
                if let Err(fault) = handler.on_disassemble() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("exit callback failed for {}", id);
                    // Capacity is one entry per macro; push cannot fail.
                    let _ = faults.push((id, fault));
                }
            }
        }
        reg.assembled = false;
        reg.aggregate.clear();
        faults
    }

    /// `true` while the composite device is exposed.
    pub fn assembled(&self) -> bool {
        self.registry.lock(|cell| cell.borrow().assembled)
    }

    /// Number of currently attached macros.
    pub fn attached_count(&self) -> usize {
        self.registry.lock(|cell| cell.borrow().attached)
    }

    /// Snapshot of the aggregate DAI table; `Some` only while assembled.
    pub fn aggregate_dais(&self) -> Option<Vec<DaiDescriptor, MAX_AGGREGATE_DAIS>> {
        self.registry.lock(|cell| {
            let reg = cell.borrow();
            reg.assembled.then(|| reg.aggregate.clone())
        })
    }

    /// The attached context for a macro, or `None` when not attached.
    pub fn macro_device(&self, id: MacroId) -> Option<&'static dyn CodecMacro> {
        self.registry.lock(|cell| by_id(&cell.borrow().slots, id).handler)
    }

    /// Codec generation token for the diagnostic version entry.
    pub fn version(&self) -> Version {
        self.registry.lock(|cell| cell.borrow().version)
    }

    /// Register-access-policy flag for the Voice macro, carried opaquely
    /// from configuration for the platform's regmap layer.
    pub fn voice_without_decimation(&self) -> bool {
        self.config.voice_without_decimation
    }

    /// The card's configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The register transport backing guarded accesses.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
