//! Shared test doubles: recording macro drivers and a recording register
//! transport.
//!
//! Handlers must be `&'static` (the codec holds them for the card's
//! lifetime), so every double is `Box::leak`ed per test.

#![allow(dead_code)] // not every test binary uses every helper

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use codec::{
    CodecConfig, CodecMacro, DaiDescriptor, MacroFault, MacroId, MacroOps, QuartetCodec,
    RegisterTransport, RegisterWindow, StreamCaps, COMPATIBLE,
};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;

/// One recorded callback invocation.
pub type Event = (MacroId, &'static str);

/// Cross-macro ordered event log. Shared by every mock attached to one card
/// so tests can assert sequencing across macros.
pub struct EventLog(Mutex<Vec<Event>>);

impl EventLog {
    pub fn leak() -> &'static Self {
        Box::leak(Box::new(Self(Mutex::new(Vec::new()))))
    }

    pub fn record(&self, id: MacroId, what: &'static str) {
        self.0.lock().unwrap().push((id, what));
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    /// Events recorded after the first `skip` entries.
    pub fn events_from(&self, skip: usize) -> Vec<Event> {
        self.events().split_off(skip)
    }

    pub fn count(&self, id: MacroId, what: &'static str) -> usize {
        self.events()
            .iter()
            .filter(|(eid, ewhat)| *eid == id && *ewhat == what)
            .count()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

/// Recording macro driver with per-callback failure injection.
pub struct MockMacro {
    id: MacroId,
    log: &'static EventLog,
    pub fail_enable: AtomicBool,
    pub fail_disable: AtomicBool,
    pub fail_assemble: AtomicBool,
    pub fail_disassemble: AtomicBool,
}

impl MockMacro {
    pub fn leak(id: MacroId, log: &'static EventLog) -> &'static Self {
        Box::leak(Box::new(Self {
            id,
            log,
            fail_enable: AtomicBool::new(false),
            fail_disable: AtomicBool::new(false),
            fail_assemble: AtomicBool::new(false),
            fail_disassemble: AtomicBool::new(false),
        }))
    }
}

impl CodecMacro for MockMacro {
    fn set_clock(&self, enable: bool) -> Result<(), MacroFault> {
        if enable {
            if self.fail_enable.load(Ordering::SeqCst) {
                self.log.record(self.id, "clk_on_fail");
                return Err(MacroFault::ClockNotSettled);
            }
            self.log.record(self.id, "clk_on");
        } else {
            if self.fail_disable.load(Ordering::SeqCst) {
                self.log.record(self.id, "clk_off_fail");
                return Err(MacroFault::ClockNotSettled);
            }
            self.log.record(self.id, "clk_off");
        }
        Ok(())
    }

    fn on_assemble(&self) -> Result<(), MacroFault> {
        if self.fail_assemble.load(Ordering::SeqCst) {
            self.log.record(self.id, "init_fail");
            return Err(MacroFault::InitFailed);
        }
        self.log.record(self.id, "init");
        Ok(())
    }

    fn on_disassemble(&self) -> Result<(), MacroFault> {
        if self.fail_disassemble.load(Ordering::SeqCst) {
            self.log.record(self.id, "exit_fail");
            return Err(MacroFault::PowerCollapsed);
        }
        self.log.record(self.id, "exit");
        Ok(())
    }
}

/// Recording register transport backed by a sparse register file.
#[derive(Default)]
pub struct MockTransport {
    regs: Mutex<HashMap<(usize, u16), u8>>,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl RegisterTransport for MockTransport {
    fn read(&self, window: RegisterWindow, reg: u16) -> u8 {
        self.reads.fetch_add(1, Ordering::SeqCst);
        *self
            .regs
            .lock()
            .unwrap()
            .get(&(window.base(), reg))
            .unwrap_or(&0)
    }

    fn write(&self, window: RegisterWindow, reg: u16, value: u8) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.regs.lock().unwrap().insert((window.base(), reg), value);
    }
}

pub type TestCard = QuartetCodec<NoopRawMutex, MockTransport>;

/// A card expecting `expected` macros, with default (valid) config.
pub fn card(expected: usize) -> TestCard {
    QuartetCodec::new(CodecConfig::new(expected), MockTransport::default())
        .expect("config is valid")
}

/// Attach bundle naming the correct parent.
pub fn ops_for(
    handler: &'static MockMacro,
    window_base: usize,
    dais: &'static [DaiDescriptor],
) -> MacroOps {
    MacroOps {
        handler,
        window: RegisterWindow::new(window_base),
        dais,
        parent: COMPATIBLE,
    }
}

const CAPS: StreamCaps = StreamCaps {
    channels_min: 1,
    channels_max: 2,
    rates: 0x0000_03FF,
    formats: 0x0000_0007,
};

pub const fn dai(name: &'static str, id: u16) -> DaiDescriptor {
    DaiDescriptor {
        name,
        id,
        playback: Some(CAPS),
        capture: None,
    }
}

pub static TX_DAIS: [DaiDescriptor; 2] = [dai("quartet_tx1", 0), dai("quartet_tx2", 1)];
pub static RX_DAIS: [DaiDescriptor; 2] = [dai("quartet_rx1", 2), dai("quartet_rx2", 3)];
pub static SPEAKER_DAIS: [DaiDescriptor; 1] = [dai("quartet_spk1", 4)];
pub static VOICE_DAIS: [DaiDescriptor; 1] = [dai("quartet_va1", 5)];

/// More descriptors than the aggregate table holds.
pub static OVERSIZED_DAIS: [DaiDescriptor; 17] = [dai("quartet_overflow", 99); 17];
