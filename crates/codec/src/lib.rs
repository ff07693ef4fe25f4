//! Quartet codec macro aggregation driver.
//!
//! The Quartet audio codec is built from four independently-probed hardware
//! macros (Tx, Rx, Speaker, Voice) sharing one memory-mapped register space
//! and a small set of physical clock sources. This crate is the glue that
//! presents them to the platform as a single logical device:
//!
//! - **Registry / aggregation** — macros attach and detach as their drivers
//!   probe; the composite codec assembles exactly when the configured
//!   number of macros is present and disassembles when it drops below.
//! - **Clock-mux arbiter** — enable/disable of the shared clock sources is
//!   serialized and sequenced so a macro's registers are only touched while
//!   its clock path is verifiably powered, with unwind-on-failure ordering
//!   for the two-hop secondary routes.
//!
//! # Architecture
//!
//! ```text
//! macro drivers (Tx, Rx, Speaker, Voice)
//!         ↓ attach / detach / request_clock / read / write
//! QuartetCodec (this crate — registry + clock arbiter)
//!         ↓ RegisterTransport
//! Bus layer (AHB window, feature `mmio`)
//! ```
//!
//! Two independent lock domains serialize the core: the registry lock
//! (population + assembly/teardown) and the clock lock (route transitions
//! + guarded register access). Both are `embassy-sync` blocking mutexes,
//! generic over the raw mutex so firmware and host tests pick their own.
//!
//! # Features
//!
//! - `std`: standard-library support (for testing)
//! - `mmio`: volatile AHB register-window transport (hardware only)
//! - `defmt`: defmt logging and `Format` derives (hardware only)

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// Pedantic lints suppressed for this driver crate:
#![allow(clippy::doc_markdown)] // register names and macro ids in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]

pub mod card;
pub mod clock;
pub mod config;
pub mod dai;
pub mod error;
pub mod macro_id;
pub mod mux;
pub mod ops;
pub mod transport;
pub mod version;

pub use card::{QuartetCodec, TeardownFaults};
pub use config::{CodecConfig, COMPATIBLE};
pub use dai::{DaiDescriptor, StreamCaps, MAX_AGGREGATE_DAIS};
pub use error::{CodecError, MacroFault};
pub use macro_id::{MacroId, MACRO_COUNT};
pub use mux::{MuxRoutes, RouteSel};
pub use ops::{CodecMacro, MacroOps, RegisterWindow};
pub use transport::RegisterTransport;
pub use version::Version;

#[cfg(feature = "mmio")]
pub use transport::AhbTransport;
