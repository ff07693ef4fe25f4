//! DAI (digital audio interface) descriptor value types.
//!
//! Each macro exports a static table of stream descriptors at attach time.
//! The codec core copies them verbatim into one aggregate table when the
//! composite device assembles; it never interprets the capability fields.

/// Maximum number of DAI descriptors across all macros in the aggregate
/// table. Sized for the worst shipping configuration (4 macros × 4 DAIs).
pub const MAX_AGGREGATE_DAIS: usize = 16;

/// Stream capabilities for one direction of a DAI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamCaps {
    /// Minimum channel count.
    pub channels_min: u8,
    /// Maximum channel count.
    pub channels_max: u8,
    /// Supported sample-rate bitmask (platform encoding, opaque here).
    pub rates: u32,
    /// Supported sample-format bitmask (platform encoding, opaque here).
    pub formats: u32,
}

/// One audio stream endpoint exported by a macro.
///
/// Consumed verbatim by the platform's device-registration facility; the
/// codec core only concatenates these, in ascending macro-identity order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DaiDescriptor {
    /// Stable DAI name (e.g. `"quartet_rx1"`).
    pub name: &'static str,
    /// Platform DAI id, unique within the aggregate table.
    pub id: u16,
    /// Playback capabilities, if the DAI has a playback stream.
    pub playback: Option<StreamCaps>,
    /// Capture capabilities, if the DAI has a capture stream.
    pub capture: Option<StreamCaps>,
}
