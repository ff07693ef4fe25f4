//! Codec configuration, supplied by the platform's hardware-description
//! parser at card creation.

use crate::macro_id::MACRO_COUNT;

/// Compatible string identifying this codec generation. Macro drivers name
/// it in their attach bundle; attach rejects anything else.
pub const COMPATIBLE: &str = "soulaudio,quartet-codec";

/// Static configuration for one codec card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CodecConfig {
    /// How many macros this board populates. The composite device assembles
    /// exactly when this many macros have attached. Must be in
    /// `1..=MACRO_COUNT`; validated at card creation.
    pub expected_macros: usize,
    /// Board wires the Voice macro without the decimation block. Selects
    /// the Voice macro's register-access policy in the platform's regmap
    /// layer; carried opaquely by the core.
    pub voice_without_decimation: bool,
    /// Compatible string macro attach bundles are checked against.
    pub compatible: &'static str,
}

impl CodecConfig {
    /// Configuration for a fully-populated board.
    #[must_use]
    pub const fn new(expected_macros: usize) -> Self {
        Self {
            expected_macros,
            voice_without_decimation: false,
            compatible: COMPATIBLE,
        }
    }

    /// `true` when `expected_macros` is in range.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.expected_macros >= 1 && self.expected_macros <= MACRO_COUNT
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new(MACRO_COUNT)
    }
}
