//! Codec generation token, exposed read-only through the platform's
//! diagnostic version entry.

/// Protocol/version generation of the codec core.
///
/// `Undefined` until the composite device first assembles successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Version {
    /// No successful assembly yet.
    Undefined,
    /// First silicon generation.
    V1,
}

impl Version {
    /// Stable string token for the diagnostic entry.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Version::V1 => "QUARTET_1_0",
            Version::Undefined => "VER_UNDEFINED",
        }
    }
}
