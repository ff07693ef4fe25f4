//! Error types for the codec core.

use thiserror_no_std::Error;

use crate::macro_id::MacroId;

/// Typed failures returned by codec-core operations.
///
/// No operation panics and none retries internally; retry policy belongs to
/// the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Macro identity out of range, or a route selector the mux table does
    /// not define for the macro.
    #[error("invalid macro identity or route")]
    InvalidIdentity,
    /// Caller is not a recognized child of this codec, or the slot is
    /// already claimed by another context.
    #[error("caller is not a child of this codec")]
    InvalidOwner,
    /// Operation on a macro with no populated slot.
    #[error("macro is not attached")]
    NotAttached,
    /// The resolved clock route has no live clock callback. Happens only if
    /// the provider detached without the mux being revised.
    #[error("resolved clock route has no live provider")]
    ClockProviderUnavailable,
    /// A provider's clock callback failed while enabling.
    #[error("clock enable failed")]
    ClockEnableFailed,
    /// A provider's clock callback failed while disabling.
    #[error("clock disable failed")]
    ClockDisableFailed,
    /// A macro's `on_assemble` callback failed; the composite device was
    /// not exposed. Carries the macro that failed.
    #[error("macro init failed during assembly")]
    AssemblyFailed(MacroId),
    /// The aggregate DAI table could not hold every macro's descriptors.
    #[error("aggregate DAI table overflow")]
    AllocationFailed,
}

/// Failure reported by a macro driver from one of its callbacks.
///
/// The codec core never interprets the variant beyond logging; it maps the
/// failure onto a [`CodecError`] according to which callback failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroFault {
    /// The macro's clock source did not settle (PLL unlock, divider stuck).
    ClockNotSettled,
    /// The macro's power domain is collapsed and cannot service the call.
    PowerCollapsed,
    /// Macro-internal initialisation or teardown failed.
    InitFailed,
}
