//! Error types for the marquee engine.
//!
//! This module defines the engine's error taxonomy using `thiserror`. Errors compose via `?`
//! and `From` conversions inside the engine, but none of them ever reaches the embedding
//! component: every kind is recoverable and is logged and swallowed at the engine boundary.
//!
//! # Error Hierarchy
//!
//! - [`EngineError`] - Classification used by the engine shell
//!   - [`HostError`] - Faults reported by the host environment (disconnect, stale handle)
//!   - Cancellation - Disposal raced an in-flight host call
//!   - Callback faults - A user-registered handler failed
//!
//! # Error Recovery Strategy
//!
//! The worst outcome of any error is a frame where layout is stale or dragging is inert. The
//! affected handle is dropped and set up again on the next successful host round-trip.

use thiserror::Error;

/// Boxed error returned by user-registered callbacks.
pub type CallbackError = Box<dyn std::error::Error>;

/// Faults reported by the host environment.
///
/// The host is an external runtime (typically a browser tab reached over an interop bridge)
/// that can disappear at any point. Its failures are therefore expected, not exceptional.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// The host connection is gone (tab closed, circuit dropped, runtime torn down).
    ///
    /// **Recovery**: Treat the module as unavailable for this render pass and retry the setup
    /// on the next render.
    #[error("Host environment disconnected")]
    Disconnected,

    /// The call targeted a handle the host has already disposed.
    ///
    /// **Recovery**: Same as [`HostError::Disconnected`]; the handle is dropped and recreated.
    #[error("Host handle already disposed")]
    Disposed,

    /// The host rejected the call for another reason.
    #[error("Host call rejected: {0}")]
    Rejected(String),
}

/// Engine-level error classification.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The host could not be reached or refused the call.
    ///
    /// Covers disconnection and, by classification, stale-handle faults that slipped past the
    /// disposed-flag guards. Never surfaced to the caller.
    #[error("Host unavailable: {0}")]
    HostUnavailable(#[source] HostError),

    /// Disposal cancelled an in-flight host call, or the engine was already disposed when the
    /// call was about to be issued. Expected during teardown.
    #[error("Operation cancelled by disposal")]
    Cancelled,

    /// A user-registered callback returned an error or panicked.
    ///
    /// Caught at the callback boundary so it never corrupts engine state.
    #[error("User callback '{callback}' failed: {reason}")]
    CallbackFault {
        /// Which callback failed (`on_cycle_complete`, `on_finish`, `on_mount`).
        callback: &'static str,
        /// Error message or panic payload.
        reason: String,
    },

    /// An operation targeted a handle that was already disposed.
    #[error("Operation on disposed handle")]
    StaleHandle,
}

impl EngineError {
    /// Collapse stale-handle faults into host-unavailable, which is how they are treated.
    pub fn classify(self) -> Self {
        match self {
            Self::StaleHandle | Self::HostUnavailable(HostError::Disposed) => {
                Self::HostUnavailable(HostError::Disposed)
            }
            other => other,
        }
    }

    /// Whether this error is the expected outcome of disposal.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<HostError> for EngineError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Disposed => Self::StaleHandle,
            other => Self::HostUnavailable(other),
        }
        .classify()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnected_maps_to_host_unavailable() {
        let err: EngineError = HostError::Disconnected.into();
        assert!(matches!(
            err,
            EngineError::HostUnavailable(HostError::Disconnected)
        ));
    }

    #[test]
    fn stale_handle_classifies_as_host_unavailable() {
        let err: EngineError = HostError::Disposed.into();
        assert!(matches!(
            err,
            EngineError::HostUnavailable(HostError::Disposed)
        ));
        assert!(matches!(
            EngineError::StaleHandle.classify(),
            EngineError::HostUnavailable(HostError::Disposed)
        ));
    }

    #[test]
    fn only_cancelled_is_cancellation() {
        assert!(EngineError::Cancelled.is_cancellation());
        assert!(!EngineError::StaleHandle.is_cancellation());
    }

    #[test]
    fn callback_fault_message_names_the_callback() {
        let err = EngineError::CallbackFault {
            callback: "on_cycle_complete",
            reason: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "User callback 'on_cycle_complete' failed: boom"
        );
    }
}
