//! Shared error type for hub and channel operations.
//!
//! Every failure in this crate is synchronous and surfaced directly to the
//! caller of the offending operation; nothing is caught or retried
//! internally, and no operation is fatal to the process.

use thiserror::Error;

/// Boxed error produced by a failing listener callback.
pub type ListenerError = Box<dyn std::error::Error>;

/// Errors surfaced by [`EventHub`](crate::EventHub) and
/// [`EventChannel`](crate::EventChannel) operations.
#[derive(Debug, Error)]
pub enum EventError {
    /// A declared-name restriction is active and the requested channel name
    /// is not part of the declared set.
    #[error("event '{0}' is not declared")]
    UndeclaredChannel(String),

    /// The requested channel name uses the `__` prefix reserved for hub
    /// bookkeeping.
    #[error("event name '{0}' is reserved")]
    ReservedName(String),

    /// The channel exists but was materialized with a different payload type.
    #[error("event '{channel}' is bound to a different payload type")]
    TypeMismatch {
        /// Name of the already-materialized channel.
        channel: String,
    },

    /// The named channel has never been materialized on this hub.
    #[error("event '{0}' has not been created")]
    UnknownChannel(String),

    /// Positional listener access outside `[0, len)`.
    #[error("listener index {index} out of range for event '{channel}' (len {len})")]
    IndexOutOfRange {
        /// Name of the channel that was indexed.
        channel: String,
        /// The offending index.
        index: usize,
        /// Listener count at the time of access.
        len: usize,
    },

    /// A listener failed during fan-out. The remaining listeners of that
    /// invocation's snapshot pass were not called.
    #[error("listener '{label}' failed during fan-out of event '{channel}'")]
    ListenerFailed {
        /// Name of the channel being invoked.
        channel: String,
        /// Label of the listener that failed.
        label: String,
        /// The listener's own error.
        #[source]
        source: ListenerError,
    },
}
