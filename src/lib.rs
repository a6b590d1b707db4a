//! In-process, synchronous multicast events.
//!
//! This crate provides a lightweight pub/sub point without a messaging
//! broker: an [`EventHub`] lazily materializes named [`EventChannel`]s, each
//! of which accumulates [`Listener`] callbacks and invokes them all, in
//! registration order, when the channel is raised.
//!
//! # Overview
//!
//! - **Lazy channels**: referencing a channel name for the first time creates
//!   the channel. A hub may optionally be restricted to a declared set of
//!   names, which turns a misspelled name into an error instead of a fresh
//!   empty channel.
//! - **Multicast fan-out**: invoking a channel calls every registered
//!   listener with a borrow of the same payload. Fan-out operates on a
//!   snapshot of the listener list, so listeners that subscribe or
//!   unsubscribe mid-broadcast only affect future invocations.
//! - **Introspection**: both the hub and its channels expose length,
//!   ordered iteration, and a diagnostic `describe()` form.
//!
//! # Example
//!
//! ```rust,ignore
//! use event_hub::{Event, EventHub, Listener};
//!
//! #[derive(Debug)]
//! struct Saved { path: String }
//! impl Event for Saved {}
//!
//! let mut hub = EventHub::new();
//!
//! hub.channel::<Saved>("on_save")?
//!     .add_listener(Listener::new("log_save", |e: &Saved| {
//!         println!("saved {}", e.path);
//!     }));
//!
//! hub.channel::<Saved>("on_save")?.invoke(&Saved { path: "a.txt".into() })?;
//! ```
//!
//! # Thread Safety
//!
//! The hub and its channels are deliberately single-threaded (`Rc`/`RefCell`
//! internally) and run every operation to completion on the caller's thread.
//! Sharing across threads requires external serialization by the caller and
//! is structurally prevented by the types not being `Send`.

pub mod channel;
pub mod error;
pub mod hub;

pub use channel::{ErasedChannel, EventChannel, Listener};
pub use error::{EventError, ListenerError};
pub use hub::EventHub;

/// Marker trait for event payload types.
///
/// Payloads must be:
/// - `'static`: No borrowed data
///
/// Unlike a buffered event queue, payloads are never stored: they are only
/// borrowed for the duration of a single fan-out, so no `Clone` bound is
/// required.
pub trait Event: 'static {}
