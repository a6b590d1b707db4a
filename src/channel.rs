//! Multicast listener storage for a single named event.
//!
//! This module provides [`EventChannel`], the core storage type of the event
//! system: an ordered, mutable list of [`Listener`] callbacks bound to one
//! channel name. Raising the channel invokes every registered listener in
//! registration order with a borrow of the same payload.
//!
//! # Snapshot Fan-Out
//!
//! [`invoke()`](EventChannel::invoke) copies the listener list before calling
//! anything. The copy insulates the in-progress pass from reentrant mutation:
//! a listener that subscribes or unsubscribes itself (or a sibling)
//! mid-broadcast changes only what *future* invocations see, never the pass
//! that is currently running. Without the snapshot, such mutation would skip
//! or double-invoke listeners depending on where it landed in the list.
//!
//! # Listener Identity
//!
//! A [`Listener`] is a handle around a reference-counted callback. Cloning
//! the handle preserves identity, so registering the same handle twice yields
//! two independent registrations of one callback, and
//! [`remove_listener()`](EventChannel::remove_listener) strips *every*
//! occurrence of that callback. Two separately constructed listeners are
//! always distinct, even when built from identical closures.
//!
//! # Example
//!
//! ```rust,ignore
//! let channel = EventChannel::<Changed>::new("on_change");
//! let print = Listener::new("print", |e: &Changed| println!("{}", e.value));
//!
//! channel
//!     .add_listener(print.clone())
//!     .add_listener(print.clone());
//!
//! channel.invoke(&Changed { value: 7 })?; // prints twice
//! channel.remove_listener(&print);        // removes both occurrences
//! ```

use std::{any::Any, cell::RefCell, fmt, rc::Rc};

use log::trace;

use crate::{
    Event,
    error::{EventError, ListenerError},
};

/// A labeled callback registered against an [`EventChannel`].
///
/// The label is diagnostic only: it appears in
/// [`describe()`](EventChannel::describe) output and in
/// [`EventError::ListenerFailed`], but plays no part in identity. Identity is
/// the underlying callback allocation, shared by all clones of a handle and
/// tested with [`same()`](Self::same).
pub struct Listener<E: Event> {
    label: String,
    callback: Rc<dyn Fn(&E) -> Result<(), ListenerError>>,
}

impl<E: Event> Listener<E> {
    /// Wraps an infallible callback.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let print = Listener::new("print", |e: &Changed| println!("{}", e.value));
    /// ```
    pub fn new(label: impl Into<String>, callback: impl Fn(&E) + 'static) -> Self {
        Self::fallible(label, move |event| {
            callback(event);
            Ok(())
        })
    }

    /// Wraps a callback that may fail.
    ///
    /// A returned error aborts the remainder of the fan-out pass and is
    /// surfaced to the `invoke` caller as [`EventError::ListenerFailed`].
    pub fn fallible(
        label: impl Into<String>,
        callback: impl Fn(&E) -> Result<(), ListenerError> + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            callback: Rc::new(callback),
        }
    }

    /// The diagnostic label given at construction.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `true` if both handles refer to the same callback allocation.
    #[inline]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }

    fn call(&self, event: &E) -> Result<(), ListenerError> {
        (self.callback)(event)
    }
}

// Manual impl: `E` itself need not be `Clone`.
impl<E: Event> Clone for Listener<E> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<E: Event> fmt::Debug for Listener<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Listener")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// An ordered multicast listener list bound to one channel name.
///
/// `EventChannel<E>` holds the listeners registered against the event payload
/// type `E`. All mutators take `&self` (the list lives in a `RefCell`) so a
/// listener holding an `Rc<EventChannel<E>>` can subscribe or unsubscribe
/// during a fan-out; registration methods return `&Self` to support chained
/// registration.
///
/// # Ordering
///
/// Invocation order equals registration order at the moment a fan-out begins.
/// Duplicates are permitted: each occurrence of a callback is a distinct
/// registration that is individually invoked.
///
/// # Thread Safety
///
/// `EventChannel` is not thread-safe and not `Send`. A channel shared across
/// threads requires external serialization by the caller.
#[derive(Debug)]
pub struct EventChannel<E: Event> {
    name: String,
    listeners: RefCell<Vec<Listener<E>>>,
}

impl<E: Event> EventChannel<E> {
    /// Creates an empty channel bound to `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// The channel name, immutable after creation.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends `listener` to the listener list.
    ///
    /// Always succeeds; no deduplication is performed. Returns the channel
    /// for chained registration:
    ///
    /// ```rust,ignore
    /// channel.add_listener(save).add_listener(log);
    /// ```
    pub fn add_listener(&self, listener: Listener<E>) -> &Self {
        self.listeners.borrow_mut().push(listener);
        self
    }

    /// Removes every occurrence of `listener` from the listener list.
    ///
    /// Matching is by callback identity (see [`Listener::same`]). Removing a
    /// listener that was never added is a no-op, not an error.
    pub fn remove_listener(&self, listener: &Listener<E>) -> &Self {
        self.listeners.borrow_mut().retain(|l| !l.same(listener));
        self
    }

    /// Invokes every registered listener, in registration order, with a
    /// borrow of `event`.
    ///
    /// A snapshot of the listener list is taken before the first call, so
    /// listeners added or removed during the pass only affect future
    /// invocations. Listener return values are discarded on success; the
    /// first listener error aborts the remaining pass and is surfaced as
    /// [`EventError::ListenerFailed`].
    pub fn invoke(&self, event: &E) -> Result<(), EventError> {
        let snapshot = self.listeners.borrow().clone();
        trace!(
            "fan-out of '{}' to {} listener(s)",
            self.name,
            snapshot.len()
        );
        for listener in &snapshot {
            listener
                .call(event)
                .map_err(|source| EventError::ListenerFailed {
                    channel: self.name.clone(),
                    label: listener.label().to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Number of registered listeners, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Returns `true` if no listeners are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Returns the listener at `index` in registration order.
    ///
    /// Fails with [`EventError::IndexOutOfRange`] outside `[0, len)`.
    pub fn listener_at(&self, index: usize) -> Result<Listener<E>, EventError> {
        let listeners = self.listeners.borrow();
        listeners
            .get(index)
            .cloned()
            .ok_or_else(|| EventError::IndexOutOfRange {
                channel: self.name.clone(),
                index,
                len: listeners.len(),
            })
    }

    /// Returns an iterator over the currently registered listeners, in
    /// registration order.
    ///
    /// Each call traverses a fresh snapshot of the current state; mutating
    /// the channel while iterating does not affect a traversal already in
    /// flight.
    pub fn iter(&self) -> impl Iterator<Item = Listener<E>> {
        self.listeners.borrow().clone().into_iter()
    }

    /// Empties the listener list. The channel itself stays valid and can
    /// accept new registrations.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Diagnostic description: `event '<name>': [<label>, ...]`.
    ///
    /// Stable in form but not a hashable or comparable identity.
    pub fn describe(&self) -> String {
        let listeners = self.listeners.borrow();
        let labels: Vec<&str> = listeners.iter().map(Listener::label).collect();
        format!("event '{}': [{}]", self.name, labels.join(", "))
    }
}

impl<E: Event> fmt::Display for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Type-erased interface over event channels.
///
/// This trait enables [`EventHub`](crate::EventHub) to store channels with
/// heterogeneous payload types in a single ordered collection while still
/// supporting the operations that don't need the concrete payload type:
/// introspection and reset. Typed access goes through
/// [`as_any()`](Self::as_any), which the hub downcasts back to the concrete
/// `EventChannel<E>`.
pub trait ErasedChannel {
    /// The channel name.
    fn name(&self) -> &str;

    /// Number of registered listeners, duplicates included.
    fn listener_count(&self) -> usize;

    /// Empties the listener list; the channel stays usable.
    fn clear(&self);

    /// Diagnostic description of the channel and its listener labels.
    fn describe(&self) -> String;

    /// Upcast used to downcast back to the concrete `EventChannel<E>`.
    fn as_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<E: Event> ErasedChannel for EventChannel<E> {
    fn name(&self) -> &str {
        EventChannel::name(self)
    }

    fn listener_count(&self) -> usize {
        self.len()
    }

    fn clear(&self) {
        EventChannel::clear(self);
    }

    fn describe(&self) -> String {
        EventChannel::describe(self)
    }

    fn as_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}
