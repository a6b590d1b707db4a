//! Central container that lazily materializes named event channels.
//!
//! This module provides [`EventHub`], the owner of all [`EventChannel`]s in
//! an application subsystem. It handles lazy channel creation, name
//! validation, typed access, and coordinated reset across all channels.
//!
//! # Overview
//!
//! The `EventHub` serves as the single access point for channels:
//! - **Access creates**: referencing a channel name for the first time
//!   materializes an empty channel under that name
//! - **Optional declaration**: a hub built with
//!   [`with_declared()`](EventHub::with_declared) rejects names outside the
//!   declared set, turning misspelled event names into errors
//! - **Coordinated reset**: all channels can be discarded together via
//!   [`reset_all()`](EventHub::reset_all)
//!
//! # Type Erasure
//!
//! Internally the hub stores channels as `Rc<dyn ErasedChannel>` keyed by
//! name, in materialization order. This allows channels with heterogeneous
//! payload types to live in one collection while the generic
//! [`channel()`](EventHub::channel) accessor downcasts to the concrete
//! `EventChannel<E>` on the way out.
//!
//! # Example
//!
//! ```rust,ignore
//! use event_hub::{Event, EventHub, Listener};
//!
//! #[derive(Debug)]
//! struct Clicked;
//! impl Event for Clicked {}
//!
//! let mut hub = EventHub::new();
//!
//! // First reference materializes the channel.
//! hub.channel::<Clicked>("on_click")?
//!     .add_listener(Listener::new("announce", |_| println!("clicked")));
//!
//! // Later references return the same channel.
//! hub.channel::<Clicked>("on_click")?.invoke(&Clicked)?;
//! ```

use std::{collections::HashSet, fmt, rc::Rc};

use log::debug;

use crate::{
    Event,
    channel::{ErasedChannel, EventChannel},
    error::EventError,
};

/// Prefix reserved for hub bookkeeping; names carrying it can never be
/// materialized as channels.
const RESERVED_PREFIX: &str = "__";

/// Lazily-populated container of named event channels.
///
/// A hub starts empty and materializes an [`EventChannel`] the first time a
/// name is referenced through [`channel()`](Self::channel). Channels are
/// handed out as `Rc<EventChannel<E>>`; "the same channel" means the same
/// allocation, so listeners registered through one handle are visible
/// through every other handle to that name.
///
/// # Declared Names
///
/// A hub built with [`with_declared()`](Self::with_declared) restricts which
/// names may be materialized. The declared set is fixed at construction and
/// survives [`reset_all()`](Self::reset_all).
///
/// # Thread Safety
///
/// `EventHub` is not thread-safe and not `Send`; see the crate-level notes.
pub struct EventHub {
    /// Materialized channels. The vector order is the materialization order,
    /// the only iteration order the hub guarantees.
    channels: Vec<Rc<dyn ErasedChannel>>,

    /// When present, the only names `channel()` may materialize.
    declared: Option<HashSet<String>>,
}

impl EventHub {
    /// Creates an unrestricted hub: any non-reserved name may be
    /// materialized on first reference.
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            declared: None,
        }
    }

    /// Creates a hub restricted to the given channel names.
    ///
    /// Referencing any name outside the set fails with
    /// [`EventError::UndeclaredChannel`] instead of materializing a channel.
    /// The set is fixed for the lifetime of the hub.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut hub = EventHub::with_declared(["on_click", "on_change"]);
    ///
    /// hub.channel::<Clicked>("on_click")?;          // ok
    /// hub.channel::<Clicked>("on_clik")?;           // UndeclaredChannel
    /// ```
    pub fn with_declared<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channels: Vec::new(),
            declared: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Returns the channel bound to `name`, materializing an empty one on
    /// first reference.
    ///
    /// This is the only access path, for both existing and new channels.
    ///
    /// # Errors
    ///
    /// - [`EventError::ReservedName`] if `name` starts with `__`, regardless
    ///   of restriction mode
    /// - [`EventError::UndeclaredChannel`] if a declared-name restriction is
    ///   active and `name` is not part of it
    /// - [`EventError::TypeMismatch`] if `name` is already materialized with
    ///   a different payload type
    pub fn channel<E: Event>(&mut self, name: &str) -> Result<Rc<EventChannel<E>>, EventError> {
        if name.starts_with(RESERVED_PREFIX) {
            return Err(EventError::ReservedName(name.to_string()));
        }
        if let Some(declared) = &self.declared {
            if !declared.contains(name) {
                return Err(EventError::UndeclaredChannel(name.to_string()));
            }
        }
        if let Some(existing) = self.channels.iter().find(|c| c.name() == name) {
            return Rc::clone(existing)
                .as_any()
                .downcast::<EventChannel<E>>()
                .map_err(|_| EventError::TypeMismatch {
                    channel: name.to_string(),
                });
        }

        debug!("materialized event channel '{name}'");
        let channel = Rc::new(EventChannel::<E>::new(name));
        self.channels.push(Rc::clone(&channel) as Rc<dyn ErasedChannel>);
        Ok(channel)
    }

    /// Number of materialized channels (not the declared set size).
    #[inline]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if no channels have been materialized.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Returns `true` if a channel has been materialized under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c.name() == name)
    }

    /// Returns an iterator over the materialized channels, in
    /// materialization order.
    ///
    /// Channels are yielded through the type-erased [`ErasedChannel`]
    /// interface; use [`channel()`](Self::channel) for typed access.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ErasedChannel> {
        self.channels.iter().map(|c| c.as_ref())
    }

    /// The declared-name restriction, if one was configured.
    pub fn declared(&self) -> Option<&HashSet<String>> {
        self.declared.as_ref()
    }

    /// Discards every materialized channel.
    ///
    /// The declared set, if any, is preserved and the hub remains usable:
    /// subsequent [`channel()`](Self::channel) calls materialize fresh
    /// channels. Handles to discarded channels stay valid for their holders
    /// but are no longer reachable through the hub.
    pub fn reset_all(&mut self) {
        self.channels.clear();
    }

    /// Clears the listener list of the channel bound to `name`.
    ///
    /// The channel stays materialized (and counted); only its registrations
    /// are dropped. Fails with [`EventError::UnknownChannel`] if `name` has
    /// never been materialized.
    pub fn reset_channel(&self, name: &str) -> Result<(), EventError> {
        let channel = self
            .channels
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| EventError::UnknownChannel(name.to_string()))?;
        channel.clear();
        Ok(())
    }

    /// Diagnostic summary: `event hub: [<name>, ...]` over materialized
    /// channels, in materialization order.
    pub fn describe(&self) -> String {
        let names: Vec<&str> = self.channels.iter().map(|c| c.name()).collect();
        format!("event hub: [{}]", names.join(", "))
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::Listener;

    #[derive(Debug)]
    struct Clicked;
    impl Event for Clicked {}

    #[derive(Debug, PartialEq)]
    struct Changed {
        value: i32,
    }
    impl Event for Changed {}

    // ==================== Lazy Creation ====================

    #[test]
    fn new_creates_empty_hub() {
        let hub = EventHub::new();

        assert!(hub.is_empty());
        assert_eq!(hub.len(), 0);
        assert!(hub.declared().is_none());
    }

    #[test]
    fn first_reference_materializes_empty_channel() {
        let mut hub = EventHub::new();

        let channel = hub.channel::<Clicked>("on_click").unwrap();

        assert_eq!(channel.len(), 0);
        assert_eq!(hub.len(), 1);
        assert!(hub.contains("on_click"));
    }

    #[test]
    fn second_reference_returns_identical_channel() {
        let mut hub = EventHub::new();

        let first = hub.channel::<Clicked>("on_click").unwrap();
        let second = hub.channel::<Clicked>("on_click").unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn registrations_are_shared_across_handles() {
        let mut hub = EventHub::new();

        hub.channel::<Clicked>("on_click")
            .unwrap()
            .add_listener(Listener::new("a", |_| {}));

        assert_eq!(hub.channel::<Clicked>("on_click").unwrap().len(), 1);
    }

    #[test]
    fn existing_name_with_other_payload_type_fails() {
        let mut hub = EventHub::new();
        hub.channel::<Clicked>("on_click").unwrap();

        let err = hub.channel::<Changed>("on_click").unwrap_err();

        assert!(matches!(err, EventError::TypeMismatch { channel } if channel == "on_click"));
    }

    // ==================== Name Validation ====================

    #[test]
    fn reserved_name_fails_on_unrestricted_hub() {
        let mut hub = EventHub::new();

        let err = hub.channel::<Clicked>("__channels").unwrap_err();

        assert!(matches!(err, EventError::ReservedName(name) if name == "__channels"));
        assert!(hub.is_empty());
    }

    #[test]
    fn reserved_name_fails_on_restricted_hub() {
        // Reserved beats declared, even if someone declares such a name.
        let mut hub = EventHub::with_declared(["__channels"]);

        let err = hub.channel::<Clicked>("__channels").unwrap_err();

        assert!(matches!(err, EventError::ReservedName(_)));
    }

    #[test]
    fn declared_name_succeeds_on_restricted_hub() {
        let mut hub = EventHub::with_declared(["on_click"]);

        assert!(hub.channel::<Clicked>("on_click").is_ok());
    }

    #[test]
    fn undeclared_name_fails_on_restricted_hub() {
        let mut hub = EventHub::with_declared(["on_click"]);

        let err = hub.channel::<Clicked>("on_other").unwrap_err();

        assert!(matches!(err, EventError::UndeclaredChannel(name) if name == "on_other"));
        assert!(hub.is_empty());
    }

    // ==================== Introspection ====================

    #[test]
    fn len_counts_materialized_not_declared() {
        let mut hub = EventHub::with_declared(["on_click", "on_change"]);

        assert_eq!(hub.len(), 0);
        hub.channel::<Clicked>("on_click").unwrap();
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn iter_yields_channels_in_materialization_order() {
        let mut hub = EventHub::new();
        hub.channel::<Clicked>("on_click").unwrap();
        hub.channel::<Changed>("on_change").unwrap();
        hub.channel::<Clicked>("on_close").unwrap();

        let names: Vec<_> = hub.iter().map(|c| c.name().to_string()).collect();

        assert_eq!(names, vec!["on_click", "on_change", "on_close"]);
    }

    #[test]
    fn iter_exposes_listener_counts() {
        let mut hub = EventHub::new();
        hub.channel::<Clicked>("on_click")
            .unwrap()
            .add_listener(Listener::new("a", |_| {}));

        let counts: Vec<_> = hub.iter().map(|c| c.listener_count()).collect();

        assert_eq!(counts, vec![1]);
    }

    #[test]
    fn describe_lists_channel_names() {
        let mut hub = EventHub::new();
        hub.channel::<Clicked>("on_click").unwrap();
        hub.channel::<Changed>("on_change").unwrap();

        assert_eq!(hub.describe(), "event hub: [on_click, on_change]");
        assert_eq!(hub.to_string(), hub.describe());
    }

    // ==================== Reset ====================

    #[test]
    fn reset_all_discards_channels_but_hub_stays_usable() {
        let mut hub = EventHub::new();
        hub.channel::<Clicked>("on_click").unwrap();

        hub.reset_all();

        assert_eq!(hub.len(), 0);
        assert!(hub.channel::<Clicked>("x").is_ok());
    }

    #[test]
    fn reset_all_preserves_declared_restriction() {
        let mut hub = EventHub::with_declared(["on_click"]);
        hub.channel::<Clicked>("on_click").unwrap();

        hub.reset_all();

        assert!(hub.channel::<Clicked>("on_click").is_ok());
        assert!(matches!(
            hub.channel::<Clicked>("on_other"),
            Err(EventError::UndeclaredChannel(_))
        ));
    }

    #[test]
    fn reset_channel_clears_listeners_only() {
        let mut hub = EventHub::new();
        hub.channel::<Clicked>("on_click")
            .unwrap()
            .add_listener(Listener::new("a", |_| {}));

        hub.reset_channel("on_click").unwrap();

        assert!(hub.contains("on_click"));
        assert_eq!(hub.len(), 1);
        assert_eq!(hub.channel::<Clicked>("on_click").unwrap().len(), 0);
    }

    #[test]
    fn reset_channel_on_unmaterialized_name_fails() {
        let hub = EventHub::new();

        let err = hub.reset_channel("on_click").unwrap_err();

        assert!(matches!(err, EventError::UnknownChannel(name) if name == "on_click"));
    }

    // ==================== End To End ====================

    #[test]
    fn unrestricted_hub_round_trip() {
        let mut hub = EventHub::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        hub.channel::<Clicked>("on_click")
            .unwrap()
            .add_listener(Listener::new("click", |_| {}));

        let record = Listener::new("record", {
            let seen = Rc::clone(&seen);
            move |e: &Changed| seen.borrow_mut().push(e.value)
        });
        hub.channel::<Changed>("on_change")
            .unwrap()
            .add_listener(record.clone())
            .add_listener(record.clone());

        hub.channel::<Changed>("on_change")
            .unwrap()
            .invoke(&Changed { value: 7 })
            .unwrap();
        assert_eq!(*seen.borrow(), vec![7, 7]);

        hub.reset_channel("on_change").unwrap();
        assert_eq!(hub.channel::<Changed>("on_change").unwrap().len(), 0);
        assert_eq!(hub.channel::<Clicked>("on_click").unwrap().len(), 1);
    }

    #[test]
    fn default_is_unrestricted() {
        let mut hub = EventHub::default();

        assert!(hub.channel::<Clicked>("anything").is_ok());
    }
}
