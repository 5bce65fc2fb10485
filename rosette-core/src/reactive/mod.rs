//! Reactive Primitives
//!
//! Observable containers used to push UI metadata (enabled, interactable,
//! fold-open, style) from elements to the view layer.
//!
//! Values bound through binders are not pushed: they are pulled once per
//! update sweep (see `crate::update`). The primitives here cover the state
//! that changes rarely and must not be polled every frame.
//!
//! # Concepts
//!
//! ## Notifier
//!
//! An ordered callback list. Subscribing returns a `Subscription` whose drop
//! removes the callback.
//!
//! ## ReactiveProperty
//!
//! A single value plus a notifier. Setting an equal value is silent;
//! subscribing can optionally replay the current value.

mod notifier;
mod property;
mod subscriber;

pub use notifier::Notifier;
pub use property::ReactiveProperty;
pub use subscriber::{SubscriberId, Subscription};
