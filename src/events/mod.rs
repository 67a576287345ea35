//! View notifications: envelope, handler table, channel, binder and bus.
//!
//! This module groups everything that moves a notification from whoever posts it
//! to the views currently on screen.
//!
//! ## Contents
//! - [`Event`] type-erased payload with a global sequence number
//! - [`EventHandlers`] per-kind handler table declared by each view
//! - [`EventChannel`] synchronous fan-out to subscriptions
//! - [`Binder`] one view's subscription, bound/unbound with its surface
//! - [`Bus`] thread-aware poster (channel + dispatcher)
//!
//! ## Quick reference
//! - **Publishers**: controllers and views via [`Bus::post`].
//! - **Consumers**: orchestrators' binders, between `ViewBound` and `ViewUnbound`.

mod binder;
mod bus;
mod channel;
mod event;
mod handlers;

pub use binder::Binder;
pub use bus::Bus;
pub use channel::{EventChannel, SubscriptionId, WeakChannel};
pub use event::Event;
pub use handlers::EventHandlers;
