//! # Bus: post notifications to views from any thread.
//!
//! [`Bus`] pairs an [`EventChannel`] with a [`Dispatch`] implementation so that
//! handlers always run on the delivery thread.
//!
//! ## Architecture
//! ```text
//! Producers:                               Delivery thread:
//!   delivery thread ── post(e) ──────────────► EventChannel::publish (inline)
//!   other thread    ── post(e) ─► Dispatcher ─► EventChannel::publish (queued)
//! ```
//!
//! ## Rules
//! - **Fire-and-forget**: `post()` never fails and never blocks.
//! - **Weak channel**: the bus does not keep the channel alive; posting after the
//!   channel is gone logs a [`DispatchError::TargetUnavailable`] and drops the event.
//! - **Per-thread FIFO**: no global order across producer threads.
//! - **Cloneable**: hand a clone to every controller that notifies views.

use std::any::Any;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::dispatch::Dispatch;
use crate::error::DispatchError;

use super::channel::{EventChannel, WeakChannel};
use super::event::Event;

/// Thread-aware poster for view notifications.
#[derive(Clone)]
pub struct Bus {
    channel: WeakChannel,
    dispatcher: Arc<dyn Dispatch>,
}

impl Bus {
    /// Creates a bus posting into `channel` through `dispatcher`.
    pub fn new(channel: &EventChannel, dispatcher: Arc<dyn Dispatch>) -> Self {
        Self {
            channel: channel.downgrade(),
            dispatcher,
        }
    }

    /// Posts `payload` to every view currently bound.
    pub fn post<E: Any + Send + Sync>(&self, payload: E) {
        self.post_event(Event::new(payload));
    }

    /// Posts an already wrapped event.
    pub fn post_event(&self, event: Event) {
        let channel = self.channel.clone();
        self.dispatcher.run(Box::new(move || deliver(&channel, &event)));
    }

    /// The dispatcher this bus hands work to.
    pub fn dispatcher(&self) -> &Arc<dyn Dispatch> {
        &self.dispatcher
    }
}

fn deliver(channel: &WeakChannel, event: &Event) {
    match channel.upgrade() {
        Some(channel) => {
            let handled = channel.publish(event);
            trace!(seq = event.seq, kind = event.kind_name(), handled, "event delivered");
        }
        None => {
            let err = DispatchError::TargetUnavailable {
                reason: "event channel dropped",
            };
            warn!(
                seq = event.seq,
                kind = event.kind_name(),
                label = err.as_label(),
                "{err}; dropping event"
            );
        }
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("channel_alive", &self.channel.upgrade().is_some())
            .finish()
    }
}
