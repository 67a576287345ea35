//! Delivery context: the one thread on which lifecycle mutation and event delivery happen.
//!
//! ## Contents
//! - [`Dispatch`] seam and its production implementation [`Dispatcher`]
//! - [`DeliveryLoop`] / [`DeliveryThread`] the receiving side
//! - [`install`] / [`installed`] init-once process-wide slot

mod dispatcher;
mod global;

pub use dispatcher::{DeliveryLoop, DeliveryThread, Dispatch, Dispatcher, Job};
pub use global::{install, installed};
