//! # Event Bus Module
//!
//! Publish/subscribe distribution of application events:
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter by category and receive events synchronously,
//!   or poll a broadcast receiver from a tokio task
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dronepath_core::event_bus::{event_bus, AppEvent, EventCategory, EventFilter, PlaybackEvent};
//!
//! let subscription = event_bus().subscribe(
//!     EventFilter::Categories(vec![EventCategory::Playback]),
//!     |event| tracing::info!("{}", event.description()),
//! );
//!
//! event_bus().publish(AppEvent::Playback(PlaybackEvent::Completed));
//! event_bus().unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
