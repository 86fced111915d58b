//! Event Bus implementation.
//!
//! Provides the core EventBus struct and global instance for
//! application-wide event distribution.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::OnceLock;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{AppEvent, EventCategory};

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Box<dyn Fn(&AppEvent) + Send + Sync>;

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Channel capacity for broadcast.
    pub channel_capacity: usize,
    /// Number of most recent events kept for inspection; 0 disables history.
    pub history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            history_size: 0,
        }
    }
}

/// Central event bus for application-wide event distribution
///
/// Handlers registered with [`EventBus::subscribe`] run synchronously on the
/// publishing task; async consumers use [`EventBus::receiver`].
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
    handlers: RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>,
    history: RwLock<VecDeque<AppEvent>>,
    config: EventBusConfig,
}

impl EventBus {
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            handlers: RwLock::new(HashMap::new()),
            history: RwLock::new(VecDeque::with_capacity(config.history_size)),
            config,
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of handlers and receivers that saw the event.
    /// Publishing with nobody listening is not an error.
    pub fn publish(&self, event: AppEvent) -> usize {
        tracing::trace!(category = %event.category(), "{}", event.description());

        if self.config.history_size > 0 {
            let mut history = self.history.write();
            history.push_back(event.clone());
            while history.len() > self.config.history_size {
                history.pop_front();
            }
        }

        let mut delivered = 0;
        {
            let handlers = self.handlers.read();
            for (filter, handler) in handlers.values() {
                if filter.matches(&event) {
                    handler(&event);
                    delivered += 1;
                }
            }
        }

        delivered + self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events with a synchronous handler
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, (filter, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Get a receiver for async event polling
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Get the number of synchronous subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Recent events, oldest first (empty when history is disabled)
    pub fn history(&self) -> Vec<AppEvent> {
        self.history.read().iter().cloned().collect()
    }

    /// Clear event history
    pub fn clear_history(&self) {
        self.history.write().clear();
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}

static EVENT_BUS: OnceLock<EventBus> = OnceLock::new();

/// Get or initialize the global event bus
pub fn event_bus() -> &'static EventBus {
    EVENT_BUS.get_or_init(EventBus::new)
}

/// Initialize the global event bus with custom configuration
///
/// Must be called before any calls to `event_bus()`. Returns the rejected
/// configuration if the bus has already been initialized.
pub fn init_event_bus(config: EventBusConfig) -> Result<(), EventBusConfig> {
    EVENT_BUS
        .set(EventBus::with_config(config))
        .map_err(|bus| bus.config.clone())
}

/// Convenience macro to publish an event to the global event bus
#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::event_bus::event_bus().publish($event)
    };
}
