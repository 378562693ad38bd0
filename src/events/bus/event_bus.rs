// src/events/bus/event_bus.rs
//
// Core event bus implementation.
//
// DESIGN PRINCIPLES:
// 1. Synchronous - handlers execute immediately in subscription order
// 2. Deterministic - same events → same result
// 3. Observable - every emission is logged
// 4. Type-safe - events are strongly typed
// 5. No magic - explicit, straightforward code
//
// This is what makes queries "live": store mutations are emitted here and
// handlers recompute their result snapshots before the mutating call
// returns, so no subscriber ever holds a page that predates a mutation.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::{error, trace};

use crate::events::types::DomainEvent;

/// Type-erased event handler function
/// Takes a reference to Any (downcasted to concrete event type inside)
type EventHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// Tells the bus whether a scoped handler still has an audience
type LivenessCheck = Box<dyn Fn() -> bool + Send + Sync>;

/// A registered handler, optionally scoped to an external lifetime
struct Subscription {
    handler: EventHandler,
    /// None for permanent handlers; Some for scoped ones, which are skipped
    /// and then swept once the check returns false
    alive: Option<LivenessCheck>,
}

impl Subscription {
    fn is_live(&self) -> bool {
        self.alive.as_ref().map_or(true, |check| check())
    }
}

/// The Event Bus
///
/// Central coordination point for all domain events. Services emit events
/// and subscribe to events without direct dependencies on each other.
///
/// Key characteristics:
/// - Synchronous execution (no async, no threads)
/// - Handlers execute in subscription order
/// - Type-safe through generics
pub struct EventBus {
    /// Map from event TypeId to list of handlers
    handlers: Arc<RwLock<HashMap<TypeId, Vec<Subscription>>>>,

    /// Event emission log (for debugging)
    event_log: Arc<RwLock<Vec<EventLogEntry>>>,
}

/// A logged event for debugging and tracing
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            event_log: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Subscribe to a specific event type
    ///
    /// Handlers are executed in the order they are subscribed.
    ///
    /// Example:
    /// ```ignore
    /// bus.subscribe::<FavoriteChanged, _>(|event| {
    ///     println!("favorite changed: {}", event.card_id);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.push_subscription::<E, F>(handler, None);
    }

    /// Subscribe with a liveness check
    ///
    /// The handler behaves like [`subscribe`](Self::subscribe) while `alive`
    /// returns true. Once it returns false the handler is skipped and removed
    /// in the next emission of its event type, so watchers tied to external
    /// lifetimes (dropped channel receivers) do not accumulate on the bus.
    pub fn subscribe_scoped<E, F, A>(&self, handler: F, alive: A)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
        A: Fn() -> bool + Send + Sync + 'static,
    {
        self.push_subscription::<E, F>(handler, Some(Box::new(alive)));
    }

    fn push_subscription<E, F>(&self, handler: F, alive: Option<LivenessCheck>)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<E>();

        // Wrap the typed handler in a type-erased closure
        let wrapped: EventHandler = Box::new(move |event_any: &dyn Any| {
            if let Some(event) = event_any.downcast_ref::<E>() {
                handler(event);
            } else {
                error!(
                    "Failed to downcast event in handler for {}",
                    std::any::type_name::<E>()
                );
            }
        });

        let mut handlers = self.handlers.write().unwrap();
        handlers.entry(type_id).or_insert_with(Vec::new).push(Subscription {
            handler: wrapped,
            alive,
        });
    }

    /// Emit an event
    ///
    /// This will:
    /// 1. Log the event
    /// 2. Execute all handlers for this event type (in subscription order)
    /// 3. Return immediately (synchronous)
    ///
    /// If a handler panics, the panic is caught and logged, but other
    /// handlers still execute.
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let type_id = TypeId::of::<E>();
        let mut saw_dead = false;

        {
            let handlers = self.handlers.read().unwrap();
            let subscriptions = handlers.get(&type_id);
            let handler_count = subscriptions.map(|h| h.len()).unwrap_or(0);

            let log_entry = EventLogEntry {
                event_type: event.event_type().to_string(),
                event_id: event.event_id().to_string(),
                occurred_at: event.occurred_at().to_rfc3339(),
                handler_count,
            };

            {
                let mut log = self.event_log.write().unwrap();
                log.push(log_entry.clone());
            }

            trace!(
                "[EVENT] {} (id: {}) | {} handlers",
                log_entry.event_type,
                log_entry.event_id,
                log_entry.handler_count
            );

            if let Some(subscriptions) = subscriptions {
                for (idx, subscription) in subscriptions.iter().enumerate() {
                    if !subscription.is_live() {
                        saw_dead = true;
                        continue;
                    }

                    // Catch panics to prevent one handler from breaking others
                    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        (subscription.handler)(&event as &dyn Any);
                    }));

                    if result.is_err() {
                        error!("Handler {} for {} panicked", idx, event.event_type());
                    }
                }
            }
        }

        if saw_dead {
            let mut handlers = self.handlers.write().unwrap();
            if let Some(subscriptions) = handlers.get_mut(&type_id) {
                subscriptions.retain(Subscription::is_live);
            }
        }
    }

    /// Get the event log (for debugging)
    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        self.event_log.read().unwrap().clone()
    }

    /// Clear the event log
    pub fn clear_event_log(&self) {
        self.event_log.write().unwrap().clear();
    }

    /// Get the number of subscribers for a specific event type
    pub fn subscriber_count<E>(&self) -> usize
    where
        E: 'static,
    {
        let type_id = TypeId::of::<E>();
        let handlers = self.handlers.read().unwrap();
        handlers.get(&type_id).map(|h| h.len()).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// Make EventBus cloneable (shared reference)
impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            event_log: Arc::clone(&self.event_log),
        }
    }
}
