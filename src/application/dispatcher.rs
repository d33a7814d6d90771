//! Synchronous in-process event dispatcher.
//!
//! The dispatcher is the composition point between webhook ingestion and
//! the sagas: `register` maps event names to handlers at startup, `emit`
//! fans an event out to every matching handler within the current request
//! lifecycle. There is no queue and no retry here; replay safety lives in
//! the handlers' own idempotency guards.

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, warn};

use crate::domain::billing::{DomainEvent, EventResult};
use crate::ports::EventHandler;

/// Maps event names to handler lists and fans events out synchronously.
///
/// Constructed once at process start; handlers are registered during
/// startup and the dispatcher is read-only afterwards, so `emit` takes
/// `&self` and the dispatcher can be shared behind an `Arc`.
///
/// # Failure semantics
///
/// - Handlers run in registration order.
/// - A failing handler does not stop later handlers: independent side
///   effects must not be skipped.
/// - The aggregate result is successful only if every invoked handler
///   succeeded; on failure it carries the first error.
/// - A panicking handler is caught and converted to a failure result; a
///   saga failure never crashes the serving thread.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<String, Vec<Arc<dyn EventHandler>>>,
}

impl EventDispatcher {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a handler under an event name.
    ///
    /// The same handler may be registered under several names; `can_handle`
    /// is still consulted before each invocation.
    pub fn register(&mut self, event_name: &str, handler: Arc<dyn EventHandler>) {
        self.handlers
            .entry(event_name.to_string())
            .or_default()
            .push(handler);
    }

    /// Number of handlers registered under an event name.
    pub fn handler_count(&self, event_name: &str) -> usize {
        self.handlers.get(event_name).map_or(0, Vec::len)
    }

    /// Emits an event to every matching handler and aggregates the outcome.
    ///
    /// An event with no matching handlers is acknowledged with an empty
    /// success result.
    pub async fn emit(&self, event: &DomainEvent) -> EventResult {
        let registered = match self.handlers.get(event.name()) {
            Some(handlers) => handlers.as_slice(),
            None => {
                debug!(event = event.name(), "no handlers registered");
                return EventResult::ok_empty();
            }
        };

        let mut data = serde_json::Map::new();
        let mut first_error: Option<String> = None;

        for handler in registered {
            if !handler.can_handle(event) {
                continue;
            }

            let outcome = std::panic::AssertUnwindSafe(handler.handle(event))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(value)) => {
                    data.insert(handler.name().to_string(), value);
                }
                Ok(Err(err)) => {
                    warn!(
                        event = event.name(),
                        handler = handler.name(),
                        error = %err,
                        "handler failed"
                    );
                    first_error.get_or_insert_with(|| err.to_string());
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!(
                        event = event.name(),
                        handler = handler.name(),
                        panic = %message,
                        "handler panicked"
                    );
                    first_error.get_or_insert_with(|| {
                        format!("handler '{}' panicked: {}", handler.name(), message)
                    });
                }
            }
        }

        match first_error {
            Some(message) => EventResult {
                success: false,
                data,
                error: Some(message),
            },
            None => EventResult {
                success: true,
                data,
                error: None,
            },
        }
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
