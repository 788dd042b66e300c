//! Highlight events and the observer seam between the engine and its host.
//!
//! The engine never paints anything itself. Every visible consequence of a
//! check (a range gaining or losing misspelled markup, checking being switched
//! on or off, the active language changing) is published as a
//! `HighlightEvent` to the registered observers, in document order for a given
//! operation.

use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

// -------------------------------------------------------------------------------------------------
// Telemetry
// -------------------------------------------------------------------------------------------------
// Relaxed atomic counters, inspected by tests and logged by the binary on shutdown.
// -------------------------------------------------------------------------------------------------
pub static EVENTS_DISPATCHED: AtomicU64 = AtomicU64::new(0);
pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);

/// Why checking was switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveReason {
    /// Caller toggled checking in manual mode.
    Manual,
    /// Automatic mode saw too many errors in the last sample.
    TooManyErrors,
    /// Automatic mode was re-armed (mode switch or language change).
    Rearmed,
}

impl ActiveReason {
    /// Human-readable description suitable for a status line.
    pub fn description(self, active: bool) -> &'static str {
        match (self, active) {
            (ActiveReason::TooManyErrors, _) => {
                "Too many misspelled words. As-you-type spell checking disabled."
            }
            (_, true) => "As-you-type spell checking enabled.",
            (_, false) => "As-you-type spell checking disabled.",
        }
    }
}

/// Notification published by the highlight engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightEvent {
    /// Range `[start, end)` (char offsets, live coordinates) is now misspelled.
    Highlight(Range<usize>),
    /// Range `[start, end)` lost its misspelled markup.
    Unhighlight(Range<usize>),
    /// Checking was switched on or off.
    ActiveChanged {
        active: bool,
        reason: ActiveReason,
        description: String,
    },
    /// The language used for checking changed.
    LanguageChanged(String),
    /// Request for the host to move its cursor/selection over `[start, end)`.
    CursorChangeRequested(Range<usize>),
}

impl HighlightEvent {
    pub fn active_changed(active: bool, reason: ActiveReason) -> Self {
        HighlightEvent::ActiveChanged {
            active,
            reason,
            description: reason.description(active).to_string(),
        }
    }

    /// True for range markup events.
    pub fn is_markup(&self) -> bool {
        matches!(
            self,
            HighlightEvent::Highlight(_) | HighlightEvent::Unhighlight(_)
        )
    }
}

/// Receiver of highlight events. Implementations must not block; the engine
/// calls them synchronously from its single execution context.
pub trait HighlightObserver {
    fn on_event(&mut self, event: &HighlightEvent);
}

/// Default no-op observer.
pub struct NoopObserver;

impl HighlightObserver for NoopObserver {
    fn on_event(&mut self, _event: &HighlightEvent) {}
}

/// Forwards events into an unbounded tokio channel so an async host (paint
/// loop, language server bridge) can consume them on its own schedule.
pub struct ChannelObserver {
    tx: UnboundedSender<HighlightEvent>,
}

impl ChannelObserver {
    pub fn new(tx: UnboundedSender<HighlightEvent>) -> Self {
        Self { tx }
    }
}

impl HighlightObserver for ChannelObserver {
    fn on_event(&mut self, event: &HighlightEvent) {
        if self.tx.send(event.clone()).is_err() {
            CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
            debug!(target: "highlight", "observer_channel_closed");
        }
    }
}

/// Ordered collection of observers; dispatch preserves registration order.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn HighlightObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn register<O: HighlightObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn dispatch(&mut self, event: HighlightEvent) {
        EVENTS_DISPATCHED.fetch_add(1, Ordering::Relaxed);
        for observer in self.observers.iter_mut() {
            observer.on_event(&event);
        }
    }
}
