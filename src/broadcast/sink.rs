//! Pluggable delivery of link events

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use super::event::WeightEvent;

/// Default buffer depth for [`ChannelSink`] subscribers
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Receives every event a link emits
///
/// Delivery is fire-and-forget: `publish` must not block the session loop,
/// and a sink with nobody listening simply drops the event.
pub trait BroadcastSink: Send + Sync + 'static {
    /// Deliver one event
    fn publish(&self, event: WeightEvent);
}

/// Fan-out sink backed by a tokio broadcast channel
///
/// Clone it freely; all clones feed the same set of subscribers. Slow
/// subscribers lag and lose the oldest events rather than stalling the link.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: broadcast::Sender<WeightEvent>,
}

impl ChannelSink {
    /// Create a sink whose subscribers buffer up to `capacity` events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Open a new subscription to the event stream
    pub fn subscribe(&self) -> broadcast::Receiver<WeightEvent> {
        self.tx.subscribe()
    }

    /// Number of currently attached subscribers
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChannelSink {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl BroadcastSink for ChannelSink {
    fn publish(&self, event: WeightEvent) {
        // A send error only means there are no subscribers right now.
        self.tx.send(event).unwrap_or(0);
    }
}

/// Sink that records every event in memory
///
/// Intended for tests and short diagnostic runs; it grows without bound.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<WeightEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far, in order
    pub fn events(&self) -> Vec<WeightEvent> {
        self.lock().clone()
    }

    /// The most recently published event
    pub fn last(&self) -> Option<WeightEvent> {
        self.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<WeightEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BroadcastSink for MemorySink {
    fn publish(&self, event: WeightEvent) {
        self.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_delivers_to_subscribers() {
        let sink = ChannelSink::new(8);
        let mut rx = sink.subscribe();

        sink.publish(WeightEvent::ConnectivityChanged(true));

        assert_eq!(rx.try_recv().unwrap(), WeightEvent::ConnectivityChanged(true));
    }

    #[test]
    fn test_channel_sink_without_subscribers_does_not_panic() {
        let sink = ChannelSink::new(8);
        sink.publish(WeightEvent::ConnectivityChanged(false));
        assert_eq!(sink.receiver_count(), 0);
    }

    #[test]
    fn test_channel_sink_clones_share_subscribers() {
        let sink = ChannelSink::default();
        let clone = sink.clone();
        let mut rx = sink.subscribe();

        clone.publish(WeightEvent::ConnectivityChanged(true));

        assert!(rx.try_recv().is_ok());
        assert_eq!(clone.receiver_count(), 1);
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.publish(WeightEvent::ConnectivityChanged(true));
        sink.publish(WeightEvent::ConnectivityChanged(false));

        assert_eq!(sink.len(), 2);
        assert_eq!(
            sink.events(),
            vec![
                WeightEvent::ConnectivityChanged(true),
                WeightEvent::ConnectivityChanged(false),
            ]
        );
        assert_eq!(sink.last(), Some(WeightEvent::ConnectivityChanged(false)));
    }

    #[test]
    fn test_memory_sink_clones_share_storage() {
        let sink = MemorySink::new();
        let clone = sink.clone();

        clone.publish(WeightEvent::ConnectivityChanged(true));

        assert_eq!(sink.len(), 1);
    }
}
