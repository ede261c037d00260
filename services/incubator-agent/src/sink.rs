//! Signal delivery.
//!
//! Signals leave the agent through a `SignalSink`. The binary logs them;
//! embedders can forward them over a channel instead.

use anyhow::Result;
use async_trait::async_trait;
use hatchery_events::Signal;
use tokio::sync::{mpsc, Mutex};
use tracing::info;

/// Receives signals produced by an agent pass.
#[async_trait]
pub trait SignalSink: Send + Sync {
    /// Deliver one signal.
    async fn send(&self, signal: Signal) -> Result<()>;
}

/// Writes every signal to the log.
#[derive(Debug, Default)]
pub struct TracingSink;

#[async_trait]
impl SignalSink for TracingSink {
    async fn send(&self, signal: Signal) -> Result<()> {
        match &signal {
            Signal::EggHatched(p) => info!(
                signal_type = signal.signal_type(),
                pokemon_id = %p.id,
                species_id = %p.species_id,
                level = p.level,
                cp = p.cp,
                max_cp = p.max_cp,
                perfection = p.perfection,
                "Egg hatched"
            ),
            Signal::IncubatorStatus(p) => info!(
                signal_type = signal.signal_type(),
                incubator_id = %p.incubator_id,
                egg_id = %p.item_id,
                was_added_now = p.was_added_now,
                km_to_walk = p.km_to_walk,
                km_remaining = p.km_remaining,
                "Incubator status"
            ),
        }
        Ok(())
    }
}

/// Forwards signals to an mpsc channel.
pub struct ChannelSink {
    tx: mpsc::Sender<Signal>,
}

impl ChannelSink {
    /// Create a sink and the receiving half of its channel.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Signal>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl SignalSink for ChannelSink {
    async fn send(&self, signal: Signal) -> Result<()> {
        self.tx
            .send(signal)
            .await
            .map_err(|_| anyhow::anyhow!("signal receiver dropped"))
    }
}

/// Keeps every signal in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    signals: Mutex<Vec<Signal>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals received so far, in delivery order.
    pub async fn signals(&self) -> Vec<Signal> {
        self.signals.lock().await.clone()
    }

    /// Drain the received signals.
    pub async fn take(&self) -> Vec<Signal> {
        std::mem::take(&mut *self.signals.lock().await)
    }
}

#[async_trait]
impl SignalSink for MemorySink {
    async fn send(&self, signal: Signal) -> Result<()> {
        self.signals.lock().await.push(signal);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatchery_events::IncubatorStatusPayload;
    use hatchery_id::{ItemId, SlotId};

    fn status() -> Signal {
        Signal::IncubatorStatus(IncubatorStatusPayload {
            incubator_id: SlotId::parse("inc_1").unwrap(),
            was_added_now: false,
            item_id: ItemId::new(1),
            km_to_walk: 2.0,
            km_remaining: 1.0,
        })
    }

    #[tokio::test]
    async fn test_channel_sink() {
        let (sink, mut rx) = ChannelSink::new(4);
        sink.send(status()).await.unwrap();
        assert_eq!(rx.recv().await, Some(status()));
    }

    #[tokio::test]
    async fn test_channel_sink_closed() {
        let (sink, rx) = ChannelSink::new(1);
        drop(rx);
        assert!(sink.send(status()).await.is_err());
    }

    #[tokio::test]
    async fn test_memory_sink_take() {
        let sink = MemorySink::new();
        sink.send(status()).await.unwrap();
        assert_eq!(sink.signals().await.len(), 1);
        assert_eq!(sink.take().await, vec![status()]);
        assert!(sink.signals().await.is_empty());
    }

    #[tokio::test]
    async fn test_tracing_sink_accepts_all() {
        assert!(TracingSink.send(status()).await.is_ok());
    }
}
