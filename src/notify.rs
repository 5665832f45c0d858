//! Per-group snapshot fan-out. Delivery is best-effort: a subscriber that
//! lags or disconnects misses frames, and any later query recomputes the
//! snapshot from scratch, so nothing is lost.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::broadcast;

use crate::schemas::Snapshot;

const CHANNEL_CAPACITY: usize = 16;

#[derive(Default)]
pub struct SnapshotHub {
    channels: RwLock<HashMap<String, broadcast::Sender<Snapshot>>>,
}

impl SnapshotHub {
    /// Subscribe to a group's updates, creating its channel on first use.
    pub fn subscribe(&self, group_id: &str) -> broadcast::Receiver<Snapshot> {
        self.channels
            .write()
            .unwrap()
            .entry(group_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Push a snapshot to whoever is watching. A group nobody has subscribed
    /// to has no channel, and a channel with no live receivers errors on
    /// send; both cases are fine to ignore.
    pub fn publish(&self, group_id: &str, snapshot: Snapshot) {
        if let Some(sender) = self.channels.read().unwrap().get(group_id) {
            let _ = sender.send(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: &str) -> Snapshot {
        Snapshot {
            id: id.to_string(),
            name: "Trip".to_string(),
            members: vec![],
            expenses: vec![],
            balances: HashMap::new(),
            settlements: vec![],
        }
    }

    #[tokio::test]
    async fn subscriber_receives_published_snapshot() {
        let hub = SnapshotHub::default();
        let mut rx = hub.subscribe("g1");

        hub.publish("g1", snapshot("g1"));
        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, "g1");
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let hub = SnapshotHub::default();
        hub.publish("g1", snapshot("g1"));
    }

    #[tokio::test]
    async fn groups_have_independent_channels() {
        let hub = SnapshotHub::default();
        let mut rx_one = hub.subscribe("g1");
        let mut rx_two = hub.subscribe("g2");

        hub.publish("g2", snapshot("g2"));
        assert_eq!(rx_two.recv().await.unwrap().id, "g2");
        assert!(rx_one.try_recv().is_err());
    }
}
