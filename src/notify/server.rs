use std::collections::HashMap;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::notify::protocol::Event;

/// A handle to push events to one connected WebSocket client. `conn_id`
/// identifies the connection across every channel it joins.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub conn_id: Uuid,
    pub sender: mpsc::UnboundedSender<Event>,
}

/// Publish/subscribe registry for event fan-out, organized by channel.
///
/// A channel id is either a gig id (everyone watching that gig) or a user id
/// (that user's personal channel). One WebSocket connection can subscribe to
/// any number of channels; all of them feed the connection's single sender.
///
/// Delivery is fire-and-forget: a send to a dropped receiver is ignored and
/// the handle is removed when the session disconnects.
pub struct Notifier {
    /// channel id -> subscribed client handles
    channels: RwLock<HashMap<Uuid, Vec<ClientHandle>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe a connection to a channel. Joining a channel twice is a
    /// no-op.
    pub async fn join(&self, channel: Uuid, handle: ClientHandle) {
        let mut channels = self.channels.write().await;
        let subscribers = channels.entry(channel).or_insert_with(Vec::new);
        if !subscribers.iter().any(|c| c.conn_id == handle.conn_id) {
            subscribers.push(handle);
        }
    }

    /// Unsubscribe a connection from a channel.
    pub async fn leave(&self, channel: Uuid, conn_id: Uuid) {
        let mut channels = self.channels.write().await;
        if let Some(subscribers) = channels.get_mut(&channel) {
            subscribers.retain(|c| c.conn_id != conn_id);
            if subscribers.is_empty() {
                channels.remove(&channel);
            }
        }
    }

    /// Drop every subscription held by a connection (called on disconnect).
    pub async fn leave_all(&self, conn_id: Uuid) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, subscribers| {
            subscribers.retain(|c| c.conn_id != conn_id);
            !subscribers.is_empty()
        });
    }

    /// Push an event to every subscriber of a channel.
    pub async fn publish(&self, channel: Uuid, event: Event) {
        let channels = self.channels.read().await;
        if let Some(subscribers) = channels.get(&channel) {
            for client in subscribers {
                // A failed send means the receiver is gone (disconnected);
                // leave_all() cleans the handle up.
                let _ = client.sender.send(event.clone());
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> (ClientHandle, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            ClientHandle {
                conn_id: Uuid::new_v4(),
                sender: tx,
            },
            rx,
        )
    }

    fn placed(gig_id: Uuid) -> Event {
        Event::BidPlaced {
            gig_id,
            bid_id: Uuid::new_v4(),
            message: "New bid".to_string(),
        }
    }

    #[tokio::test]
    async fn publish_reaches_channel_subscribers() {
        let notifier = Notifier::new();
        let gig = Uuid::new_v4();
        let (h, mut rx) = handle();

        notifier.join(gig, h).await;
        notifier.publish(gig, placed(gig)).await;

        assert!(matches!(rx.recv().await, Some(Event::BidPlaced { .. })));
    }

    #[tokio::test]
    async fn publish_skips_other_channels() {
        let notifier = Notifier::new();
        let gig_a = Uuid::new_v4();
        let gig_b = Uuid::new_v4();
        let (h, mut rx) = handle();

        notifier.join(gig_a, h).await;
        notifier.publish(gig_b, placed(gig_b)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn leaving_stops_delivery() {
        let notifier = Notifier::new();
        let gig = Uuid::new_v4();
        let (h, mut rx) = handle();
        let conn_id = h.conn_id;

        notifier.join(gig, h).await;
        notifier.leave(gig, conn_id).await;
        notifier.publish(gig, placed(gig)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn leave_all_clears_every_subscription() {
        let notifier = Notifier::new();
        let gig_a = Uuid::new_v4();
        let gig_b = Uuid::new_v4();
        let (h, mut rx) = handle();
        let conn_id = h.conn_id;

        notifier.join(gig_a, h.clone()).await;
        notifier.join(gig_b, h).await;
        notifier.leave_all(conn_id).await;

        notifier.publish(gig_a, placed(gig_a)).await;
        notifier.publish(gig_b, placed(gig_b)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn duplicate_join_delivers_once() {
        let notifier = Notifier::new();
        let gig = Uuid::new_v4();
        let (h, mut rx) = handle();

        notifier.join(gig, h.clone()).await;
        notifier.join(gig, h).await;
        notifier.publish(gig, placed(gig)).await;

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dropped_receiver_does_not_block_publish() {
        let notifier = Notifier::new();
        let gig = Uuid::new_v4();
        let (h, rx) = handle();
        drop(rx);

        notifier.join(gig, h).await;
        // Must not panic or error.
        notifier.publish(gig, placed(gig)).await;
    }
}
