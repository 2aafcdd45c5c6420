//! Notifications emitted by a [`super::DiffSession`].

use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

use crate::model::Table;

/// Event published to every subscriber after a calculation completes.
///
/// Serializes as `{ "action": "diff_calculated", "data": { "tablesAdded": [...] } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum DiffEvent {
    DiffCalculated {
        #[serde(rename = "tablesAdded")]
        tables_added: Vec<Table>,
    },
}

/// Receiver of session notifications.
///
/// Delivery is fire-and-forget: observers cannot acknowledge or push back.
pub trait DiffObserver {
    fn notify(&mut self, event: &DiffEvent);
}

impl<F> DiffObserver for F
where
    F: FnMut(&DiffEvent),
{
    fn notify(&mut self, event: &DiffEvent) {
        self(event)
    }
}

/// Forwards events into a channel for a UI loop to drain.
///
/// A disconnected receiver is ignored.
pub struct ChannelObserver(Sender<DiffEvent>);

impl ChannelObserver {
    pub fn new(sender: Sender<DiffEvent>) -> Self {
        Self(sender)
    }
}

impl DiffObserver for ChannelObserver {
    fn notify(&mut self, event: &DiffEvent) {
        if self.0.send(event.clone()).is_err() {
            tracing::debug!("diff event receiver disconnected");
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let event = DiffEvent::DiffCalculated {
            tables_added: vec![Table::new("t2", "posts")],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json["action"],
            schemadiff_core_types::schema::ACTION_DIFF_CALCULATED
        );
        assert_eq!(json["data"]["tablesAdded"][0]["id"], "t2");
    }

    #[test]
    fn test_channel_observer_ignores_dropped_receiver() {
        let (tx, rx) = std::sync::mpsc::channel();
        drop(rx);
        let mut observer = ChannelObserver::new(tx);
        observer.notify(&DiffEvent::DiffCalculated {
            tables_added: Vec::new(),
        });
    }
}
