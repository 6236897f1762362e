//! State-change notifications for presentation layers.

use std::sync::mpsc::{channel, Receiver, Sender};

/// Emitted after every effective state change of a budget book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetEvent {
    /// Initial load (or seed) finished; the book is ready.
    Loaded,
    TransactionsAdded { count: usize },
    BalanceOverridden { category_id: String },
    OrderChanged,
    Undone,
    Redone,
    /// Remote changes were adopted over the current state.
    Refreshed,
}

/// Fan-out hub handing each subscriber its own channel.
///
/// Subscribers that dropped their receiver are pruned on the next emit.
#[derive(Debug, Default)]
pub struct EventHub {
    senders: Vec<Sender<BudgetEvent>>,
}

impl EventHub {
    pub fn subscribe(&mut self) -> Receiver<BudgetEvent> {
        let (sender, receiver) = channel();
        self.senders.push(sender);
        receiver
    }

    pub fn emit(&mut self, event: BudgetEvent) {
        self.senders.retain(|sender| sender.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_sees_every_event() {
        let mut hub = EventHub::default();
        let first = hub.subscribe();
        let second = hub.subscribe();
        hub.emit(BudgetEvent::Loaded);
        assert_eq!(first.try_recv().unwrap(), BudgetEvent::Loaded);
        assert_eq!(second.try_recv().unwrap(), BudgetEvent::Loaded);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut hub = EventHub::default();
        let kept = hub.subscribe();
        let dropped = hub.subscribe();
        drop(dropped);
        hub.emit(BudgetEvent::OrderChanged);
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(kept.try_recv().unwrap(), BudgetEvent::OrderChanged);
    }
}
