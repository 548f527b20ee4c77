use log::debug;

use crate::ContainerKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionKey(u32);

type Subscriber = Box<dyn FnMut() + Send>;

/// "Container updated" observer list owned by a single container
pub struct UpdateNotifier {
    subscribers: Vec<(SubscriptionKey, Subscriber)>,
    next_key: u32,
}

impl UpdateNotifier {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_key: 0,
        }
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut() + Send + 'static) -> SubscriptionKey {
        let key = SubscriptionKey(self.next_key);
        self.next_key = self.next_key.wrapping_add(1);
        self.subscribers.push((key, Box::new(subscriber)));
        key
    }

    pub fn unsubscribe(&mut self, key: &SubscriptionKey) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscriber_key, _)| subscriber_key != key);
        before != self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Calls every subscriber once, in subscription order
    pub(crate) fn notify(&mut self, container: &ContainerKey) {
        debug!(
            "UpdateNotifier: Container {:?} updated, notifying {} subscribers",
            container,
            self.subscribers.len()
        );
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber();
        }
    }
}

impl Default for UpdateNotifier {
    fn default() -> Self {
        Self::new()
    }
}
