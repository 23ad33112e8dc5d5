//! Observable values.
//!
//! Every store publishes its state through an [`Observable`]: a value held
//! in a `tokio::sync::watch` channel. Subscribers see the current value
//! immediately and then each later value. Intermediate values may be
//! skipped when a subscriber falls behind; the latest one is never lost.

use futures::stream::{self, Stream};
use std::sync::Arc;
use tokio::sync::watch;

/// A shared, observable value. Clones publish to the same channel.
#[derive(Debug)]
pub struct Observable<T> {
    sender: Arc<watch::Sender<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.sender.borrow())
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Mutate the value in place and notify subscribers.
    pub fn modify(&self, f: impl FnOnce(&mut T)) {
        self.sender.send_modify(f);
    }

    /// Mutate the value in place, notifying only when `f` returns `true`.
    pub fn modify_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.sender.send_if_modified(f)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone> Observable<T> {
    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            receiver: self.sender.subscribe(),
            primed: false,
        }
    }
}

/// A subscriber to an [`Observable`].
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: watch::Receiver<T>,
    primed: bool,
}

impl<T: Clone> Subscription<T> {
    /// Wait for the next value.
    ///
    /// The first call returns the current value without waiting. Returns
    /// `None` once every handle to the observable has been dropped.
    pub async fn next(&mut self) -> Option<T> {
        if !self.primed {
            self.primed = true;
            return Some(self.receiver.borrow_and_update().clone());
        }
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Clone of the latest value, without marking it seen.
    pub fn current(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Wait until a value satisfies `predicate`, checking the current value
    /// first.
    pub async fn wait_for(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Option<T> {
        loop {
            let value = self.next().await?;
            if predicate(&value) {
                return Some(value);
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = T> + Send + 'static
    where
        T: Send + Sync + 'static,
    {
        stream::unfold(self, |mut sub| async move {
            let value = sub.next().await?;
            Some((value, sub))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_subscription_yields_current_value_first() {
        let value = Observable::new(1);
        let mut sub = value.subscribe();
        assert_eq!(sub.next().await, Some(1));

        value.set(2);
        assert_eq!(sub.next().await, Some(2));
    }

    #[tokio::test]
    async fn test_subscription_keeps_latest_value() {
        let value = Observable::new(0);
        let mut sub = value.subscribe();
        assert_eq!(sub.next().await, Some(0));

        value.set(1);
        value.set(2);
        assert_eq!(sub.next().await, Some(2));
    }

    #[tokio::test]
    async fn test_subscription_ends_when_dropped() {
        let value = Observable::new("a".to_string());
        let mut sub = value.subscribe();
        sub.next().await;
        drop(value);
        assert_eq!(sub.next().await, None);
    }

    #[test]
    fn test_modify_if_only_notifies_on_change() {
        let value = Observable::new(vec![1, 2]);
        let sub = value.subscribe();

        assert!(!value.modify_if(|v| {
            let before = v.len();
            v.retain(|x| *x != 9);
            v.len() != before
        }));
        assert!(!sub.receiver.has_changed().unwrap());

        value.modify(|v| v.push(3));
        assert!(sub.receiver.has_changed().unwrap());
        assert_eq!(value.get(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_wait_for_and_stream() {
        let value = Observable::new(0u32);
        let writer = value.clone();
        let mut sub = value.subscribe();

        tokio::spawn(async move {
            for i in 1..=5 {
                writer.set(i);
                tokio::task::yield_now().await;
            }
        });
        assert_eq!(sub.wait_for(|v| *v == 5).await, Some(5));

        let first: Vec<u32> = value.subscribe().into_stream().take(1).collect().await;
        assert_eq!(first, vec![5]);
    }
}
