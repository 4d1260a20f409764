//! Publish/subscribe primitives shared by the loaders.
//!
//! Every subscriber gets its own unbounded queue, so all subscribers observe
//! the same ordered sequence of values and slow readers never lose any.

use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Subscribers<T> {
    senders: Vec<mpsc::UnboundedSender<T>>,
}

impl<T: Clone> Subscribers<T> {
    fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    fn publish(&mut self, value: &T) {
        // Dropped subscriptions are pruned on the next publish.
        self.senders.retain(|tx| tx.send(value.clone()).is_ok());
    }

    fn add(&mut self, replay: Option<T>) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(value) = replay {
            let _ = tx.send(value);
        }
        self.senders.push(tx);
        Subscription { rx }
    }

    fn live(&self) -> usize {
        self.senders.iter().filter(|tx| !tx.is_closed()).count()
    }
}

struct ObservableInner<T> {
    current: T,
    subscribers: Subscribers<T>,
}

/// A value that replays its current state to each new subscriber, then
/// forwards every later change.
pub struct Observable<T> {
    inner: Arc<Mutex<ObservableInner<T>>>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ObservableInner {
                current: initial,
                subscribers: Subscribers::new(),
            })),
        }
    }

    pub fn get(&self) -> T {
        lock(&self.inner).current.clone()
    }

    pub fn set(&self, value: T) {
        let mut inner = lock(&self.inner);
        inner.subscribers.publish(&value);
        inner.current = value;
    }

    /// The first value received is the current one.
    pub fn subscribe(&self) -> Subscription<T> {
        let mut inner = lock(&self.inner);
        let current = inner.current.clone();
        inner.subscribers.add(Some(current))
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).subscribers.live()
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("current", &self.get())
            .finish_non_exhaustive()
    }
}

/// A stream of events without a current value; subscribers only see what is
/// published after they subscribe.
pub struct Signal<T> {
    inner: Arc<Mutex<Subscribers<T>>>,
}

impl<T: Clone> Signal<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Subscribers::new())),
        }
    }

    pub fn publish(&self, value: T) {
        lock(&self.inner).publish(&value);
    }

    pub fn subscribe(&self) -> Subscription<T> {
        lock(&self.inner).add(None)
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).live()
    }
}

impl<T: Clone> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Receiving end of an [`Observable`] or [`Signal`].
///
/// Ends (`None`) once the publishing side is gone and the queue is drained.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Next queued value, without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Every value queued so far.
    pub fn drain(&mut self) -> Vec<T> {
        let mut values = Vec::new();
        while let Some(value) = self.try_recv() {
            values.push(value);
        }
        values
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
