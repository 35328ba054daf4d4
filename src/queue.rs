//! Bounded single-producer/single-consumer hand-off between the ingestion
//! thread and the UI loop.

use std::sync::mpsc::{self, Receiver, RecvError, SyncSender, TryRecvError};

pub const DEFAULT_CAPACITY: usize = 100;

/// Outcome of a non-blocking receive.
#[derive(Debug, PartialEq, Eq)]
pub enum Poll<T> {
    Item(T),
    /// Nothing queued right now; the producer is still running.
    Empty,
    /// The producer is gone and every queued item has been consumed.
    Finished,
}

/// Returned by [`Producer::push`] once the consumer has been dropped.
#[derive(Debug, PartialEq, Eq)]
pub struct Disconnected<T>(pub T);

pub struct Producer<T> {
    tx: SyncSender<T>,
}

pub struct Consumer<T> {
    rx: Receiver<T>,
}

pub fn handoff<T>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    let (tx, rx) = mpsc::sync_channel(capacity);
    (Producer { tx }, Consumer { rx })
}

impl<T> Producer<T> {
    /// Block until there is room, then enqueue.
    pub fn push(&self, item: T) -> Result<(), Disconnected<T>> {
        self.tx.send(item).map_err(|e| Disconnected(e.0))
    }
}

impl<T> Consumer<T> {
    pub fn try_pop(&self) -> Poll<T> {
        match self.rx.try_recv() {
            Ok(item) => Poll::Item(item),
            Err(TryRecvError::Empty) => Poll::Empty,
            Err(TryRecvError::Disconnected) => Poll::Finished,
        }
    }

    /// Block until an item arrives; `None` once the producer has finished.
    pub fn pop(&self) -> Option<T> {
        match self.rx.recv() {
            Ok(item) => Some(item),
            Err(RecvError) => None,
        }
    }

    /// A consumer whose producer has already finished.
    pub fn closed() -> Self {
        let (_, consumer) = handoff(0);
        consumer
    }
}
