//! Push/pull bridging between byte/value sources and lazy streams.
//!
//! The rest of the crate treats every source uniformly as a lazy, pull-based
//! sequence. This module converts in both directions:
//!
//! - push → pull: [`push_channel`] hands out a [`PushHandle`] and a lazy
//!   stream; each pull advances exactly one pushed unit, and dropping or
//!   closing the handle ends the sequence.
//! - pull → push: [`pump`] drives a lazy stream into a [`PushHandle`],
//!   releasing the read cursor and closing the sink on every exit path —
//!   normal exhaustion, early consumer termination, and source error.
//!
//! Backpressure is the channel's: a slow consumer blocks the pusher once the
//! buffer is full.

use crate::{BoxStream, Error, ErrorContext, Result};
use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};

/// The push side of a bridged sequence.
pub struct PushHandle<T> {
    tx: mpsc::Sender<Result<T>>,
}

impl<T: Send + 'static> PushHandle<T> {
    /// Push one unit. Waits while the consumer is behind. Fails once the
    /// consumer side has gone away.
    pub async fn push(&mut self, item: T) -> Result<()> {
        self.tx.send(Ok(item)).await.map_err(|_| {
            Error::runtime_with_context(
                "consumer side of the bridge has gone away",
                ErrorContext::new().with_source("adapter"),
            )
        })
    }

    /// Forward a terminal error to the consumer and close the sequence.
    pub async fn fail(mut self, err: Error) {
        let _ = self.tx.send(Err(err)).await;
    }

    /// Close the sequence. Dropping the handle has the same effect.
    pub fn close(mut self) {
        self.tx.close_channel();
    }
}

/// Bridge a push-style source into a lazy pull-based stream.
///
/// `capacity` bounds how many pushed-but-unpulled units may be in flight
/// beyond the channel's per-sender slot.
pub fn push_channel<T: Send + 'static>(capacity: usize) -> (PushHandle<T>, BoxStream<'static, T>) {
    let (tx, rx) = mpsc::channel(capacity);
    (PushHandle { tx }, Box::pin(rx))
}

/// Drive a lazy stream into a push sink.
///
/// Ends — closing the sink and dropping the source's read cursor — on
/// every exit path: the source is exhausted, the consumer stops pulling
/// (the sink reports closure), or the source errors (the error is forwarded
/// downstream first).
pub async fn pump<T: Send + 'static>(mut source: BoxStream<'static, T>, mut sink: PushHandle<T>) {
    while let Some(item) = source.next().await {
        match item {
            Ok(unit) => {
                if sink.push(unit).await.is_err() {
                    tracing::debug!("pump consumer stopped pulling; releasing source");
                    return;
                }
            }
            Err(e) => {
                sink.fail(e).await;
                return;
            }
        }
    }
    sink.close();
}
