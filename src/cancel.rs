//! Cooperative cancellation for in-flight streams.
//!
//! A [`CancelHandle`] is handed to the caller at stream-initiation time; the
//! matching token is threaded into a [`ControlledStream`] wrapping the
//! pipeline. Cancellation is cooperative: it takes effect at the next poll
//! (the next consumer pull / awaited network read), never preemptively
//! mid-computation. Because the whole pipeline is pull-based, ending the
//! outer stream also stops the next network read.

use crate::BoxStream;
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_util::sync::CancellationToken;

/// Handle used to cancel a running stream.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Create a linked handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancellationToken) {
    let token = CancellationToken::new();
    (
        CancelHandle {
            token: token.clone(),
        },
        token,
    )
}

/// A stream wrapper that ends cleanly once its cancellation token fires.
///
/// On cancellation the inner stream is dropped immediately — releasing the
/// decode buffer and the underlying network connection — and the wrapper
/// yields `None` with no synthetic error. Values already delivered are
/// unaffected.
pub struct ControlledStream<T> {
    inner: BoxStream<'static, T>,
    cancelled: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
    done: bool,
}

impl<T: Send + 'static> ControlledStream<T> {
    pub fn new(inner: BoxStream<'static, T>, token: CancellationToken) -> Self {
        Self {
            inner,
            cancelled: Box::pin(token.cancelled_owned()),
            done: false,
        }
    }
}

impl<T: Send + 'static> Stream for ControlledStream<T> {
    type Item = crate::Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        if this.cancelled.as_mut().poll(cx).is_ready() {
            this.done = true;
            tracing::debug!("stream cancelled; dropping pipeline");
            // Replace rather than wait for the wrapper itself to drop, so the
            // pipeline buffer and network read are released now.
            this.inner = Box::pin(futures::stream::empty());
            return Poll::Ready(None);
        }

        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(None) => {
                this.done = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}
