// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Completion, Demand, StreamHub, StreamItem, Student, StudentSubscriber, Subscription};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use std::pin::Pin;
use std::task::{Context, Poll};

struct ChannelSubscriber {
    sender: Mutex<Option<UnboundedSender<StreamItem<Student>>>>,
}

impl StudentSubscriber for ChannelSubscriber {
    fn on_next(&self, student: Student) {
        if let Some(sender) = self.sender.lock().as_ref() {
            let _ = sender.unbounded_send(StreamItem::Value(student));
        }
    }

    fn on_complete(&self, completion: Completion) {
        let Some(sender) = self.sender.lock().take() else {
            return;
        };
        if let Completion::Failed(error) = completion {
            let _ = sender.unbounded_send(StreamItem::Error(error));
        }
    }
}

/// Pull-based view of a hub subscription.
///
/// Each poll that finds nothing ready grants exactly one unit of demand, so
/// the hub never hands this stream more than it has been asked for. Known
/// records are replayed first. The stream yields the error and ends if a
/// fetch path fails, and cancels its subscription when dropped.
///
/// ```
/// use futures::StreamExt;
/// use roster_core::{Sex, StreamHub, StreamItem, Student};
///
/// # #[tokio::main]
/// # async fn main() {
/// let hub = StreamHub::new();
/// hub.broadcast(Student::new("Ana", Sex::Male, vec![7.0]));
///
/// let mut stream = hub.stream();
/// let first = stream.next().await;
/// assert_eq!(first, Some(StreamItem::Value(Student::new("Ana", Sex::Male, vec![7.0]))));
/// # }
/// ```
pub struct HubStream {
    receiver: UnboundedReceiver<StreamItem<Student>>,
    subscription: Subscription,
    requested: bool,
}

impl HubStream {
    pub(crate) fn subscribe(hub: &StreamHub) -> Self {
        let (sender, receiver) = mpsc::unbounded();
        let subscription = hub.subscribe(ChannelSubscriber {
            sender: Mutex::new(Some(sender)),
        });

        Self {
            receiver,
            subscription,
            requested: false,
        }
    }

    /// The underlying subscription handle.
    #[must_use]
    pub const fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl Stream for HubStream {
    type Item = StreamItem<Student>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match this.receiver.poll_next_unpin(cx) {
                Poll::Ready(Some(item)) => {
                    if item.is_value() {
                        this.requested = false;
                    }
                    return Poll::Ready(Some(item));
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending if !this.requested => {
                    this.requested = true;
                    this.subscription.request(Demand::max(1));
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl Drop for HubStream {
    fn drop(&mut self) {
        self.subscription.cancel();
    }
}
