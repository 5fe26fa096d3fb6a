//! Delivery of record batches to whatever handles them.
//!
//! The poller hands every non-empty batch to a [`Sink`] and waits for `deliver` to
//! return before moving on. Delivery outcome never affects which records are read next:
//! a batch the sink fails to handle is not retried.

use async_trait::async_trait;
use aws_sdk_dynamodbstreams::types::Record;
use std::{
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tracing::error;

#[async_trait]
pub trait Sink: Send + Sync {
    async fn deliver(&self, table_name: &str, records: Vec<Record>);
}

/// Records read from one table in a single fetch.
#[derive(Debug, Clone)]
pub struct TableBatch {
    pub table_name: String,
    pub records: Vec<Record>,
}

/// Create a sink that forwards batches to a [`BatchStream`].
///
/// The batches are buffered up to `buffer`; once the buffer is full, delivery waits
/// until the stream is consumed. The poller waits with it, so keep draining the stream
/// until [`PollerHandle::stop`](crate::poller::PollerHandle::stop) has returned.
///
/// This function will panic when given zero as buffer size.
pub fn channel(buffer: usize) -> (ChannelSink, BatchStream) {
    if buffer == 0 {
        panic!("buffer must be positive.");
    }

    let (tx, rx) = mpsc::channel::<TableBatch>(buffer);
    (ChannelSink { sender: tx }, BatchStream { receiver: rx })
}

/// Sending half created by [`channel`].
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<TableBatch>,
}

#[async_trait]
impl Sink for ChannelSink {
    async fn deliver(&self, table_name: &str, records: Vec<Record>) {
        let batch = TableBatch {
            table_name: table_name.to_string(),
            records,
        };

        if let Err(err) = self.sender.send(batch).await {
            error!("Unexpected error during sending records of {table_name} table: {err}");
        }
    }
}

/// Receiving half created by [`channel`], consumed as a Rust Stream.
#[derive(Debug)]
pub struct BatchStream {
    receiver: mpsc::Receiver<TableBatch>,
}

impl Stream for BatchStream {
    type Item = TableBatch;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Sink calling a closure for every batch.
pub struct FnSink<F>(F);

impl<F> FnSink<F>
where
    F: Fn(&str, Vec<Record>) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Sink for FnSink<F>
where
    F: Fn(&str, Vec<Record>) + Send + Sync,
{
    async fn deliver(&self, table_name: &str, records: Vec<Record>) {
        (self.0)(table_name, records)
    }
}
