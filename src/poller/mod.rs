//! # Poller
//!
//! [`Poller`] owns the cursors of every monitored table and, once per interval, reads one
//! batch from each table and hands non-empty batches to a [`Sink`].
//!
//! ```rust,no_run
//! # use aws_config::BehaviorVersion;
//! use dynamo_sandbox_streams::{self as sandbox, catalog::StaticCatalog, sink};
//! use tokio_stream::StreamExt;
//!
//! # async fn wrapper() {
//! # let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
//! let (sink, mut batches) = sink::channel(100);
//!
//! let handle = sandbox::poller::builder()
//!     .client(sandbox::Client::new(&config))
//!     .catalog(StaticCatalog::new(["Orders"]))
//!     .sink(sink)
//!     .build()
//!     .spawn();
//!
//! if let Some(batch) = batches.next().await {
//!     println!("{}: {:#?}", batch.table_name, batch.records);
//! }
//!
//! // The current tick finishes before the poller stops.
//! let store = handle.stop().await.unwrap();
//! # }
//! ```
//!
//! ## Recovery
//!
//! Any failure to read records, whether the iterator expired, its records were trimmed
//! or the request itself failed, resets the whole table: all of its cursors are dropped
//! and one fresh `LATEST` cursor is acquired per open shard. A reset that fails is tried
//! again on the next tick.

mod channel;

use super::{
    catalog::TableCatalog,
    client::DynamodbClient,
    error::Error,
    initializer::initialize,
    resolver::Resolver,
    sink::Sink,
    store::CursorStore,
    types::GetRecordsOutput,
};

pub use channel::ConsumerChannel;

use channel::ProducerChannel;
use std::collections::BTreeSet;
use tokio::{
    task::JoinHandle,
    time::{sleep, Duration},
};
use tracing::{debug, info, warn};

/// Create [`PollerBuilder`].
pub fn builder<Client, Catalog, S>() -> PollerBuilder<Client, Catalog, S>
where
    Client: DynamodbClient + 'static,
    Catalog: TableCatalog + 'static,
    S: Sink + 'static,
{
    PollerBuilder::new()
}

/// Polling loop over the streams of every table in the catalog.
pub struct Poller<Client, Catalog, S>
where
    Client: DynamodbClient + 'static,
    Catalog: TableCatalog + 'static,
    S: Sink + 'static,
{
    resolver: Resolver<Client, Catalog>,
    store: CursorStore,
    sink: S,
    interval: Duration,
    /// Tables whose last reset failed.
    unresolved: BTreeSet<String>,
}

impl<Client, Catalog, S> Poller<Client, Catalog, S>
where
    Client: DynamodbClient + 'static,
    Catalog: TableCatalog + 'static,
    S: Sink + 'static,
{
    pub fn store(&self) -> &CursorStore {
        &self.store
    }

    /// Reset every table so that each open shard has a cursor at `LATEST`.
    pub async fn initialize_all(&mut self) {
        for table_name in self.store.table_names() {
            self.reset(&table_name).await;
        }
    }

    /// Visit every table once: read one batch from tables with cursors and retry the
    /// reset of tables whose previous reset failed.
    pub async fn tick(&mut self) {
        for table_name in self.store.table_names() {
            if self.unresolved.contains(&table_name) {
                self.reset(&table_name).await;
            } else {
                self.poll_table(&table_name).await;
            }
        }
    }

    /// Poll until stopped and return the final cursors. A poller started with this
    /// method has no stop channel and only ends with the runtime, see [`Poller::spawn`].
    pub async fn run(self) -> CursorStore {
        let (producer, _consumer) = channel::new();
        self.polling(producer).await
    }

    /// Move the poller onto a tokio task and return a handle to stop it.
    pub fn spawn(self) -> PollerHandle {
        let (producer, consumer) = channel::new();
        let task = tokio::spawn(self.polling(producer));

        PollerHandle {
            channel: consumer,
            task,
        }
    }

    async fn polling(mut self, mut channel: ProducerChannel) -> CursorStore {
        self.initialize_all().await;
        channel.send_init();

        loop {
            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = channel.closed() => break,
            }

            self.tick().await;

            if channel.should_close() {
                break;
            }
        }

        debug!("Stop polling {} tables.", self.store.table_names().len());
        self.store
    }

    /// Take one cursor of the table, read records with it and queue its successor.
    async fn poll_table(&mut self, table_name: &str) {
        let cursor = match self.store.pop(table_name) {
            Some(cursor) => cursor,
            None => return,
        };
        let shard_id = cursor.shard_id().to_string();

        match self.resolver.client().get_records(cursor).await {
            Ok(GetRecordsOutput { records, next }) => {
                if !records.is_empty() {
                    debug!(
                        "Deliver {} records from shard {shard_id} of {table_name} table.",
                        records.len(),
                    );
                    self.sink.deliver(table_name, records).await;
                }

                match next {
                    Some(cursor) => self.store.push(table_name, cursor),
                    None => debug!("Shard {shard_id} of {table_name} table is closed."),
                }
            }
            Err(err) => {
                if err.is_cursor_invalid() {
                    info!("Shard iterator of {shard_id} for {table_name} table is no longer valid. Reset the table.");
                } else {
                    warn!("Unexpected error during getting records of {table_name} table: {err}. Reset the table.");
                }

                self.reset(table_name).await;
            }
        }
    }

    async fn reset(&mut self, table_name: &str) {
        let count = ok_or_return!(
            initialize(&self.resolver, &mut self.store, table_name).await,
            |err: Error| {
                warn!("Unexpected error during resetting {table_name} table: {err}. Retry on the next tick.");
                self.unresolved.insert(table_name.to_string());
            }
        );

        self.unresolved.remove(table_name);
        debug!("Reset {table_name} table with {count} shard iterators.");
    }
}

/// Handle to a poller running on a tokio task.
///
/// Dropping the handle stops the poller as well.
#[derive(Debug)]
pub struct PollerHandle {
    channel: ConsumerChannel,
    task: JoinHandle<CursorStore>,
}

impl PollerHandle {
    /// Return true once every table got its first cursors.
    pub fn initialized(&mut self) -> bool {
        self.channel.initialized()
    }

    /// Send `Stop polling` event and wait for the current tick to finish.
    ///
    /// The tick awaits every delivery it makes, so if the sink blocks (for instance a
    /// [`ChannelSink`](crate::sink::ChannelSink) whose buffer is full and no longer
    /// drained) this does not return until the delivery completes.
    pub async fn stop(mut self) -> Result<CursorStore, Error> {
        self.channel.close(|| {});
        (&mut self.task)
            .await
            .map_err(|err| Error::Disconnected(err.to_string()))
    }
}

/// A builder for [`Poller`].
#[derive(Debug)]
pub struct PollerBuilder<Client, Catalog, S>
where
    Client: DynamodbClient + 'static,
    Catalog: TableCatalog + 'static,
    S: Sink + 'static,
{
    client: Option<Client>,
    catalog: Option<Catalog>,
    sink: Option<S>,
    interval: Duration,
}

impl<Client, Catalog, S> PollerBuilder<Client, Catalog, S>
where
    Client: DynamodbClient + 'static,
    Catalog: TableCatalog + 'static,
    S: Sink + 'static,
{
    /// Create a new `PollerBuilder`.
    pub fn new() -> Self {
        Self {
            client: None,
            catalog: None,
            sink: None,
            interval: Duration::from_secs(2),
        }
    }

    /// Set client to call AWS APIs.
    ///
    /// **Setting any client is required** before the build method is called.
    pub fn client(self, client: Client) -> Self {
        Self {
            client: Some(client),
            ..self
        }
    }

    /// Set the catalog listing the tables to poll.
    ///
    /// **Setting any catalog is required** before the build method is called.
    pub fn catalog(self, catalog: Catalog) -> Self {
        Self {
            catalog: Some(catalog),
            ..self
        }
    }

    /// Set the sink receiving record batches.
    ///
    /// **Setting any sink is required** before the build method is called.
    pub fn sink(self, sink: S) -> Self {
        Self {
            sink: Some(sink),
            ..self
        }
    }

    /// Set interval between ticks.
    ///
    /// Setting any interval is optional. If you omit calling this method,
    /// `2 seconds` is used as default value.
    pub fn interval(self, interval: Duration) -> Self {
        Self { interval, ..self }
    }

    /// Consumes the builder and constructs a [`Poller`] with every catalog table
    /// registered and no cursors yet.
    ///
    /// This method will panic if no client, catalog or sink is set.
    pub fn build(self) -> Poller<Client, Catalog, S> {
        let client = self.client.expect("`client` is required");
        let catalog = self.catalog.expect("`catalog` is required");
        let sink = self.sink.expect("`sink` is required");

        let mut store = CursorStore::new();
        for table_name in catalog.tables() {
            store.register(table_name);
        }

        Poller {
            resolver: Resolver::new(client, catalog),
            store,
            sink,
            interval: self.interval,
            unresolved: BTreeSet::new(),
        }
    }
}

impl<Client, Catalog, S> Default for PollerBuilder<Client, Catalog, S>
where
    Client: DynamodbClient + 'static,
    Catalog: TableCatalog + 'static,
    S: Sink + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
