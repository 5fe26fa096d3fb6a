//! Poll [Amazon DynamoDB Streams](https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/streamsmain.html)
//! of a dynamodb-local instance and deliver the change records to a handler, the way a
//! stream event source would invoke a function in the cloud.
//!
//! ## Getting Started
//!
//! Assuming that the dynamodb-local instance is running on localhost:8000 and the
//! "Orders" table has streams enabled, the following prints every batch of records
//! written after startup.
//!
//! ```rust,no_run
//! use dynamo_sandbox_streams::{self as sandbox, catalog::StaticCatalog, sink, SandboxConfig};
//! use tokio_stream::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sandbox::Error> {
//!     let config = SandboxConfig::new().enabled(true).port(Some(8000));
//!     let (sink, mut batches) = sink::channel(100);
//!
//!     let handle = sandbox::start(&config, StaticCatalog::new(["Orders"]), sink)?;
//!
//!     while let Some(batch) = batches.next().await {
//!         println!("{}: {:#?}", batch.table_name, batch.records);
//!     }
//!
//!     if let Some(handle) = handle {
//!         handle.stop().await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Records are read from `LATEST`: nothing written before startup, or before a table is
//! reset after an expired iterator, is delivered.

#[macro_use]
mod macros;

/// Tables to monitor.
pub mod catalog;

/// Client for calling AWS APIs.
pub mod client;

/// Activation and endpoint settings.
pub mod config;

/// Common errors.
pub mod error;

/// Cursor reset of a table.
pub mod initializer;

/// Polling loop.
pub mod poller;

/// Stream and shard lookup.
pub mod resolver;

/// Record batch delivery.
pub mod sink;

/// In-memory cursors.
pub mod store;

/// Data structures used by operations.
pub mod types;

pub use client::{Client, DynamodbClient};
pub use config::SandboxConfig;
pub use error::Error;

use catalog::TableCatalog;
use poller::PollerHandle;
use sink::Sink;
use tracing::info;

/// Start polling the streams of the catalog tables on a tokio task.
///
/// Returns `Ok(None)` without doing anything when the configuration is not enabled, and
/// an [`Error::Configuration`] when it is enabled without a port.
pub fn start<Catalog, S>(
    config: &SandboxConfig,
    catalog: Catalog,
    sink: S,
) -> Result<Option<PollerHandle>, Error>
where
    Catalog: TableCatalog + 'static,
    S: Sink + 'static,
{
    if !config.is_enabled() {
        info!(
            "Local table streams are disabled. Enable the external database and set the tables port to poll them."
        );
        return Ok(None);
    }

    let sdk_config = config.sdk_config()?;
    let handle = poller::builder()
        .client(Client::new(&sdk_config))
        .catalog(catalog)
        .sink(sink)
        .interval(config.tick_interval())
        .build()
        .spawn();

    Ok(Some(handle))
}
