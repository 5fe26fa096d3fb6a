use super::{
    catalog::TableCatalog, client::DynamodbClient, error::Error, resolver::Resolver,
    store::CursorStore,
};

use aws_sdk_dynamodbstreams::types::ShardIteratorType;
use tracing::{debug, error};

/// Replace the table's cursors with one fresh cursor per open shard.
///
/// Existing cursors are dropped before the stream is resolved, so a failed resolution
/// leaves the table with nothing to poll. Cursors always start at `LATEST`: records
/// written before the reset are never delivered. A shard whose cursor cannot be acquired
/// is skipped and the remaining shards are still attempted, but if no cursor could be
/// acquired at all the last acquisition error is returned.
///
/// Returns the number of cursors queued for the table.
pub async fn initialize<Client, Catalog>(
    resolver: &Resolver<Client, Catalog>,
    store: &mut CursorStore,
    table_name: &str,
) -> Result<usize, Error>
where
    Client: DynamodbClient,
    Catalog: TableCatalog,
{
    store.clear(table_name);

    let descriptor = match resolver.resolve(table_name).await? {
        Some(descriptor) => descriptor,
        None => {
            debug!("{table_name} table has no stream enabled.");
            return Ok(0);
        }
    };

    let mut last_err = None;

    for shard in descriptor.shards.iter() {
        match resolver
            .client()
            .get_shard_cursor(
                descriptor.stream_arn.as_str(),
                shard,
                ShardIteratorType::Latest,
            )
            .await
        {
            Ok(cursor) => store.push(table_name, cursor),
            Err(err) => {
                error!(
                    "Unexpected error during getting shard iterator of {} for {table_name} table: {err}",
                    shard.id(),
                );
                last_err = Some(err);
            }
        }
    }

    // Open shards without a single cursor leave nothing to poll; let the caller retry.
    if store.is_empty(table_name) {
        if let Some(err) = last_err {
            return Err(err);
        }
    }

    store.set_stream_arn(table_name, Some(descriptor.stream_arn));

    Ok(store.len(table_name))
}
