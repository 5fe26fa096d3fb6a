use super::{
    error::Error,
    types::{GetRecordsOutput, GetShardsOutput, Shard, ShardCursor},
};

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::{
    error::SdkError as DbSdkError, operation::describe_table::DescribeTableError,
    types::TableDescription, Client as DbClient,
};
use aws_sdk_dynamodbstreams::{
    error::SdkError as StreamsSdkError, operation::get_records::GetRecordsError,
    types::ShardIteratorType, Client as StreamsClient,
};
use std::fmt::Debug;

#[cfg(test)]
pub(crate) mod mock;

#[derive(Debug, Clone)]
pub struct Client {
    db: DbClient,
    streams: StreamsClient,
}

impl Client {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            db: DbClient::new(config),
            streams: StreamsClient::new(config),
        }
    }
}

#[async_trait]
pub trait DynamodbClient: Clone + Send + Sync {
    /// Return LatestStreamArn from Dynamodb table description, or `None` if the table
    /// has streams disabled.
    async fn get_stream_arn(
        &self,
        table_name: impl Into<String> + Send,
    ) -> Result<Option<String>, Error>;

    /// Return shards and next shard id from Dynamodb Stream description.
    async fn get_shards(
        &self,
        stream_arn: impl Into<String> + Send,
        exclusive_start_shard_id: Option<String>,
    ) -> Result<GetShardsOutput, Error>;

    /// Return a fresh cursor for the shard.
    async fn get_shard_cursor(
        &self,
        stream_arn: impl Into<String> + Send,
        shard: &Shard,
        shard_iterator_type: ShardIteratorType,
    ) -> Result<ShardCursor, Error>;

    /// Return records read with the cursor. The cursor is consumed, the successor in the
    /// output is the only way to keep reading the shard.
    ///
    /// Fails with [`Error::CursorInvalid`] when the iterator has expired or points at
    /// records already trimmed from the stream.
    async fn get_records(&self, cursor: ShardCursor) -> Result<GetRecordsOutput, Error>;
}

#[async_trait]
impl DynamodbClient for Client {
    async fn get_stream_arn(
        &self,
        table_name: impl Into<String> + Send,
    ) -> Result<Option<String>, Error> {
        let table_name: String = table_name.into();

        let table = self
            .db
            .describe_table()
            .table_name(&table_name)
            .send()
            .await
            .map_err(|err| describe_table_error(err, &table_name))?
            .table
            .ok_or_else(|| Error::NotFoundTable(table_name.clone()))?;

        Ok(enabled_stream_arn(table))
    }

    async fn get_shards(
        &self,
        stream_arn: impl Into<String> + Send,
        exclusive_start_shard_id: Option<String>,
    ) -> Result<GetShardsOutput, Error> {
        let stream_arn: String = stream_arn.into();

        self.streams
            .describe_stream()
            .stream_arn(&stream_arn)
            .set_exclusive_start_shard_id(exclusive_start_shard_id)
            .send()
            .await
            .map_err(|err| Error::SdkError(Box::new(err)))?
            .stream_description
            .map(|description| {
                let shards = description
                    .shards
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(Shard::new)
                    .collect::<Vec<Shard>>();
                let next_shard_id = description.last_evaluated_shard_id;

                GetShardsOutput {
                    shards,
                    next_shard_id,
                }
            })
            .ok_or(Error::NotFoundStreamDescription(stream_arn))
    }

    async fn get_shard_cursor(
        &self,
        stream_arn: impl Into<String> + Send,
        shard: &Shard,
        shard_iterator_type: ShardIteratorType,
    ) -> Result<ShardCursor, Error> {
        self.streams
            .get_shard_iterator()
            .stream_arn(stream_arn)
            .shard_id(shard.id())
            .shard_iterator_type(shard_iterator_type)
            .send()
            .await
            .map_err(|err| Error::SdkError(Box::new(err)))?
            .shard_iterator
            .map(|iterator| ShardCursor::new(shard.id(), iterator))
            .ok_or_else(|| Error::NotFoundShardIterator(shard.id().to_string()))
    }

    async fn get_records(&self, cursor: ShardCursor) -> Result<GetRecordsOutput, Error> {
        self.streams
            .get_records()
            .shard_iterator(cursor.iterator())
            .send()
            .await
            .map_err(|err| records_error(err, cursor.iterator()))
            .map(|output| GetRecordsOutput {
                records: output.records.unwrap_or_default(),
                next: output
                    .next_shard_iterator
                    .map(|iterator| cursor.successor(iterator)),
            })
    }
}

/// Latest stream of the table, unless its stream specification says streams are off.
fn enabled_stream_arn(table: TableDescription) -> Option<String> {
    let enabled = table
        .stream_specification()
        .map(|spec| spec.stream_enabled())
        .unwrap_or(true);

    table.latest_stream_arn.filter(|_| enabled)
}

fn describe_table_error<R>(err: DbSdkError<DescribeTableError, R>, table_name: &str) -> Error
where
    R: Debug + Send + Sync + 'static,
{
    let not_found = err
        .as_service_error()
        .is_some_and(|err| err.is_resource_not_found_exception());

    if not_found {
        Error::NotFoundTable(table_name.to_string())
    } else {
        Error::SdkError(Box::new(err))
    }
}

/// Expired and trimmed iterators become [`Error::CursorInvalid`], anything else is kept
/// as an SDK error.
fn records_error<R>(err: StreamsSdkError<GetRecordsError, R>, iterator: &str) -> Error
where
    R: Debug + Send + Sync + 'static,
{
    let invalid = err.as_service_error().is_some_and(|err| {
        err.is_expired_iterator_exception() || err.is_trimmed_data_access_exception()
    });

    if invalid {
        Error::CursorInvalid(iterator.to_string())
    } else {
        Error::SdkError(Box::new(err))
    }
}
