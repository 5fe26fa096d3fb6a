use super::{Shard, ShardCursor};

use aws_sdk_dynamodbstreams::types::Record;

#[derive(Debug, Clone)]
pub struct GetShardsOutput {
    pub shards: Vec<Shard>,
    pub next_shard_id: Option<String>,
}

/// A batch of records and the cursor to continue from, if the shard is still readable.
#[derive(Debug)]
pub struct GetRecordsOutput {
    pub records: Vec<Record>,
    pub next: Option<ShardCursor>,
}

/// The current stream of a table and its active shards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub stream_arn: String,
    pub shards: Vec<Shard>,
}
