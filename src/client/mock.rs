use super::{DynamodbClient, Error};
use crate::types::{GetRecordsOutput, GetShardsOutput, Shard, ShardCursor};

use async_trait::async_trait;
use aws_sdk_dynamodbstreams::types::{Record, SequenceNumberRange, ShardIteratorType, StreamRecord};
use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex},
};

/// Scripted response for a single `get_records` call.
#[derive(Debug, Clone)]
pub enum Response {
    Records(Vec<Record>, Option<String>),
    Invalid,
    Failure,
}

impl Response {
    pub fn records(seqs: &[&str], next: Option<&str>) -> Self {
        Self::Records(
            seqs.iter().map(|&seq| record(seq)).collect(),
            next.map(|val| val.to_string()),
        )
    }
}

#[derive(Debug, Default)]
struct State {
    /// Physical table name to its latest stream arn. A missing key means no table.
    tables: HashMap<String, Option<String>>,
    shards: HashMap<String, Vec<Shard>>,
    page_size: Option<usize>,
    broken_shards: HashSet<String>,
    acquired: HashMap<String, usize>,
    responses: HashMap<String, VecDeque<Response>>,
    fetched: Vec<String>,
    describe_calls: usize,
}

/// In-memory stand-in for DynamoDB and DynamoDB Streams.
///
/// Cursors handed out for a shard are named `<shard id>#<n>` where `n` counts the
/// acquisitions for that shard. Fetching an iterator with no scripted response yields an
/// empty batch and the successor `<iterator>+`.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<State>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_table(&self, table_name: &str, stream_arn: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        state
            .tables
            .insert(table_name.into(), stream_arn.map(|arn| arn.into()));
    }

    pub fn put_shards(&self, stream_arn: &str, shards: Vec<Shard>) {
        let mut state = self.state.lock().unwrap();
        state.shards.insert(stream_arn.into(), shards);
    }

    pub fn set_page_size(&self, size: usize) {
        self.state.lock().unwrap().page_size = Some(size);
    }

    pub fn break_shard(&self, shard_id: &str) {
        self.state.lock().unwrap().broken_shards.insert(shard_id.into());
    }

    pub fn heal_shard(&self, shard_id: &str) {
        self.state.lock().unwrap().broken_shards.remove(shard_id);
    }

    pub fn respond(&self, iterator: &str, response: Response) {
        let mut state = self.state.lock().unwrap();
        state
            .responses
            .entry(iterator.into())
            .or_default()
            .push_back(response);
    }

    /// Iterators passed to `get_records`, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.state.lock().unwrap().fetched.clone()
    }

    pub fn describe_calls(&self) -> usize {
        self.state.lock().unwrap().describe_calls
    }
}

#[async_trait]
impl DynamodbClient for MockClient {
    async fn get_stream_arn(
        &self,
        table_name: impl Into<String> + Send,
    ) -> Result<Option<String>, Error> {
        let table_name: String = table_name.into();
        let mut state = self.state.lock().unwrap();
        state.describe_calls += 1;
        state
            .tables
            .get(&table_name)
            .cloned()
            .ok_or(Error::NotFoundTable(table_name))
    }

    async fn get_shards(
        &self,
        stream_arn: impl Into<String> + Send,
        exclusive_start_shard_id: Option<String>,
    ) -> Result<GetShardsOutput, Error> {
        let stream_arn: String = stream_arn.into();
        let state = self.state.lock().unwrap();
        let all = state
            .shards
            .get(&stream_arn)
            .ok_or_else(|| Error::NotFoundStreamDescription(stream_arn.clone()))?;

        let start = exclusive_start_shard_id
            .and_then(|id| all.iter().position(|shard| shard.id() == id))
            .map(|pos| pos + 1)
            .unwrap_or(0);
        let size = state.page_size.unwrap_or(usize::MAX);
        let shards: Vec<Shard> = all.iter().skip(start).take(size).cloned().collect();

        let next_shard_id = if start + shards.len() < all.len() {
            shards.last().map(|shard| shard.id().to_string())
        } else {
            None
        };

        Ok(GetShardsOutput {
            shards,
            next_shard_id,
        })
    }

    async fn get_shard_cursor(
        &self,
        _stream_arn: impl Into<String> + Send,
        shard: &Shard,
        shard_iterator_type: ShardIteratorType,
    ) -> Result<ShardCursor, Error> {
        assert_eq!(shard_iterator_type, ShardIteratorType::Latest);

        let mut state = self.state.lock().unwrap();
        if state.broken_shards.contains(shard.id()) {
            return Err(failure());
        }

        let count = state.acquired.entry(shard.id().to_string()).or_insert(0);
        let iterator = format!("{}#{}", shard.id(), count);
        *count += 1;

        Ok(ShardCursor::new(shard.id(), iterator))
    }

    async fn get_records(&self, cursor: ShardCursor) -> Result<GetRecordsOutput, Error> {
        let mut state = self.state.lock().unwrap();
        state.fetched.push(cursor.iterator().to_string());

        let response = state
            .responses
            .get_mut(cursor.iterator())
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Response::Records(vec![], Some(format!("{}+", cursor.iterator()))));

        match response {
            Response::Records(records, next) => Ok(GetRecordsOutput {
                records,
                next: next.map(|iterator| cursor.successor(iterator)),
            }),
            Response::Invalid => Err(Error::CursorInvalid(cursor.iterator().to_string())),
            Response::Failure => Err(failure()),
        }
    }
}

pub fn open_shard(id: &str) -> Shard {
    let shard = aws_sdk_dynamodbstreams::types::Shard::builder()
        .shard_id(id)
        .sequence_number_range(
            SequenceNumberRange::builder()
                .starting_sequence_number("000")
                .build(),
        )
        .build();
    Shard::new(shard).unwrap()
}

pub fn closed_shard(id: &str) -> Shard {
    let shard = aws_sdk_dynamodbstreams::types::Shard::builder()
        .shard_id(id)
        .sequence_number_range(
            SequenceNumberRange::builder()
                .starting_sequence_number("000")
                .ending_sequence_number("999")
                .build(),
        )
        .build();
    Shard::new(shard).unwrap()
}

pub fn record(seq: &str) -> Record {
    let dynamodb = StreamRecord::builder().sequence_number(seq).build();
    Record::builder().dynamodb(dynamodb).build()
}

pub fn sequence_number(record: &Record) -> String {
    record
        .dynamodb()
        .and_then(|r| r.sequence_number())
        .unwrap_or_default()
        .to_string()
}

fn failure() -> Error {
    Error::SdkError(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "connection reset",
    )))
}
