use aws_sdk_dynamodbstreams as dynamodbstreams;

/// A shard of a DynamoDB stream as described by `DescribeStream`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    id: String,
    closed: bool,
}

impl Shard {
    pub fn new(shard: dynamodbstreams::types::Shard) -> Option<Self> {
        let dynamodbstreams::types::Shard {
            shard_id,
            sequence_number_range,
            ..
        } = shard;

        // A shard with an ending sequence number no longer receives records.
        let closed = sequence_number_range
            .and_then(|range| range.ending_sequence_number)
            .is_some();

        shard_id.map(|id| Self { id, closed })
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Return true if the shard still receives new records.
    pub fn is_open(&self) -> bool {
        !self.closed
    }
}
