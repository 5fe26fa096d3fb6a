mod cursor;
mod outputs;
mod shard;

pub use cursor::ShardCursor;
pub use outputs::{GetRecordsOutput, GetShardsOutput, StreamDescriptor};
pub use shard::Shard;
