/// A read position within one shard: the shard id and its opaque iterator token.
///
/// A cursor is single use. Fetching records consumes it and the only valid continuation
/// is the successor returned by that fetch, so this type is intentionally not `Clone`.
#[derive(Debug, PartialEq, Eq)]
pub struct ShardCursor {
    shard_id: String,
    iterator: String,
}

impl ShardCursor {
    pub fn new(shard_id: impl Into<String>, iterator: impl Into<String>) -> Self {
        Self {
            shard_id: shard_id.into(),
            iterator: iterator.into(),
        }
    }

    pub fn shard_id(&self) -> &str {
        self.shard_id.as_str()
    }

    pub fn iterator(&self) -> &str {
        self.iterator.as_str()
    }

    /// Build the cursor that continues this one within the same shard.
    pub fn successor(&self, iterator: impl Into<String>) -> Self {
        Self::new(self.shard_id.clone(), iterator)
    }
}
