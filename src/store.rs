use super::types::ShardCursor;

use std::collections::{BTreeMap, VecDeque};

/// Cursor state of one monitored table.
#[derive(Debug, Default)]
pub struct TableEntry {
    stream_arn: Option<String>,
    cursors: VecDeque<ShardCursor>,
}

impl TableEntry {
    /// The stream the cursors were acquired from, if the table was resolved to one.
    pub fn stream_arn(&self) -> Option<&str> {
        self.stream_arn.as_deref()
    }

    pub fn cursors(&self) -> impl Iterator<Item = &ShardCursor> {
        self.cursors.iter()
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}

/// Live shard cursors of every monitored table, keyed by logical table name.
///
/// Each table owns a queue: the poller takes a cursor from the front and appends the
/// successor at the back, so multiple shards of one table are polled in turn.
#[derive(Debug, Default)]
pub struct CursorStore {
    tables: BTreeMap<String, TableEntry>,
}

impl CursorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table with no cursors. Registering an existing table keeps its state.
    pub fn register(&mut self, table_name: impl Into<String>) {
        self.tables.entry(table_name.into()).or_default();
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn get(&self, table_name: &str) -> Option<&TableEntry> {
        self.tables.get(table_name)
    }

    /// Take the next cursor to poll for the table.
    pub fn pop(&mut self, table_name: &str) -> Option<ShardCursor> {
        self.tables
            .get_mut(table_name)
            .and_then(|entry| entry.cursors.pop_front())
    }

    /// Queue a cursor for the table. Unregistered tables are registered on the way.
    pub fn push(&mut self, table_name: &str, cursor: ShardCursor) {
        self.entry_mut(table_name).cursors.push_back(cursor);
    }

    /// Drop every cursor of the table and forget its stream.
    pub fn clear(&mut self, table_name: &str) {
        let entry = self.entry_mut(table_name);
        entry.cursors.clear();
        entry.stream_arn = None;
    }

    pub fn set_stream_arn(&mut self, table_name: &str, stream_arn: Option<String>) {
        self.entry_mut(table_name).stream_arn = stream_arn;
    }

    /// Number of cursors queued for the table.
    pub fn len(&self, table_name: &str) -> usize {
        self.tables.get(table_name).map_or(0, TableEntry::len)
    }

    pub fn is_empty(&self, table_name: &str) -> bool {
        self.len(table_name) == 0
    }

    fn entry_mut(&mut self, table_name: &str) -> &mut TableEntry {
        self.tables.entry(table_name.to_string()).or_default()
    }
}
