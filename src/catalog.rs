/// Source of the tables to monitor and of their physical DynamoDB names.
pub trait TableCatalog: Send + Sync {
    /// Logical names of every table whose stream should be polled.
    fn tables(&self) -> Vec<String>;

    /// Physical DynamoDB table name for a logical table name.
    fn physical_name(&self, table_name: &str) -> String;
}

/// A fixed list of tables, optionally sharing a physical name prefix.
///
/// Architect sandbox names its tables `<app>-staging-<table>`, which is expressed as
/// `StaticCatalog::new(tables).prefix("<app>-staging-")`.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    tables: Vec<String>,
    prefix: Option<String>,
}

impl StaticCatalog {
    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
            prefix: None,
        }
    }

    pub fn prefix(self, prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..self
        }
    }
}

impl TableCatalog for StaticCatalog {
    fn tables(&self) -> Vec<String> {
        self.tables.clone()
    }

    fn physical_name(&self, table_name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{table_name}"),
            None => table_name.to_string(),
        }
    }
}
