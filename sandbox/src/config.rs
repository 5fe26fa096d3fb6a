use clap::Parser;
use dynamo_sandbox_streams::{catalog::StaticCatalog, SandboxConfig};
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "sandbox")]
#[command(version)]
#[command(about = "Deliver local DynamoDB Streams records to a handler", long_about = None)]
pub struct Config {
    /// Poll the streams of an external dynamodb-local instance
    ///
    /// Can also be set via ARC_DB_EXTERNAL environment variable
    #[arg(long, env = "ARC_DB_EXTERNAL", value_parser = clap::builder::FalseyValueParser::new())]
    pub external_db: bool,

    /// Port dynamodb-local listens on
    ///
    /// Can also be set via ARC_TABLES_PORT environment variable
    #[arg(long, env = "ARC_TABLES_PORT")]
    pub tables_port: Option<u16>,

    /// AWS region of the local tables (default: us-west-2)
    ///
    /// Can also be set via AWS_REGION environment variable
    #[arg(long, env = "AWS_REGION", default_value = "us-west-2")]
    pub region: String,

    /// App name; physical tables are named `<app>-staging-<table>`
    ///
    /// Can also be set via ARC_APP_NAME environment variable
    #[arg(long, env = "ARC_APP_NAME")]
    pub app_name: Option<String>,

    /// Tables whose streams are delivered, comma separated
    ///
    /// Can also be set via ARC_TABLES_STREAMS environment variable
    #[arg(long = "table", env = "ARC_TABLES_STREAMS", value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Milliseconds between polls (default: 2000)
    #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,
}

impl Config {
    pub fn sandbox(&self) -> SandboxConfig {
        SandboxConfig::new()
            .enabled(self.external_db)
            .port(self.tables_port)
            .region(self.region.as_str())
            .interval(Duration::from_millis(self.interval_ms))
    }

    pub fn catalog(&self) -> StaticCatalog {
        let catalog = StaticCatalog::new(self.tables.iter().cloned());
        match &self.app_name {
            Some(app) => catalog.prefix(format!("{app}-staging-")),
            None => catalog,
        }
    }
}
