mod config;

use async_trait::async_trait;
use aws_sdk_dynamodbstreams::types::Record;
use clap::Parser;
use config::Config;
use dynamo_sandbox_streams::{self as sandbox, sink::Sink};
use std::io::IsTerminal;
use tracing::{debug, error, info};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

// This binary assumes that the dynamodb-local instance is running on ARC_TABLES_PORT
// and the listed tables have streams enabled.

struct LogSink;

#[async_trait]
impl Sink for LogSink {
    async fn deliver(&self, table_name: &str, records: Vec<Record>) {
        info!("{table_name}: {} records", records.len());
        for record in records.iter() {
            debug!("{:#?}", record);
        }
    }
}

fn register_logger() {
    let log_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), sandbox::Error> {
    register_logger();

    let config = Config::parse();

    let handle = match sandbox::start(&config.sandbox(), config.catalog(), LogSink)? {
        Some(handle) => handle,
        None => return Ok(()),
    };
    info!("Polling streams of {} tables.", config.tables.len());

    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Unexpected error during waiting for ctrl-c: {err}");
    }

    handle.stop().await?;
    info!("Stopped polling.");

    Ok(())
}
