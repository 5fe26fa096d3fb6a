use aws_config::SdkConfig;
use aws_sdk_dynamodb::{
    types::{
        AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
        ScalarAttributeType, StreamSpecification, StreamViewType,
    },
    Client,
};
use aws_sdk_dynamodbstreams::types::Record;
use dynamo_sandbox_streams::{poller::PollerHandle, SandboxConfig};
use tokio::time::{sleep, Duration};
use ulid::Ulid;

const PK: &str = "Id";
const PORT: u16 = 8000;

pub struct TestConfig {
    table_name: String,
    sandbox: SandboxConfig,
    config: SdkConfig,
}

impl TestConfig {
    pub fn table_name(&self) -> &str {
        self.table_name.as_str()
    }

    pub fn sandbox_config(&self) -> &SandboxConfig {
        &self.sandbox
    }

    pub fn aws_sdk_config(&self) -> &SdkConfig {
        &self.config
    }
}

pub async fn setup() -> TestConfig {
    let sandbox = SandboxConfig::new()
        .enabled(true)
        .port(Some(PORT))
        .region("us-east-1")
        .interval(Duration::from_millis(100));
    let config = sandbox.sdk_config().unwrap();
    let table_name = format!("People-{}", Ulid::new());

    create_table(&table_name, &config).await;

    TestConfig {
        table_name,
        sandbox,
        config,
    }
}

pub async fn put_item(table_name: &str, pk: &str, config: &SdkConfig) {
    Client::new(config)
        .put_item()
        .table_name(table_name)
        .item(PK, AttributeValue::S(pk.into()))
        .send()
        .await
        .unwrap();
}

pub async fn teardown(table_name: &str, config: &SdkConfig) {
    Client::new(config)
        .delete_table()
        .table_name(table_name)
        .send()
        .await
        .unwrap();
}

pub async fn wait_until_initialized(handle: &mut PollerHandle) {
    while !handle.initialized() {
        sleep(Duration::from_millis(100)).await;
    }
}

pub fn pk(record: &Record) -> String {
    record
        .dynamodb()
        .and_then(|dynamodb| dynamodb.keys())
        .unwrap()
        .get(PK)
        .unwrap()
        .as_s()
        .unwrap()
        .to_string()
}

async fn create_table(table_name: &str, config: &SdkConfig) {
    Client::new(config)
        .create_table()
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(PK)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .unwrap(),
        )
        .table_name(table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(PK)
                .key_type(KeyType::Hash)
                .build()
                .unwrap(),
        )
        .billing_mode(BillingMode::PayPerRequest)
        .stream_specification(
            StreamSpecification::builder()
                .stream_enabled(true)
                .stream_view_type(StreamViewType::NewImage)
                .build()
                .unwrap(),
        )
        .send()
        .await
        .unwrap();
}
