use super::{
    catalog::TableCatalog,
    client::DynamodbClient,
    error::Error,
    types::{GetShardsOutput, Shard, StreamDescriptor},
};

/// Resolves a logical table name to its current stream and active shards.
#[derive(Debug, Clone)]
pub struct Resolver<Client, Catalog>
where
    Client: DynamodbClient,
    Catalog: TableCatalog,
{
    client: Client,
    catalog: Catalog,
}

impl<Client, Catalog> Resolver<Client, Catalog>
where
    Client: DynamodbClient,
    Catalog: TableCatalog,
{
    pub fn new(client: Client, catalog: Catalog) -> Self {
        Self { client, catalog }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Look up the table's latest stream and list the shards that are still open.
    ///
    /// Returns `Ok(None)` when the table exists but has no stream enabled.
    pub async fn resolve(&self, table_name: &str) -> Result<Option<StreamDescriptor>, Error> {
        let physical_name = self.catalog.physical_name(table_name);

        let stream_arn = match self.client.get_stream_arn(physical_name).await? {
            Some(arn) => arn,
            None => return Ok(None),
        };

        let shards = self
            .get_all_shards(&stream_arn)
            .await?
            .into_iter()
            .filter(Shard::is_open)
            .collect();

        Ok(Some(StreamDescriptor { stream_arn, shards }))
    }

    /// Get all shards from the stream, following the pagination of `DescribeStream`.
    async fn get_all_shards(&self, stream_arn: &str) -> Result<Vec<Shard>, Error> {
        let GetShardsOutput {
            mut shards,
            mut next_shard_id,
        } = self.client.get_shards(stream_arn, None).await?;

        while next_shard_id.is_some() {
            let mut output = self
                .client
                .get_shards(stream_arn, next_shard_id.take())
                .await?;
            shards.append(&mut output.shards);
            next_shard_id = output.next_shard_id;
        }

        Ok(shards)
    }
}
