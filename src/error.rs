use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("not found dynamodb table: {0}")]
    NotFoundTable(String),
    #[error("not found dynamodb stream description from arn: {0}")]
    NotFoundStreamDescription(String),
    #[error("not found shard iterator for shard: {0}")]
    NotFoundShardIterator(String),
    #[error("shard iterator is expired or trimmed: {0}")]
    CursorInvalid(String),
    #[error("invalid sandbox configuration: {0}")]
    Configuration(String),
    #[error("disconnected poller task: {0}")]
    Disconnected(String),
    #[error("aws-sdk error: {0}")]
    SdkError(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Return true if the error means the shard iterator can no longer be used, either
    /// because it expired or because the records it pointed to were trimmed.
    pub fn is_cursor_invalid(&self) -> bool {
        matches!(self, Self::CursorInvalid(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cursor_invalid_is_reported_as_invalid() {
        assert!(Error::CursorInvalid("iter".into()).is_cursor_invalid());

        let others = [
            Error::NotFoundTable("People".into()),
            Error::NotFoundShardIterator("shard".into()),
            Error::SdkError(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "connection reset",
            ))),
        ];
        assert!(others.iter().all(|err| !err.is_cursor_invalid()));
    }
}
