use bitcoin::Txid;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("transport: {0}")]
    Transport(String),
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to read response body: {0}")]
    ResponseBody(String),
    #[error("transaction {0} has no input address")]
    MissingSourceAddress(Txid),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for bridge_core::Error {
    fn from(e: Error) -> Self {
        bridge_core::Error::Backend(Box::new(e))
    }
}
