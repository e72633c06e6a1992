mod backend;
mod builder;
mod client;
pub mod error;
mod types;

pub use bitcoin;

pub use backend::ExplorerBackend;
pub use client::{BridgeClient, DEFAULT_FEE};
pub use error::{Error, Result};
pub use types::{InboundTransaction, OutboundTransaction, UnspentOutput};
