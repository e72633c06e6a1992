use bitcoin::Amount;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Validation
    #[error("address: {0}")]
    Address(String),
    #[error("wrong network for address {0}")]
    WrongNetwork(String),

    // Transaction construction
    #[error("insufficient funds: {available} available, {required} required")]
    InsufficientFunds { available: Amount, required: Amount },
    #[error("inbound value {value} does not cover the {fee} fee")]
    ValueTooSmall { value: Amount, fee: Amount },
    #[error("sighash: {0}")]
    Sighash(String),

    // Broadcast
    #[error("broadcast rejected: {0}")]
    Broadcast(String),

    // Backend pass-through for explorer implementations
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;
