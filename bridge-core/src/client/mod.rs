mod client;

pub use client::{BridgeClient, DEFAULT_FEE};
