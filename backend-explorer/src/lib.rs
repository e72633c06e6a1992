mod backend;
mod client;
mod error;

pub use client::structs;
pub use client::{ExplorerClient, HttpClient};
pub use error::{Error, Result};

#[cfg(feature = "reqwest-client")]
pub use client::ReqwestClient;
#[cfg(feature = "ureq-client")]
pub use client::UreqClient;
