mod client;
mod provider;
mod types;

pub use client::{ClientSettings, RetryPolicy, DEFAULT_API_URL};
pub use provider::OpenCollectiveProvider;
