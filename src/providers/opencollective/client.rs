mod accounts;
mod core;
mod funding;
mod hosts;

pub use self::core::{ClientSettings, OpenCollectiveClient, RetryPolicy, DEFAULT_API_URL};
