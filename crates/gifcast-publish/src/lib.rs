//! Giphy upload client.
//!
//! Publishes a locally encoded GIF to the Giphy upload endpoint and
//! returns the durable URL Giphy assigns, when it assigns one.

pub mod client;
pub mod config;
pub mod error;

pub use client::GiphyClient;
pub use config::PublisherConfig;
pub use error::{PublishError, PublishResult};
