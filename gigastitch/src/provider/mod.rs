//! HTTP transport abstraction
//!
//! The downloader fetches everything (metadata documents and tile images)
//! through [`AsyncHttpClient`]. [`AsyncReqwestClient`] is the production
//! implementation.

mod http;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use types::ProviderError;

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
