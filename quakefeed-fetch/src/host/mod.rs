//! Host APIs for feed retrieval.
//!
//! - [`http`] - HTTP client with fixed timeouts and tracing

pub mod http;

pub use http::{HttpClient, HttpClientBuilder};
