//! Async client core for the stock inventory API.
//!
//! # Overview
//! `ProductApi` exposes list/get/search/create/update/delete on products,
//! backed by an owned `TtlCache`, a retry policy and an `HttpClient` that
//! talks to the network through a `Transport`.
//!
//! # Design
//! - `HttpClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values as plain data; the `Transport` does the round-trip in between.
//!   `ReqwestTransport` is the production transport.
//! - Errors are tagged at construction (`ApiError::Response`, `Transport`,
//!   `Validation`) and classified by matching, which is all `with_retry`
//!   needs to decide whether to try again.
//! - The cache lives inside `ProductApi`, so each instance (and each test)
//!   has its own.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod cache;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod http;
pub mod products;
pub mod retry;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::TtlCache;
pub use client::HttpClient;
pub use config::{ApiConfig, CacheConfig, ConfigError, ConfigUpdate};
pub use error::{is_client_error, is_server_error, ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use products::ProductApi;
pub use retry::{with_retry, RetryOptions};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    CreateProductData, CreateProductResponse, MessageResponse, Product, SearchParams, SortOrder,
    UpdateProductData, UpdateProductResponse,
};

