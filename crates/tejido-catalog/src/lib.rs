//! Adapter HTTP del catálogo musical: autenticación client-credentials,
//! DTOs del wire y reintentos con backoff sobre el port `CatalogClient`.

mod auth;
mod client;
mod dto;
mod retry;

pub use auth::TokenManager;
pub use client::HttpCatalogClient;
pub use retry::{RetryPolicy, with_retry};
