//! Typed client for the Coda REST API.
//!
//! Exposes the request/response models used by coda-mcp, the [`CodaApi`]
//! trait consumed by the control plane, and a `reqwest` implementation.

pub mod client;
pub mod error;
pub mod models;

pub use client::{CodaApi, CodaClientConfig, HttpCodaClient, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult};

#[cfg(feature = "testing")]
pub mod testing;
