//! External document-service boundary.
//!
//! # Responsibility
//! - Define the `DocumentClient` seam used by the export orchestrator.
//! - Provide the blocking HTTP implementation and its wire payloads.
//!
//! # Invariants
//! - Every call is authenticated with the caller-supplied team secret.
//! - Calls block until the response is fully observed; nothing is retried.

pub mod client;
pub mod http_client;
pub mod wire;

pub use client::{ClientError, ClientResult, DocumentClient};
pub use http_client::HttpDocumentClient;
