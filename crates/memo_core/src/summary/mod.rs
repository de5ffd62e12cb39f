//! AI summary boundary.
//!
//! # Responsibility
//! - Define the summarizer contract consumed by the memo viewer.
//! - Provide the HTTP client for the external summary endpoint.

pub mod client;
