//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep front-ends decoupled from storage details.

pub mod memo_filter;
pub mod memo_gateway;
pub mod memo_store;
