//! Core use-case services.
//!
//! # Responsibility
//! - Define the service contracts consumed by presentation layers.
//! - Keep those layers decoupled from storage details.

pub mod author_service;
