//! # onapp-core
//!
//! Base API client for the OnApp cloud control panel.
//!
//! This crate provides the transport, configuration and error handling shared
//! by the OnApp resource bindings.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`config`] - Connection settings and YAML loading
//! - [`client`] - HTTP client, retry policy and the base [`client::ServiceClient`]
//! - [`request`] - The [`request::ApiRequester`] contract bindings call through
//! - [`query`] - Bracket-notation query string encoding

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod request;

// Re-export commonly used types
pub use client::{ServiceClient, ServiceClientBuilder};
pub use config::OnAppConfig;
pub use error::{Error, Result};
pub use request::{ApiRequester, Payload};
