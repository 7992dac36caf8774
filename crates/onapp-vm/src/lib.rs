//! Virtual machine bindings for the OnApp REST API.
//!
//! Provides an asynchronous client for the virtual machine lifecycle
//! endpoints: create, edit, resize, migrate, power control, console access and
//! statistics. Responses are returned as `serde_json::Value`, unwrapped from
//! their envelopes the way each endpoint prescribes.
//!
//! ```no_run
//! use onapp_vm::{Options, VirtualMachineClientBuilder};
//!
//! # async fn run() -> onapp_vm::Result<()> {
//! let client = VirtualMachineClientBuilder::new("https://cloud.example.com")?
//!     .with_basic_auth("admin@example.com", "api-key")
//!     .build()?;
//!
//! let vm = client
//!     .resize(42, Options::new().with("memory", 1024).with("cpus", 2))
//!     .await?;
//! println!("{}", vm["memory"]);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
pub mod endpoints;
pub mod models;

pub use client::{VirtualMachineClient, VirtualMachineClientBuilder};
pub use endpoints::{Endpoint, Extraction, PathArgs, Placement, Verb, VmOperation};
pub use models::{Identifier, Options};

/// Convenient result alias that reuses the shared OnApp error type.
pub type Result<T> = onapp_core::Result<T>;
