//! Routing policy updater for the capstone API Management instance.
//!
//! The pipeline is strictly linear:
//! 1. [`policy::render_policy`] turns a [`config::PolicyConfig`] into the XML policy document
//! 2. [`payload::PolicyPayload`] wraps it in the management API request body
//! 3. [`payload::write_payload`] persists the body next to the operator
//! 4. [`invoker::ManagementCli::put`] hands the file to the external CLI
//!
//! The binary in `src/main.rs` sequences these steps and reports progress.

pub mod config;
pub mod error;
pub mod invoker;
pub mod payload;
pub mod policy;

pub use config::{PolicyConfig, RoutingRule};
pub use error::{ConfigError, UpdateError};
pub use invoker::{CommandOutcome, ManagementCli};
pub use payload::{PolicyFormat, PolicyPayload, write_payload};
pub use policy::{PolicyDocument, policy_resource_uri, render_policy};
