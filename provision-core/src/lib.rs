//! provision-core: Shared infrastructure for the provisioning tools.
pub mod config;
pub mod error;
pub mod observability;
