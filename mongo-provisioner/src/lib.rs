//! mongo-provisioner: one-shot MongoDB user provisioning procedures.
pub mod config;
pub mod models;
pub mod provisioning;
pub mod services;
pub mod startup;
