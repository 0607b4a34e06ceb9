//! Namespace selector - the logical database a procedure targets.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const ADMIN_DB: &str = "admin";
pub const APP_DB: &str = "appdb";

/// A logical database; user records are registered against it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The administrative database.
    pub fn admin() -> Self {
        Self::new(ADMIN_DB)
    }

    /// The application database.
    pub fn app() -> Self {
        Self::new(APP_DB)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
