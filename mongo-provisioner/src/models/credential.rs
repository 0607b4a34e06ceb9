//! Credential record - identifier, secret and granted roles.

use mongodb::bson::{doc, Bson, Document};
use secrecy::{ExposeSecret, Secret};
use std::collections::BTreeSet;

use super::{Namespace, Role, RoleGrant};

#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub user: String,
    pub pwd: Secret<String>,
    pub roles: Vec<Role>,
}

impl CredentialRecord {
    pub fn new(user: impl Into<String>, pwd: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            user: user.into(),
            pwd: Secret::new(pwd.into()),
            roles,
        }
    }

    /// `createUser` command document; must be run against the target namespace.
    pub fn create_user_command(&self) -> Document {
        let roles: Vec<Bson> = self.roles.iter().map(Bson::from).collect();
        doc! {
            "createUser": self.user.as_str(),
            "pwd": self.pwd.expose_secret().as_str(),
            "roles": roles,
        }
    }

    /// The set of grants the server should report after creation in `namespace`.
    pub fn expected_grants(&self, namespace: &Namespace) -> BTreeSet<RoleGrant> {
        self.roles.iter().map(|r| r.resolve(namespace)).collect()
    }
}
