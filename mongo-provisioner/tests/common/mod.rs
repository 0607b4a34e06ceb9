#![allow(dead_code)]

use async_trait::async_trait;
use mongo_provisioner::models::{CredentialRecord, Namespace, RoleGrant};
use mongo_provisioner::services::{MongoAdmin, UserRegistry};
use mongodb::bson::{doc, from_document};
use mongodb::error::{CommandError, Error as MongoError, ErrorKind};
use provision_core::error::ProvisionError;
use secrecy::Secret;
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// User registry kept in memory; rejects repeated identifiers per namespace
/// the way the server does.
#[derive(Default)]
pub struct InMemoryRegistry {
    users: Mutex<HashMap<(String, String), BTreeSet<RoleGrant>>>,
    calls: Mutex<Vec<String>>,
    deny_all: bool,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that fails every call as if the caller lacked privilege.
    pub fn unauthorized() -> Self {
        Self {
            deny_all: true,
            ..Self::default()
        }
    }

    /// Seed a user directly, bypassing the create path.
    pub fn insert(&self, namespace: &Namespace, user: &str, grants: BTreeSet<RoleGrant>) {
        self.users
            .lock()
            .unwrap()
            .insert((namespace.to_string(), user.to_string()), grants);
    }

    /// `db.user` for every createUser call, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn contains(&self, namespace: &Namespace, user: &str) -> bool {
        self.users
            .lock()
            .unwrap()
            .contains_key(&(namespace.to_string(), user.to_string()))
    }
}

#[async_trait]
impl UserRegistry for InMemoryRegistry {
    async fn create_user(
        &self,
        namespace: &Namespace,
        record: &CredentialRecord,
    ) -> Result<(), ProvisionError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}.{}", namespace, record.user));

        if self.deny_all {
            return Err(ProvisionError::Unauthorized(anyhow::anyhow!(
                "not authorized on {} to execute command",
                namespace
            )));
        }

        let key = (namespace.to_string(), record.user.clone());
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&key) {
            return Err(ProvisionError::DuplicateUser {
                user: record.user.clone(),
                db: namespace.to_string(),
            });
        }
        users.insert(key, record.expected_grants(namespace));
        Ok(())
    }

    async fn users_info(
        &self,
        namespace: &Namespace,
        user: &str,
    ) -> Result<Option<BTreeSet<RoleGrant>>, ProvisionError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), user.to_string()))
            .cloned())
    }
}

/// Server command failure as the driver reports it.
pub fn command_failure(code: i32, code_name: &str, errmsg: &str) -> MongoError {
    let command: CommandError = from_document(doc! {
        "code": code,
        "codeName": code_name,
        "errmsg": errmsg,
    })
    .expect("command error document");
    MongoError::from(ErrorKind::Command(command))
}

pub fn grant(role: &str, db: &str) -> RoleGrant {
    RoleGrant {
        role: role.to_string(),
        db: db.to_string(),
    }
}

/// Live deployment handle with a throwaway namespace.
pub struct TestDeployment {
    pub admin: MongoAdmin,
    pub namespace: Namespace,
}

impl TestDeployment {
    pub async fn connect() -> Self {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let admin = MongoAdmin::connect(&Secret::new(uri), Duration::from_secs(5))
            .await
            .expect("Failed to connect to MongoDB");
        let namespace = Namespace::new(format!("provision_test_{}", Uuid::new_v4().simple()));
        TestDeployment { admin, namespace }
    }

    /// Drop every user registered in the test namespace.
    pub async fn cleanup(&self) {
        let _ = self
            .admin
            .client()
            .database(self.namespace.as_str())
            .run_command(doc! { "dropAllUsersFromDatabase": 1 }, None)
            .await;
    }
}
