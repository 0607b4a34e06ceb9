use async_trait::async_trait;
use provision_core::error::ProvisionError;
use std::collections::BTreeSet;

use super::MongoAdmin;
use crate::models::{CredentialRecord, Namespace, RoleGrant};

/// A namespace-scoped user registry that procedures provision into.
#[async_trait]
pub trait UserRegistry: Send + Sync {
    async fn create_user(
        &self,
        namespace: &Namespace,
        record: &CredentialRecord,
    ) -> Result<(), ProvisionError>;

    async fn users_info(
        &self,
        namespace: &Namespace,
        user: &str,
    ) -> Result<Option<BTreeSet<RoleGrant>>, ProvisionError>;
}

#[async_trait]
impl UserRegistry for MongoAdmin {
    async fn create_user(
        &self,
        namespace: &Namespace,
        record: &CredentialRecord,
    ) -> Result<(), ProvisionError> {
        MongoAdmin::create_user(self, namespace, record).await
    }

    async fn users_info(
        &self,
        namespace: &Namespace,
        user: &str,
    ) -> Result<Option<BTreeSet<RoleGrant>>, ProvisionError> {
        MongoAdmin::users_info(self, namespace, user).await
    }
}
