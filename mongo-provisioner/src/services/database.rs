use mongodb::{
    bson::{doc, Bson, Document},
    options::ClientOptions,
    Client as MongoClient,
};
use provision_core::error::{classify_create_user_error, ProvisionError};
use secrecy::{ExposeSecret, Secret};
use std::collections::BTreeSet;
use std::time::Duration;

use crate::models::{CredentialRecord, Namespace, RoleGrant};

/// Administrative command surface of one MongoDB deployment.
#[derive(Clone)]
pub struct MongoAdmin {
    client: MongoClient,
}

impl MongoAdmin {
    /// The connection string may carry credentials; only the parsed host
    /// list is ever logged.
    pub async fn connect(
        uri: &Secret<String>,
        server_selection_timeout: Duration,
    ) -> Result<Self, ProvisionError> {
        let mut options = ClientOptions::parse(uri.expose_secret())
            .await
            .map_err(|e| {
                tracing::error!("Invalid MongoDB connection string: {}", e);
                ProvisionError::from(e)
            })?;
        options.server_selection_timeout = Some(server_selection_timeout);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let hosts = options
            .hosts
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>()
            .join(",");
        tracing::info!(hosts = %hosts, "Connecting to MongoDB");

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!(hosts = %hosts, "Failed to create MongoDB client: {}", e);
            ProvisionError::from(e)
        })?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub async fn ping(&self) -> Result<(), ProvisionError> {
        self.run(&Namespace::admin(), doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Register `record` in the user registry of `namespace`.
    pub async fn create_user(
        &self,
        namespace: &Namespace,
        record: &CredentialRecord,
    ) -> Result<(), ProvisionError> {
        tracing::debug!(user = %record.user, db = %namespace, "Issuing createUser");
        self.client
            .database(namespace.as_str())
            .run_command(record.create_user_command(), None)
            .await
            .map_err(|e| {
                tracing::warn!(user = %record.user, db = %namespace, "createUser failed: {}", e);
                classify_create_user_error(e, &record.user, namespace.as_str())
            })?;
        Ok(())
    }

    /// Grants held by `user` in `namespace`, or `None` if no such user exists.
    pub async fn users_info(
        &self,
        namespace: &Namespace,
        user: &str,
    ) -> Result<Option<BTreeSet<RoleGrant>>, ProvisionError> {
        let reply = self.run(namespace, doc! { "usersInfo": user }).await?;
        Ok(parse_users_info(&reply))
    }

    /// Issue `replSetInitiate` against the connected member.
    pub async fn repl_set_initiate(
        &self,
        config: Document,
    ) -> Result<Document, mongodb::error::Error> {
        self.client
            .database(Namespace::admin().as_str())
            .run_command(doc! { "replSetInitiate": config }, None)
            .await
    }

    async fn run(
        &self,
        namespace: &Namespace,
        command: Document,
    ) -> Result<Document, ProvisionError> {
        self.client
            .database(namespace.as_str())
            .run_command(command, None)
            .await
            .map_err(ProvisionError::from)
    }

    /// Close the connection pool; pending operations are not awaited.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

/// Extract the first user's grants from a `usersInfo` reply.
pub fn parse_users_info(reply: &Document) -> Option<BTreeSet<RoleGrant>> {
    let users = reply.get_array("users").ok()?;
    let user = match users.first()? {
        Bson::Document(user) => user,
        _ => return None,
    };

    let grants = user
        .get_array("roles")
        .map(|roles| {
            roles
                .iter()
                .filter_map(|r| match r {
                    Bson::Document(d) => RoleGrant::from_document(d),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();
    Some(grants)
}
