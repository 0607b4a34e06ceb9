//! Replica set bootstrap: probe members, initiate the set on the first
//! member, then register a root account per member.

use mongodb::bson::{doc, Bson, Document};
use provision_core::error::{command_code, ProvisionError};
use secrecy::Secret;
use std::io::Write;
use std::time::Duration;

use crate::config::{ProvisionerConfig, ServerEntry};
use crate::models::{CredentialRecord, Namespace, Role};
use crate::services::{MongoAdmin, UserRegistry};

pub const REPLICA_SET_NAME: &str = "rs0";

/// Server code returned when `replSetInitiate` runs on an initialised member.
pub const ALREADY_INITIALIZED_CODE: i32 = 23;

#[derive(Debug, PartialEq, Eq)]
pub enum InitiateOutcome {
    Initiated,
    AlreadyInitialized,
}

/// `replSetInitiate` configuration with one member per server, in file order.
pub fn replica_set_config(servers: &[ServerEntry]) -> Document {
    let members: Vec<Bson> = servers
        .iter()
        .enumerate()
        .map(|(idx, server)| {
            Bson::Document(doc! {
                "_id": idx as i32,
                "host": server.address(),
            })
        })
        .collect();

    doc! {
        "_id": REPLICA_SET_NAME,
        "members": members,
    }
}

pub fn is_already_initialized(err: &mongodb::error::Error) -> bool {
    command_code(err) == Some(ALREADY_INITIALIZED_CODE)
        || err.to_string().contains("already initialized")
}

/// Ping every server over a direct, unauthenticated connection.
///
/// Failures are printed, never returned; the result lists reachable addresses.
pub async fn probe_servers<W: Write>(
    servers: &[ServerEntry],
    timeout: Duration,
    out: &mut W,
) -> Result<Vec<String>, ProvisionError> {
    let mut reachable = Vec::new();

    for server in servers {
        let address = server.address();
        let uri = Secret::new(server.direct_uri());
        let outcome = match MongoAdmin::connect(&uri, timeout).await {
            Ok(admin) => {
                let ping = admin.ping().await;
                admin.shutdown().await;
                ping
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                tracing::info!(address = %address, "Server reachable");
                writeln!(out, "Connected to {} successfully (no auth).", address)?;
                reachable.push(address);
            }
            Err(e) => {
                tracing::warn!(address = %address, "Server unreachable: {}", e);
                writeln!(out, "Error connecting to {}: {}", address, e)?;
            }
        }
    }

    Ok(reachable)
}

/// Initiate the replica set through `admin`.
pub async fn initiate<W: Write>(
    admin: &MongoAdmin,
    servers: &[ServerEntry],
    out: &mut W,
) -> Result<InitiateOutcome, ProvisionError> {
    let result = admin.repl_set_initiate(replica_set_config(servers)).await;
    report_initiate(result, out)
}

/// Print the outcome of `replSetInitiate`; only an already initialised set is
/// tolerated.
pub fn report_initiate<W: Write>(
    result: Result<Document, mongodb::error::Error>,
    out: &mut W,
) -> Result<InitiateOutcome, ProvisionError> {
    match result {
        Ok(reply) => {
            tracing::info!(set = REPLICA_SET_NAME, "Replica set initiated");
            writeln!(out, "Replica set initiated successfully: {}", reply)?;
            Ok(InitiateOutcome::Initiated)
        }
        Err(e) if is_already_initialized(&e) => {
            tracing::info!(set = REPLICA_SET_NAME, "Replica set already initialized");
            writeln!(out, "Replica set already initialized.")?;
            Ok(InitiateOutcome::AlreadyInitialized)
        }
        Err(e) => {
            writeln!(out, "Replica set initiation error: {}", e)?;
            Err(ProvisionError::from(e))
        }
    }
}

/// Create one root account in `admin` per server.
///
/// Every server is attempted; failures are printed and counted, not returned.
pub async fn create_member_users<R, W>(
    registry: &R,
    servers: &[ServerEntry],
    out: &mut W,
) -> Result<usize, ProvisionError>
where
    R: UserRegistry + ?Sized,
    W: Write,
{
    let namespace = Namespace::admin();
    let mut created = 0;

    for server in servers {
        let record = CredentialRecord {
            user: server.user.clone(),
            pwd: server.password.clone(),
            roles: vec![Role::root()],
        };

        match registry.create_user(&namespace, &record).await {
            Ok(()) => {
                tracing::info!(user = %record.user, "Created member admin user");
                writeln!(out, "Created admin user: {}", record.user)?;
                created += 1;
            }
            Err(e) if e.is_duplicate_user() => {
                writeln!(out, "User {} already exists", record.user)?;
            }
            Err(e) => {
                tracing::error!(user = %record.user, "Failed to create member admin user: {}", e);
                writeln!(out, "Error creating user {}: {}", record.user, e)?;
            }
        }
    }

    Ok(created)
}

/// Full bootstrap flow driven by `mongo_servers.yml`.
pub async fn bootstrap<W: Write>(
    config: &ProvisionerConfig,
    out: &mut W,
) -> Result<InitiateOutcome, ProvisionError> {
    let servers = config.load_servers()?.servers;
    let timeout = config.server_selection_timeout();

    writeln!(out, "Testing connections...")?;
    probe_servers(&servers, timeout, out).await?;

    writeln!(out, "\nInitializing replica set...")?;
    let primary = &servers[0];
    let admin = MongoAdmin::connect(&Secret::new(primary.direct_uri()), timeout)
        .await
        .map_err(|e| {
            let _ = writeln!(out, "Error connecting to {}: {}", primary.address(), e);
            e
        })?;

    let outcome = initiate(&admin, &servers, out).await;
    if let Ok(InitiateOutcome::Initiated) = &outcome {
        writeln!(out, "Waiting for replica set to stabilize...")?;
        tokio::time::sleep(config.stabilize_delay()).await;

        writeln!(out, "Creating admin users...")?;
        create_member_users(&admin, &servers, out).await?;
    }

    admin.shutdown().await;
    outcome
}
