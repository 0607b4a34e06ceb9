//! Provision the root account and the per-node service accounts in `admin`.
//!
//! Run against a fresh deployment through the localhost exception, or with a
//! URI carrying an existing root credential.

use mongo_provisioner::config::ExistingUserPolicy;
use mongo_provisioner::provisioning::{admin_plan, execute_plan};
use mongo_provisioner::startup::{connect, run_procedure};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    run_procedure("create-admin", |config| async move {
        let admin = connect(&config).await?;
        let result = execute_plan(
            &admin,
            &admin_plan(),
            ExistingUserPolicy::Fail,
            &mut std::io::stdout(),
        )
        .await;
        admin.shutdown().await;
        result.map(|_| ())
    })
    .await
}
