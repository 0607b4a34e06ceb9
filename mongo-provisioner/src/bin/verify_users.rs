//! Check that every provisioned credential exists with its expected roles.

use mongo_provisioner::provisioning::{admin_plan, app_user_plan, verify_plan};
use mongo_provisioner::startup::{connect, run_procedure};
use provision_core::error::ProvisionError;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    run_procedure("verify-users", |config| async move {
        let admin = connect(&config).await?;

        let mut report = verify_plan(&admin, &admin_plan()).await?;
        report = report.merge(verify_plan(&admin, &app_user_plan()).await?);
        admin.shutdown().await;

        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| ProvisionError::InternalError(anyhow::Error::new(e)))?;
        println!("{}", rendered);

        report.into_result().map(|_| ())
    })
    .await
}
