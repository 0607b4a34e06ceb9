//! Provision the application account with readWrite on `appdb`.

use mongo_provisioner::provisioning::{app_user_plan, execute_plan};
use mongo_provisioner::startup::{connect, run_procedure};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    run_procedure("create-app-user", |config| async move {
        let admin = connect(&config).await?;
        let result = execute_plan(
            &admin,
            &app_user_plan(),
            config.existing_user,
            &mut std::io::stdout(),
        )
        .await;
        admin.shutdown().await;
        result.map(|_| ())
    })
    .await
}
