//! Initiate replica set `rs0` from `mongo_servers.yml` and create one root
//! account per member.

use mongo_provisioner::provisioning::replica_set::bootstrap;
use mongo_provisioner::startup::run_procedure;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    run_procedure("init-replica-set", |config| async move {
        bootstrap(&config, &mut std::io::stdout()).await.map(|_| ())
    })
    .await
}
