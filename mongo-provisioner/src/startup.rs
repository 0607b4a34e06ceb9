use provision_core::error::ProvisionError;
use provision_core::observability::{init_tracing, shutdown_tracing};
use std::future::Future;
use std::process::ExitCode;

use crate::config::ProvisionerConfig;
use crate::services::MongoAdmin;

/// Load configuration, install tracing, run `procedure` to completion and
/// map its outcome to the process exit status.
pub async fn run_procedure<F, Fut>(service_name: &str, procedure: F) -> ExitCode
where
    F: FnOnce(ProvisionerConfig) -> Fut,
    Fut: Future<Output = Result<(), ProvisionError>>,
{
    let config = match ProvisionerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", service_name, e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(service_name, &config.common);

    tracing::info!(
        service = service_name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting procedure"
    );

    let result = procedure(config).await;
    let code = match result {
        Ok(()) => {
            tracing::info!(service = service_name, "Procedure finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(service = service_name, "Procedure failed: {}", e);
            eprintln!("{}: {}", service_name, e);
            ExitCode::FAILURE
        }
    };

    shutdown_tracing();
    code
}

/// Connect to the configured deployment.
pub async fn connect(config: &ProvisionerConfig) -> Result<MongoAdmin, ProvisionError> {
    MongoAdmin::connect(&config.mongodb_uri, config.server_selection_timeout()).await
}
