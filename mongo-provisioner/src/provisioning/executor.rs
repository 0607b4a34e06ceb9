use provision_core::error::ProvisionError;
use std::io::Write;

use super::plan::{PlanStep, ProvisioningPlan};
use crate::config::ExistingUserPolicy;
use crate::services::UserRegistry;

/// What a plan run did, in step order.
#[derive(Debug, Default)]
pub struct ProvisionReport {
    pub namespace: String,
    pub created: Vec<String>,
    pub existing: Vec<String>,
}

/// Run `plan` against `registry`, writing status lines to `out` as they occur.
///
/// Steps run strictly in order and the first failure aborts the rest; with
/// `ExistingUserPolicy::Report` a taken identifier is reported and skipped.
pub async fn execute_plan<R, W>(
    registry: &R,
    plan: &ProvisioningPlan,
    policy: ExistingUserPolicy,
    out: &mut W,
) -> Result<ProvisionReport, ProvisionError>
where
    R: UserRegistry + ?Sized,
    W: Write,
{
    plan.validate()?;

    let namespace = &plan.namespace;
    let mut report = ProvisionReport {
        namespace: namespace.to_string(),
        ..Default::default()
    };

    tracing::info!(db = %namespace, steps = plan.steps.len(), "Executing provisioning plan");

    for step in &plan.steps {
        match step {
            PlanStep::Create(record) => match registry.create_user(namespace, record).await {
                Ok(()) => {
                    tracing::info!(user = %record.user, db = %namespace, "User created");
                    report.created.push(record.user.clone());
                }
                Err(e) if e.is_duplicate_user() && policy == ExistingUserPolicy::Report => {
                    tracing::warn!(user = %record.user, db = %namespace, "User already exists");
                    writeln!(out, "User '{}' already exists.", record.user)?;
                    report.existing.push(record.user.clone());
                }
                Err(e) => {
                    tracing::error!(user = %record.user, db = %namespace, "Provisioning aborted: {}", e);
                    return Err(e);
                }
            },
            PlanStep::Announce(message) => {
                tracing::info!("{}", message);
                writeln!(out, "{}", message)?;
            }
        }
    }

    Ok(report)
}
