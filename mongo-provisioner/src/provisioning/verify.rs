use provision_core::error::ProvisionError;
use serde::Serialize;
use std::collections::BTreeSet;

use super::plan::ProvisioningPlan;
use crate::models::RoleGrant;
use crate::services::UserRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationStatus {
    Matched,
    Missing,
    RoleMismatch {
        expected: BTreeSet<RoleGrant>,
        actual: BTreeSet<RoleGrant>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationEntry {
    pub user: String,
    pub db: String,
    #[serde(flatten)]
    pub status: VerificationStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationReport {
    pub entries: Vec<VerificationEntry>,
}

impl VerificationReport {
    pub fn is_success(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.status == VerificationStatus::Matched)
    }

    pub fn failures(&self) -> impl Iterator<Item = &VerificationEntry> {
        self.entries
            .iter()
            .filter(|e| e.status != VerificationStatus::Matched)
    }

    pub fn merge(mut self, other: VerificationReport) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Collapse into an error naming every failed record.
    pub fn into_result(self) -> Result<Self, ProvisionError> {
        if self.is_success() {
            return Ok(self);
        }
        let failed: Vec<String> = self
            .failures()
            .map(|e| format!("{}.{}", e.db, e.user))
            .collect();
        Err(ProvisionError::VerificationError(failed.join(", ")))
    }
}

/// Check that every record in `plan` exists with exactly its role set.
pub async fn verify_plan<R>(
    registry: &R,
    plan: &ProvisioningPlan,
) -> Result<VerificationReport, ProvisionError>
where
    R: UserRegistry + ?Sized,
{
    let namespace = &plan.namespace;
    let mut report = VerificationReport::default();

    for record in plan.records() {
        let expected = record.expected_grants(namespace);
        let status = match registry.users_info(namespace, &record.user).await? {
            None => VerificationStatus::Missing,
            Some(actual) if actual == expected => VerificationStatus::Matched,
            Some(actual) => VerificationStatus::RoleMismatch { expected, actual },
        };

        if status == VerificationStatus::Matched {
            tracing::info!(user = %record.user, db = %namespace, "Credential verified");
        } else {
            tracing::warn!(user = %record.user, db = %namespace, ?status, "Credential check failed");
        }

        report.entries.push(VerificationEntry {
            user: record.user.clone(),
            db: namespace.to_string(),
            status,
        });
    }

    Ok(report)
}
