//! Fixed provisioning sequences.
//!
//! A plan is an ordered list of create-and-print steps against one namespace.
//! The credentials below are deployment literals.

use provision_core::error::ProvisionError;
use std::collections::HashSet;

use crate::models::{CredentialRecord, Namespace, Role};

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "adminpassword";
pub const NODE_USERS: [&str; 3] = ["mongo-0", "mongo-1", "mongo-2"];
pub const APP_USER: &str = "appuser";
pub const APP_PASSWORD: &str = "appuserpassword";

pub const ADMIN_CREATED: &str = "Admin user created successfully";
pub const ALL_USERS_CREATED: &str = "All users created successfully";
pub const APP_USER_CREATED: &str = "Application user created successfully";

#[derive(Debug, Clone)]
pub enum PlanStep {
    Create(CredentialRecord),
    Announce(String),
}

#[derive(Debug, Clone)]
pub struct ProvisioningPlan {
    pub namespace: Namespace,
    pub steps: Vec<PlanStep>,
}

impl ProvisioningPlan {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            steps: Vec::new(),
        }
    }

    pub fn create(mut self, record: CredentialRecord) -> Self {
        self.steps.push(PlanStep::Create(record));
        self
    }

    pub fn announce(mut self, message: impl Into<String>) -> Self {
        self.steps.push(PlanStep::Announce(message.into()));
        self
    }

    pub fn records(&self) -> impl Iterator<Item = &CredentialRecord> {
        self.steps.iter().filter_map(|step| match step {
            PlanStep::Create(record) => Some(record),
            PlanStep::Announce(_) => None,
        })
    }

    /// Identifiers must be unique within the namespace.
    pub fn validate(&self) -> Result<(), ProvisionError> {
        let mut seen = HashSet::new();
        for record in self.records() {
            if !seen.insert(record.user.as_str()) {
                return Err(ProvisionError::DuplicateUser {
                    user: record.user.clone(),
                    db: self.namespace.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Root account plus one root service account per node, in `admin`.
pub fn admin_plan() -> ProvisioningPlan {
    let plan = ProvisioningPlan::new(Namespace::admin())
        .create(CredentialRecord::new(
            ADMIN_USER,
            ADMIN_PASSWORD,
            vec![Role::root()],
        ))
        .announce(ADMIN_CREATED);

    NODE_USERS
        .iter()
        .fold(plan, |plan, node| {
            plan.create(CredentialRecord::new(*node, *node, vec![Role::root()]))
        })
        .announce(ALL_USERS_CREATED)
}

/// Single application account with readWrite on `appdb`.
pub fn app_user_plan() -> ProvisioningPlan {
    let namespace = Namespace::app();
    let role = Role::read_write(&namespace);
    ProvisioningPlan::new(namespace)
        .create(CredentialRecord::new(APP_USER, APP_PASSWORD, vec![role]))
        .announce(APP_USER_CREATED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn users(plan: &ProvisioningPlan) -> Vec<&str> {
        plan.records().map(|r| r.user.as_str()).collect()
    }

    #[test]
    fn test_admin_plan_order() {
        let plan = admin_plan();
        assert_eq!(plan.namespace, Namespace::admin());
        assert_eq!(
            users(&plan),
            vec!["admin", "mongo-0", "mongo-1", "mongo-2"]
        );

        // admin announcement comes right after the admin account
        assert!(matches!(&plan.steps[1], PlanStep::Announce(m) if m == ADMIN_CREATED));
        assert!(matches!(plan.steps.last(), Some(PlanStep::Announce(m)) if m == ALL_USERS_CREATED));
    }

    #[test]
    fn test_admin_plan_grants_root_everywhere() {
        for record in admin_plan().records() {
            assert_eq!(record.roles, vec![Role::root()]);
        }
    }

    #[test]
    fn test_node_accounts_use_identifier_as_secret() {
        let plan = admin_plan();
        for record in plan.records().skip(1) {
            assert_eq!(record.pwd.expose_secret(), &record.user);
        }
    }

    #[test]
    fn test_app_user_plan() {
        let plan = app_user_plan();
        assert_eq!(plan.namespace.as_str(), "appdb");
        assert_eq!(users(&plan), vec!["appuser"]);

        let record = plan.records().next().unwrap();
        assert_eq!(record.pwd.expose_secret(), "appuserpassword");
        assert_eq!(
            record.roles,
            vec![Role::Scoped {
                role: "readWrite".to_string(),
                db: "appdb".to_string()
            }]
        );
    }

    #[test]
    fn test_fixed_plans_are_valid() {
        assert!(admin_plan().validate().is_ok());
        assert!(app_user_plan().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_repeated_identifier() {
        let plan = ProvisioningPlan::new(Namespace::admin())
            .create(CredentialRecord::new("mongo-0", "a", vec![Role::root()]))
            .create(CredentialRecord::new("mongo-0", "b", vec![Role::root()]));

        let err = plan.validate().unwrap_err();
        assert!(err.is_duplicate_user());
    }
}
