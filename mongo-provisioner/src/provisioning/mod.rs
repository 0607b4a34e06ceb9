pub mod executor;
pub mod plan;
pub mod replica_set;
pub mod verify;

pub use executor::{execute_plan, ProvisionReport};
pub use plan::{admin_plan, app_user_plan, PlanStep, ProvisioningPlan};
pub use verify::{verify_plan, VerificationReport, VerificationStatus};
