//! Round trips against a running MongoDB (`MONGODB_URI`, default
//! `mongodb://localhost:27017`) that accepts user administration commands.
//!
//! Run with `cargo test -- --ignored`.

mod common;

use common::TestDeployment;
use mongo_provisioner::config::ExistingUserPolicy;
use mongo_provisioner::models::{CredentialRecord, Role};
use mongo_provisioner::provisioning::{execute_plan, verify_plan, ProvisioningPlan};

fn scoped_plan(deployment: &TestDeployment) -> ProvisioningPlan {
    let role = Role::read_write(&deployment.namespace);
    ProvisioningPlan::new(deployment.namespace.clone())
        .create(CredentialRecord::new("svc-reader", "svc-reader-pw", vec![role]))
        .announce("Scoped user created")
}

#[tokio::test]
#[ignore = "requires a running MongoDB instance"]
async fn create_then_verify_scoped_user() {
    let deployment = TestDeployment::connect().await;
    deployment.admin.ping().await.expect("MongoDB should answer ping");
    let plan = scoped_plan(&deployment);
    let mut out = Vec::new();

    execute_plan(&deployment.admin, &plan, ExistingUserPolicy::Fail, &mut out)
        .await
        .expect("createUser should succeed");
    let report = verify_plan(&deployment.admin, &plan).await.unwrap();

    deployment.cleanup().await;
    assert!(report.is_success(), "verification failed: {:?}", report);
    assert_eq!(String::from_utf8(out).unwrap(), "Scoped user created\n");
}

#[tokio::test]
#[ignore = "requires a running MongoDB instance"]
async fn repeated_create_is_duplicate_error() {
    let deployment = TestDeployment::connect().await;
    let plan = scoped_plan(&deployment);
    let mut out = Vec::new();

    execute_plan(&deployment.admin, &plan, ExistingUserPolicy::Fail, &mut out)
        .await
        .expect("first createUser should succeed");
    let second = execute_plan(&deployment.admin, &plan, ExistingUserPolicy::Fail, &mut out).await;

    deployment.cleanup().await;
    let err = second.expect_err("second createUser must fail");
    assert!(err.is_duplicate_user(), "unexpected error: {}", err);
}
