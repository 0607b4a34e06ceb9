pub mod credential;
pub mod namespace;
pub mod role;

pub use credential::CredentialRecord;
pub use namespace::Namespace;
pub use role::{Role, RoleGrant};
