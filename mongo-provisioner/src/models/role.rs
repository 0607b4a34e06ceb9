//! Role grants attached to a credential record.

use mongodb::bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};

use super::Namespace;

pub const ROOT_ROLE: &str = "root";
pub const READ_WRITE_ROLE: &str = "readWrite";

/// A named bundle of permissions.
///
/// `Builtin` roles are granted in the namespace the user is created in and
/// are sent as a bare role name; `Scoped` roles name their database.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Builtin(String),
    Scoped { role: String, db: String },
}

/// A role resolved against its namespace, as the server reports it back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role: String,
    pub db: String,
}

impl Role {
    pub fn root() -> Self {
        Role::Builtin(ROOT_ROLE.to_string())
    }

    pub fn read_write(db: &Namespace) -> Self {
        Role::Scoped {
            role: READ_WRITE_ROLE.to_string(),
            db: db.as_str().to_string(),
        }
    }

    /// The grant this role produces when a user is created in `namespace`.
    pub fn resolve(&self, namespace: &Namespace) -> RoleGrant {
        match self {
            Role::Builtin(role) => RoleGrant {
                role: role.clone(),
                db: namespace.as_str().to_string(),
            },
            Role::Scoped { role, db } => RoleGrant {
                role: role.clone(),
                db: db.clone(),
            },
        }
    }
}

impl From<&Role> for Bson {
    fn from(role: &Role) -> Self {
        match role {
            Role::Builtin(name) => Bson::String(name.clone()),
            Role::Scoped { role, db } => {
                Bson::Document(doc! { "role": role.as_str(), "db": db.as_str() })
            }
        }
    }
}

impl RoleGrant {
    /// Parse one entry of a `usersInfo` roles array.
    pub fn from_document(document: &Document) -> Option<Self> {
        Some(Self {
            role: document.get_str("role").ok()?.to_string(),
            db: document.get_str("db").ok()?.to_string(),
        })
    }
}
