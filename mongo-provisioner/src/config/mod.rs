use provision_core::config as core_config;
use provision_core::error::ProvisionError;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionerConfig {
    #[serde(default)]
    pub common: core_config::Config,
    #[serde(default = "default_mongodb_uri")]
    pub mongodb_uri: Secret<String>,
    #[serde(default = "default_server_selection_timeout_secs")]
    pub server_selection_timeout_secs: u64,
    #[serde(default)]
    pub existing_user: ExistingUserPolicy,
    #[serde(default = "default_servers_file")]
    pub servers_file: String,
    #[serde(default = "default_stabilize_secs")]
    pub stabilize_secs: u64,
}

/// What to do when `createUser` reports that the identifier is taken.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExistingUserPolicy {
    /// Abort the procedure with a duplicate-user error.
    #[default]
    Fail,
    /// Print that the user exists and continue with the next step.
    Report,
}

/// Contents of `mongo_servers.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServersFile {
    pub servers: Vec<ServerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerEntry {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Secret<String>,
}

fn default_mongodb_uri() -> Secret<String> {
    Secret::new("mongodb://127.0.0.1:27017".to_string())
}

fn default_server_selection_timeout_secs() -> u64 {
    5
}

fn default_servers_file() -> String {
    "mongo_servers.yml".to_string()
}

fn default_stabilize_secs() -> u64 {
    10
}

impl ProvisionerConfig {
    pub fn load() -> Result<Self, ProvisionError> {
        let config: ProvisionerConfig = core_config::load_settings(core_config::SETTINGS_FILE)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ProvisionError> {
        if self.server_selection_timeout_secs == 0 {
            return Err(ProvisionError::ConfigError(anyhow::anyhow!(
                "server_selection_timeout_secs must be greater than 0"
            )));
        }

        let uri = self.mongodb_uri.expose_secret();
        if !uri.starts_with("mongodb://") && !uri.starts_with("mongodb+srv://") {
            return Err(ProvisionError::ConfigError(anyhow::anyhow!(
                "mongodb_uri must use the mongodb:// or mongodb+srv:// scheme"
            )));
        }

        Ok(())
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_secs(self.server_selection_timeout_secs)
    }

    pub fn stabilize_delay(&self) -> Duration {
        Duration::from_secs(self.stabilize_secs)
    }

    /// Load the replica set member list from `servers_file`.
    pub fn load_servers(&self) -> Result<ServersFile, ProvisionError> {
        let servers: ServersFile = core_config::load_file(&self.servers_file)?;
        if servers.servers.is_empty() {
            return Err(ProvisionError::ConfigError(anyhow::anyhow!(
                "{} lists no servers",
                self.servers_file
            )));
        }
        Ok(servers)
    }
}

impl ServerEntry {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Direct, unauthenticated connection string for this member.
    pub fn direct_uri(&self) -> String {
        format!("mongodb://{}/admin?directConnection=true", self.address())
    }
}
