//! Client-side context management.
//!
//! Reads/writes `~/.campus/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use campus_client::{BackendConfig, RpcDialect};

/// A single context — connection to one backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// Context name (e.g. "school-prod").
    pub name: String,

    /// Backend URL (e.g. "http://localhost:8069").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// Database to authenticate against.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub database: String,

    /// RPC dialect: "session" (default) or "service".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dialect: String,

    /// Pre-provisioned API key for service-dialect object calls.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Demo context: fixture-backed resources work without a backend.
    #[serde(default, skip_serializing_if = "is_false")]
    pub demo: bool,
}

fn is_false(flag: &bool) -> bool {
    !flag
}

impl Context {
    /// Build the backend configuration for this context.
    ///
    /// Demo contexts get placeholder connection settings when none are
    /// configured — fixture-backed resources never dial out, and anything
    /// that does fails with the normal unreachable-backend error.
    pub fn backend_config(&self) -> anyhow::Result<BackendConfig> {
        if self.demo {
            let server = if self.server.is_empty() {
                "http://127.0.0.1:8069"
            } else {
                &self.server
            };
            let database = if self.database.is_empty() {
                "demo"
            } else {
                &self.database
            };
            return Ok(BackendConfig::new(server, database));
        }
        if self.server.is_empty() {
            anyhow::bail!(
                "No server URL set for context \"{}\". Run `campus context set {} --server <url>`.",
                self.name,
                self.name
            );
        }
        if self.database.is_empty() {
            anyhow::bail!(
                "No database set for context \"{}\". Run `campus context set {} --database <db>`.",
                self.name,
                self.name
            );
        }
        let mut config = BackendConfig::new(&self.server, &self.database);
        if self.dialect == "service" {
            config = config.dialect(RpcDialect::Service);
        }
        if !self.api_key.is_empty() {
            config = config.service_credential(&self.api_key);
        }
        Ok(config)
    }
}

/// Client configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Name of the currently active context.
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    /// List of configured contexts.
    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl ClientConfig {
    /// Default config file path: ~/.campus/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the currently active context, if any.
    pub fn current(&self) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == self.current_context)
    }

    /// Get a mutable reference to a context by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add or update a context.
    pub fn upsert_context(&mut self, ctx: Context) {
        if let Some(existing) = self.get_mut(&ctx.name) {
            *existing = ctx;
        } else {
            self.contexts.push(ctx);
        }
    }

    /// Remove a context by name. Returns true if it was found.
    pub fn remove_context(&mut self, name: &str) -> bool {
        let len = self.contexts.len();
        self.contexts.retain(|c| c.name != name);
        if self.current_context == name {
            self.current_context = String::new();
        }
        self.contexts.len() < len
    }
}

/// Return the campus config directory (~/.campus).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".campus")
}

/// Path of the redb file holding session snapshots.
pub fn session_db_path() -> PathBuf {
    dirs_path().join("session.redb")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.current_context.is_empty());
        assert!(config.contexts.is_empty());
    }

    #[test]
    fn test_roundtrip() {
        let mut config = ClientConfig::default();
        config.current_context = "school".to_string();
        config.contexts.push(Context {
            name: "school".to_string(),
            server: "http://localhost:8069".to_string(),
            database: "school".to_string(),
            dialect: String::new(),
            api_key: String::new(),
            demo: false,
        });

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let back: ClientConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.current_context, "school");
        assert_eq!(back.contexts.len(), 1);
        assert_eq!(back.contexts[0].server, "http://localhost:8069");
    }

    #[test]
    fn test_backend_config_requires_server_and_database() {
        let ctx = Context {
            name: "bare".to_string(),
            server: String::new(),
            database: String::new(),
            dialect: String::new(),
            api_key: String::new(),
            demo: false,
        };
        assert!(ctx.backend_config().is_err());

        let ctx = Context {
            server: "http://localhost:8069".to_string(),
            ..ctx
        };
        assert!(ctx.backend_config().is_err());

        let ctx = Context {
            database: "school".to_string(),
            ..ctx
        };
        assert!(ctx.backend_config().is_ok());
    }

    #[test]
    fn test_demo_context_needs_no_server() {
        let ctx = Context {
            name: "demo".to_string(),
            server: String::new(),
            database: String::new(),
            dialect: String::new(),
            api_key: String::new(),
            demo: true,
        };
        let config = ctx.backend_config().unwrap();
        assert_eq!(config.database, "demo");
    }
}
